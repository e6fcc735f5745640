//! Report generation pipeline.
//!
//! The `App` fetches every selected project from a [`WorkItemSource`],
//! renders one report per project (or one merged report) and writes the
//! documents into the output directory. Nothing is written unless every
//! project was fetched successfully.

use std::path::PathBuf;

use anyhow::Context as _;
use async_trait::async_trait;

use crate::core::{Config, DateResolver, FieldMapping, ProjectConfig, ProjectScope, WorkItem};
use crate::i18n::{resolve_language, system_language, Texts};
use crate::report::ReportAssembler;

/// A backend that returns the work items of a project.
#[async_trait]
pub trait WorkItemSource: Send + Sync {
    /// Fetch the items selected by a project's query.
    async fn fetch(
        &self,
        project: &ProjectConfig,
        fields: &FieldMapping,
    ) -> anyhow::Result<Vec<WorkItem>>;

    /// Get the source name.
    fn name(&self) -> &str;
}

/// Command line overrides applied on top of the configuration.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Only generate these projects (all when empty)
    pub projects: Vec<String>,
    /// Override `general.merge_projects`
    pub merge: Option<bool>,
    /// Override `general.language`
    pub language: Option<String>,
    /// Override `general.output_dir`
    pub output_dir: Option<PathBuf>,
}

/// A rendered report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub content: String,
}

/// Drives one report generation run.
#[derive(Debug)]
pub struct App {
    config: Config,
    filter: Vec<String>,
    output_dir: Option<PathBuf>,
    texts: Texts,
    resolver: DateResolver,
}

impl App {
    /// Create an app from configuration and overrides.
    pub fn new(mut config: Config, options: GenerateOptions) -> Self {
        if let Some(merge) = options.merge {
            config.general.merge_projects = merge;
        }
        if let Some(language) = options.language {
            config.general.language = language;
        }

        let language = resolve_language(&config.general.language, system_language);
        tracing::debug!("Report language: {}", language);

        Self {
            config,
            filter: options.projects,
            output_dir: options.output_dir,
            texts: Texts::new(language),
            resolver: DateResolver::new(),
        }
    }

    /// Anchor default dates at a fixed day.
    pub fn with_resolver(mut self, resolver: DateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The resolved report language.
    pub fn language(&self) -> &'static str {
        self.texts.language()
    }

    /// Directory reports are written to.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| self.config.output_dir())
    }

    /// Projects selected by the `--project` filter, in configuration order.
    pub fn selected_projects(&self) -> anyhow::Result<Vec<&ProjectConfig>> {
        if let Some(unknown) = self
            .filter
            .iter()
            .find(|name| !self.config.projects.iter().any(|p| p.name.eq_ignore_ascii_case(name)))
        {
            anyhow::bail!("Project '{}' is not configured", unknown);
        }

        Ok(self
            .config
            .projects
            .iter()
            .filter(|p| {
                self.filter.is_empty() || self.filter.iter().any(|n| n.eq_ignore_ascii_case(&p.name))
            })
            .collect())
    }

    /// Fetch every selected project.
    pub async fn collect(&self, source: &dyn WorkItemSource) -> anyhow::Result<Vec<ProjectScope>> {
        let mut scopes = Vec::new();
        for project in self.selected_projects()? {
            let fields = self.config.fields_for(project);
            tracing::info!("Fetching '{}' from {}", project.name, source.name());
            let items = source
                .fetch(project, &fields)
                .await
                .with_context(|| format!("Failed to fetch work items for '{}'", project.name))?;
            tracing::info!("Fetched {} work items for '{}'", items.len(), project.name);

            let url = self.config.server.project_url(&project.name);
            let scope = ProjectScope::new(&project.name, url, items, fields);
            if scope.is_empty() {
                tracing::warn!("Query for '{}' returned no work items", project.name);
            }
            scopes.push(scope);
        }
        Ok(scopes)
    }

    /// Render reports for fetched scopes.
    pub fn render(&self, scopes: &[ProjectScope]) -> Vec<Document> {
        let assembler =
            ReportAssembler::new(self.texts, self.config.display, self.config.general.gantt_layout)
                .with_resolver(self.resolver);

        if self.config.general.merge_projects {
            return vec![Document {
                file_name: self.config.general.merged_file_name.clone(),
                content: assembler.render_merged(scopes),
            }];
        }

        scopes
            .iter()
            .map(|scope| Document {
                file_name: report_file_name(&scope.name),
                content: assembler.render_project(scope),
            })
            .collect()
    }

    /// Write documents into the output directory.
    pub fn write(&self, documents: &[Document]) -> anyhow::Result<Vec<PathBuf>> {
        let dir = self.output_dir();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

        let mut written = Vec::with_capacity(documents.len());
        for doc in documents {
            let path = dir.join(&doc.file_name);
            std::fs::write(&path, &doc.content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Fetch, render and write. Returns the written paths.
    pub async fn run(&self, source: &dyn WorkItemSource) -> anyhow::Result<Vec<PathBuf>> {
        let scopes = self.collect(source).await?;
        let documents = self.render(&scopes);
        self.write(&documents)
    }
}

/// File name of a single-project report.
pub fn report_file_name(project: &str) -> String {
    let stem: String = project
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') { '_' } else { c })
        .collect();
    if stem.is_empty() {
        "project.md".to_string()
    } else {
        format!("{}.md", stem)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::core::WorkItemType;
    use chrono::NaiveDate;

    /// Serves canned items per project.
    struct MemorySource {
        items: HashMap<String, Vec<WorkItem>>,
    }

    impl MemorySource {
        fn new() -> Self {
            let mut items = HashMap::new();
            items.insert(
                "Web".to_string(),
                vec![
                    WorkItem::new(1, WorkItemType::Feature, "Auth").with_project("Web"),
                    WorkItem::new(2, WorkItemType::UserStory, "Login")
                        .with_parent(1)
                        .with_project("Web"),
                ],
            );
            items.insert(
                "Mobile".to_string(),
                vec![WorkItem::new(10, WorkItemType::Task, "Splash")
                    .with_assignee("Ada")
                    .with_project("Mobile")],
            );
            Self { items }
        }
    }

    #[async_trait]
    impl WorkItemSource for MemorySource {
        async fn fetch(
            &self,
            project: &ProjectConfig,
            _fields: &FieldMapping,
        ) -> anyhow::Result<Vec<WorkItem>> {
            self.items
                .get(&project.name)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no such project"))
        }

        fn name(&self) -> &str {
            "memory"
        }
    }

    fn config(projects: &[&str]) -> Config {
        let mut config = Config::default();
        config.server.url = "https://dev.azure.com/org".to_string();
        config.general.language = "en-US".to_string();
        config.projects = projects.iter().map(|p| ProjectConfig::new(*p)).collect();
        config
    }

    fn app(config: Config, options: GenerateOptions) -> App {
        App::new(config, options)
            .with_resolver(DateResolver::with_today(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
    }

    #[tokio::test]
    async fn test_run_writes_one_report_per_project() {
        let dir = tempfile::tempdir().unwrap();
        let options =
            GenerateOptions { output_dir: Some(dir.path().to_path_buf()), ..Default::default() };
        let app = app(config(&["Web", "Mobile"]), options);

        let written = app.run(&MemorySource::new()).await.unwrap();
        assert_eq!(written, vec![dir.path().join("Web.md"), dir.path().join("Mobile.md")]);

        let web = std::fs::read_to_string(dir.path().join("Web.md")).unwrap();
        assert!(web.starts_with("# Work Item Report: Web\n"));
        assert!(web.contains("(https://dev.azure.com/org/Web)"));
    }

    #[tokio::test]
    async fn test_run_merged() {
        let dir = tempfile::tempdir().unwrap();
        let options = GenerateOptions {
            merge: Some(true),
            output_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let app = app(config(&["Web", "Mobile"]), options);

        let written = app.run(&MemorySource::new()).await.unwrap();
        assert_eq!(written, vec![dir.path().join("work_items_report.md")]);

        let merged = std::fs::read_to_string(&written[0]).unwrap();
        assert!(merged.contains("| Project | ID | Title |"));
        assert!(merged.contains("| Mobile | 10 | Splash |"));
    }

    #[test]
    fn test_fetch_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let options =
            GenerateOptions { output_dir: Some(dir.path().to_path_buf()), ..Default::default() };
        let app = app(config(&["Web", "Missing"]), options);

        let err = tokio_test::block_on(app.run(&MemorySource::new())).unwrap_err();
        assert!(err.to_string().contains("'Missing'"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_project_filter() {
        let options = GenerateOptions { projects: vec!["mobile".to_string()], ..Default::default() };
        let app = app(config(&["Web", "Mobile"]), options);
        let names: Vec<&str> =
            app.selected_projects().unwrap().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Mobile"]);

        let options = GenerateOptions { projects: vec!["Nope".to_string()], ..Default::default() };
        assert!(App::new(config(&["Web"]), options).selected_projects().is_err());
    }

    #[test]
    fn test_language_override() {
        let options = GenerateOptions { language: Some("zh-CN".to_string()), ..Default::default() };
        assert_eq!(app(config(&["Web"]), options).language(), "zh-CN");
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Web"), "Web.md");
        assert_eq!(report_file_name("Team/Sub: A"), "Team_Sub_ A.md");
        assert_eq!(report_file_name("  "), "project.md");
    }
}
