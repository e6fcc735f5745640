//! Configuration management for Azure2Md.
//!
//! Handles loading and saving configuration from TOML files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::work_item::WorkItemType;

/// Environment variable that overrides the configured access token.
pub const TOKEN_ENV_VAR: &str = "AZURE_DEVOPS_PAT";

/// Name of the project-local config file.
pub const LOCAL_CONFIG_FILE: &str = ".azure2md.toml";

/// Error types for configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Backend connection settings
    pub server: ServerConfig,

    /// Diagram display options
    pub display: DisplayOptions,

    /// Default date field mapping for all projects
    pub fields: FieldMapping,

    /// Projects to report on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<ProjectConfig>,

    /// File the configuration was loaded from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// UI language code (`en-US`, `zh-CN`) or `auto`
    pub language: String,

    /// Combine all projects into one document
    pub merge_projects: bool,

    /// Directory the reports are written to
    pub output_dir: String,

    /// File name of the merged report
    pub merged_file_name: String,

    /// Which Gantt views each project section gets
    pub gantt_layout: GanttLayout,
}

/// Gantt views rendered per project section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GanttLayout {
    /// Feature→Story view followed by a Story→Task view
    #[default]
    Split,
    /// A single Feature→Story→Task view
    Full,
}

/// Azure DevOps connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Collection or organization URL, e.g. `https://dev.azure.com/contoso`
    pub url: String,

    /// REST API version
    pub api_version: String,

    /// Personal access token; `AZURE_DEVOPS_PAT` takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_access_token: Option<String>,
}

/// Options that only affect how diagrams are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Draw a bar for each feature
    pub show_feature_in_gantt: bool,

    /// Draw a bar for each user story
    pub show_user_story_in_gantt: bool,

    /// Prefix child labels with `<parent title> - `
    pub prefix_parent_name: bool,
}

/// Start/end field names for one work item type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFields {
    /// Field holding the start date
    pub start: String,
    /// Field holding the end date
    pub end: String,
}

impl DateFields {
    /// Create a field pair.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    fn is_unmapped(&self) -> bool {
        self.start.trim().is_empty() && self.end.trim().is_empty()
    }
}

/// Per-type date field mapping.
///
/// A type with no entry, or an entry whose names are both empty, is
/// unmapped and always gets the default schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature: Option<DateFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_story: Option<DateFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<DateFields>,
}

impl FieldMapping {
    /// Mapping with no fields at all.
    pub fn unmapped() -> Self {
        Self { feature: None, user_story: None, task: None }
    }

    /// Fields configured for a work item type.
    pub fn for_type(&self, kind: WorkItemType) -> Option<&DateFields> {
        let fields = match kind {
            WorkItemType::Feature => self.feature.as_ref(),
            WorkItemType::UserStory => self.user_story.as_ref(),
            WorkItemType::Task => self.task.as_ref(),
            WorkItemType::Other => None,
        };
        fields.filter(|f| !f.is_unmapped())
    }

    /// All distinct field names referenced by the mapping, in type order.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for kind in [WorkItemType::Feature, WorkItemType::UserStory, WorkItemType::Task] {
            if let Some(fields) = self.for_type(kind) {
                for name in [fields.start.as_str(), fields.end.as_str()] {
                    if !name.is_empty() && !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
        }
        names
    }
}

/// A project to query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Saved query path, e.g. `My Queries/Sprint Items`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Inline WIQL query; used when no saved query is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiql: Option<String>,

    /// Field mapping override for this project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldMapping>,
}

impl ProjectConfig {
    /// Create a project entry using the default query.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), query: None, wiql: None, fields: None }
    }

    /// Use a saved query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Looks for config in:
    /// 1. `.azure2md.toml` in current directory
    /// 2. `~/.config/azure2md/config.toml`
    /// 3. Falls back to defaults
    pub fn load() -> anyhow::Result<Self> {
        // Try local config first
        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Ok(Self::load_from_file(&local_config)?);
        }

        // Try global config
        if let Some(global_config) = Self::global_config_path() {
            if global_config.exists() {
                return Ok(Self::load_from_file(&global_config)?);
            }
        }

        tracing::debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load from an explicit path, or from the default locations.
    pub fn load_with(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Ok(Self::load_from_file(path)?),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut config: Self = toml::from_str(&content)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        config.source = Some(path.to_path_buf());
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check the settings needed to query the backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.url is not set".to_string()));
        }
        if self.projects.is_empty() {
            return Err(ConfigError::Invalid("no [[projects]] configured".to_string()));
        }
        if let Some(project) = self.projects.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "project entry with empty name (query: {:?})",
                project.query
            )));
        }
        Ok(())
    }

    /// Field mapping in effect for a project.
    pub fn fields_for(&self, project: &ProjectConfig) -> FieldMapping {
        project.fields.clone().unwrap_or_else(|| self.fields.clone())
    }

    /// Directory reports are written to, with `~` and env vars expanded.
    pub fn output_dir(&self) -> PathBuf {
        let raw = self.general.output_dir.as_str();
        match shellexpand::full(raw) {
            Ok(expanded) => PathBuf::from(expanded.as_ref()),
            Err(e) => {
                tracing::warn!("Could not expand output_dir '{}': {}", raw, e);
                PathBuf::from(raw)
            }
        }
    }

    /// Get the global config file path.
    pub fn global_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Get the config directory path.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("azure2md"))
    }

    /// Starter configuration written by `azure2md init`.
    pub fn sample() -> String {
        let mut config = Self::default();
        config.server.url = "https://dev.azure.com/your-organization".to_string();
        config.projects = vec![
            ProjectConfig::new("Website"),
            ProjectConfig::new("Mobile").with_query("My Queries/Open Items"),
        ];

        let body = toml::to_string_pretty(&config).unwrap_or_default();
        format!(
            "# Azure2Md configuration\n\
             #\n\
             # The personal access token can also be supplied through {}.\n\
             # general.language accepts \"auto\", \"en-US\" or \"zh-CN\".\n\
             # general.gantt_layout accepts \"split\" or \"full\".\n\n{}",
            TOKEN_ENV_VAR, body
        )
    }
}

impl ServerConfig {
    /// Access token from the environment or the config file.
    pub fn token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| self.personal_access_token.clone().filter(|t| !t.is_empty()))
    }

    /// Web URL of a project.
    pub fn project_url(&self, project: &str) -> String {
        format!("{}/{}", self.url.trim_end_matches('/'), urlencoding::encode(project))
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            merge_projects: false,
            output_dir: ".".to_string(),
            merged_file_name: "work_items_report.md".to_string(),
            gantt_layout: GanttLayout::Split,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { url: String::new(), api_version: "7.0".to_string(), personal_access_token: None }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self { show_feature_in_gantt: true, show_user_story_in_gantt: true, prefix_parent_name: true }
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            feature: Some(DateFields::new(
                "Microsoft.VSTS.Scheduling.StartDate",
                "Microsoft.VSTS.Scheduling.TargetDate",
            )),
            user_story: Some(DateFields::new(
                "Microsoft.VSTS.Scheduling.StartDate",
                "Microsoft.VSTS.Scheduling.TargetDate",
            )),
            task: Some(DateFields::new(
                "Microsoft.VSTS.Scheduling.StartDate",
                "Microsoft.VSTS.Scheduling.FinishDate",
            )),
        }
    }
}
