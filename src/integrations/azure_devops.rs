//! Azure DevOps / TFS work item tracking integration.
//!
//! Runs a saved query, an inline WIQL query or the default query against a
//! project and fetches the matching work items through the REST API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::app::WorkItemSource;
use crate::core::{FieldMapping, ProjectConfig, ServerConfig, WorkItem, WorkItemType};

/// Query used when a project names neither a saved query nor WIQL.
pub const DEFAULT_WIQL: &str = "SELECT [System.Id] FROM WorkItems \
     WHERE [System.TeamProject] = @project \
     AND [System.WorkItemType] IN ('Feature', 'User Story', 'Task') \
     ORDER BY [System.Id]";

/// Maximum number of ids per work item batch request.
pub const BATCH_SIZE: usize = 200;

const PARENT_LINK: &str = "System.LinkTypes.Hierarchy-Reverse";

/// Result type for Azure DevOps operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Error types for Azure DevOps operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed; check the personal access token")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Azure DevOps error: {0}")]
    Api(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Azure DevOps REST client.
#[derive(Debug, Clone)]
pub struct AzureDevOpsClient {
    /// Organization or collection URL
    base_url: String,
    /// REST API version
    api_version: String,
    /// Personal access token
    token: Option<String>,
    /// HTTP client
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SavedQuery {
    id: String,
    #[serde(default, rename = "isFolder")]
    is_folder: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WiqlResult {
    #[serde(default)]
    work_items: Vec<WorkItemRef>,
    #[serde(default)]
    work_item_relations: Vec<WorkItemLink>,
}

#[derive(Debug, Deserialize)]
struct WorkItemRef {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct WorkItemLink {
    #[serde(default)]
    source: Option<WorkItemRef>,
    #[serde(default)]
    target: Option<WorkItemRef>,
}

#[derive(Debug, Deserialize)]
struct WorkItemBatch {
    #[serde(default)]
    value: Vec<Option<RawWorkItem>>,
}

#[derive(Debug, Deserialize)]
struct RawWorkItem {
    id: u32,
    #[serde(default)]
    fields: Map<String, Value>,
    #[serde(default)]
    relations: Vec<RawRelation>,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    rel: String,
    #[serde(default)]
    url: String,
}

impl AzureDevOpsClient {
    /// Create a new client for an organization or collection URL.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_version: "7.0".to_string(),
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Create from the `[server]` configuration section.
    pub fn from_config(server: &ServerConfig) -> Self {
        let token = server.token();
        if token.is_none() {
            tracing::warn!("No personal access token configured; requests are anonymous");
        }
        Self::new(&server.url, token).with_api_version(&server.api_version)
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Ids of the work items a project's query selects, in query order.
    pub async fn query_ids(&self, project: &ProjectConfig) -> SourceResult<Vec<u32>> {
        let result: WiqlResult = if let Some(path) = &project.query {
            let query = self.saved_query(&project.name, path).await?;
            tracing::debug!("Running saved query '{}' ({})", path, query.id);
            let url = self.project_api(&project.name, &format!("wit/wiql/{}", query.id));
            self.send(self.client.get(&url)).await?
        } else {
            let wiql = project.wiql.as_deref().unwrap_or(DEFAULT_WIQL);
            let url = self.project_api(&project.name, "wit/wiql");
            self.send(self.client.post(&url).json(&serde_json::json!({ "query": wiql }))).await?
        };

        Ok(result.ids())
    }

    /// Fetch work items by id, in batches of [`BATCH_SIZE`].
    ///
    /// Ids that no longer exist are skipped.
    pub async fn get_work_items(
        &self,
        ids: &[u32],
        fields: &FieldMapping,
        project: &str,
    ) -> SourceResult<Vec<WorkItem>> {
        let url = format!("{}/_apis/wit/workitems", self.base_url);
        let mut items = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(BATCH_SIZE) {
            let ids = chunk.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
            let request = self.client.get(&url).query(&[
                ("ids", ids.as_str()),
                ("$expand", "relations"),
                ("errorPolicy", "omit"),
            ]);
            let batch: WorkItemBatch = self.send(request).await?;
            items.extend(batch.value.into_iter().flatten().map(|raw| raw.into_work_item(fields, project)));
        }

        Ok(items)
    }

    async fn saved_query(&self, project: &str, path: &str) -> SourceResult<SavedQuery> {
        let encoded = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let url = self.project_api(project, &format!("wit/queries/{}", encoded));

        let query: SavedQuery = self.send(self.client.get(&url)).await?;
        if query.is_folder {
            return Err(SourceError::InvalidResponse(format!("'{}' is a query folder", path)));
        }
        Ok(query)
    }

    fn project_api(&self, project: &str, path: &str) -> String {
        format!("{}/{}/_apis/{}", self.base_url, urlencoding::encode(project), path)
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> SourceResult<T> {
        let mut request = request.query(&[("api-version", self.api_version.as_str())]);
        if let Some(token) = &self.token {
            request = request.basic_auth("", Some(token));
        }

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();

        // An invalid token gets a 203 with the sign-in page instead of a 401.
        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::NON_AUTHORITATIVE_INFORMATION
        {
            return Err(SourceError::Unauthorized);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api(format!("{} ({})", api_message(&body), status)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| SourceError::InvalidResponse(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl WorkItemSource for AzureDevOpsClient {
    async fn fetch(
        &self,
        project: &ProjectConfig,
        fields: &FieldMapping,
    ) -> anyhow::Result<Vec<WorkItem>> {
        tracing::debug!("Date fields for '{}': {}", project.name, fields.field_names().join(", "));
        let ids = self.query_ids(project).await?;
        tracing::info!("Query for '{}' matched {} work items", project.name, ids.len());
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.get_work_items(&ids, fields, &project.name).await?)
    }

    fn name(&self) -> &str {
        "azure-devops"
    }
}

impl WiqlResult {
    /// Flat queries list `workItems`; tree and link queries list relations.
    fn ids(self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.work_items.into_iter().map(|r| r.id).collect();
        for link in self.work_item_relations {
            for id in [link.source, link.target].into_iter().flatten().map(|r| r.id) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        ids
    }
}

impl RawWorkItem {
    fn into_work_item(self, mapping: &FieldMapping, project: &str) -> WorkItem {
        let kind = WorkItemType::parse(&field_text(&self.fields, "System.WorkItemType").unwrap_or_default());

        let mut item = WorkItem::new(
            self.id,
            kind,
            field_text(&self.fields, "System.Title").unwrap_or_default(),
        )
        .with_state(field_text(&self.fields, "System.State").unwrap_or_default())
        .with_project(project);

        if let Some(assignee) = self.fields.get("System.AssignedTo").and_then(identity_name) {
            item = item.with_assignee(assignee);
        }

        let parent = self
            .fields
            .get("System.Parent")
            .and_then(Value::as_u64)
            .and_then(|id| u32::try_from(id).ok())
            .or_else(|| self.parent_from_relations());
        if let Some(parent) = parent {
            item = item.with_parent(parent);
        }

        if let Some(dates) = mapping.for_type(kind) {
            item.start = field_text(&self.fields, &dates.start);
            item.end = field_text(&self.fields, &dates.end);
        }

        item
    }

    fn parent_from_relations(&self) -> Option<u32> {
        self.relations
            .iter()
            .find(|r| r.rel == PARENT_LINK)
            .and_then(|r| r.url.rsplit('/').next())
            .and_then(|id| id.parse().ok())
    }
}

/// A field value as text; empty strings and nulls are absent.
fn field_text(fields: &Map<String, Value>, name: &str) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    match fields.get(name)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Display name of an identity field.
///
/// Newer API versions return an object; older servers return
/// `"Name <DOMAIN\\user>"`.
fn identity_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::Object(identity) => identity
            .get("displayName")
            .or_else(|| identity.get("uniqueName"))
            .and_then(Value::as_str)?,
        Value::String(s) => s.split(" <").next().unwrap_or(s),
        _ => return None,
    };
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Best-effort message from an error body.
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}
