//! Work item model.
//!
//! Work items are immutable snapshots of the backend's records, already
//! converted from the backend's field bag into a typed record.

use serde::{Deserialize, Serialize};

use super::config::FieldMapping;

/// Kind of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkItemType {
    /// Top-level planning item
    Feature,
    /// Story, child of a feature
    UserStory,
    /// Task, child of a story
    Task,
    /// Anything else the query returned (bugs, epics, ...)
    Other,
}

impl WorkItemType {
    /// Parse a backend type name (`System.WorkItemType`).
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("feature") {
            Self::Feature
        } else if name.eq_ignore_ascii_case("user story")
            || name.eq_ignore_ascii_case("userstory")
            || name.eq_ignore_ascii_case("product backlog item")
        {
            Self::UserStory
        } else if name.eq_ignore_ascii_case("task") {
            Self::Task
        } else {
            Self::Other
        }
    }

    /// Key used to look up the localized type name.
    pub fn text_key(&self) -> &'static str {
        match self {
            Self::Feature => "TypeFeature",
            Self::UserStory => "TypeUserStory",
            Self::Task => "TypeTask",
            Self::Other => "TypeOther",
        }
    }

    /// Default scheduling span in days, used when no date can be resolved.
    pub fn default_span_days(&self) -> i64 {
        match self {
            Self::Feature => 30,
            Self::UserStory => 14,
            Self::Task | Self::Other => 7,
        }
    }
}

impl std::fmt::Display for WorkItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Feature => "Feature",
            Self::UserStory => "User Story",
            Self::Task => "Task",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}

/// A tracked work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Backend id, unique across the organization
    pub id: u32,
    /// Item kind
    pub kind: WorkItemType,
    /// Title
    pub title: String,
    /// Free-text state label from the backend
    pub state: String,
    /// Assignee display name
    pub assignee: Option<String>,
    /// Id of the parent item
    pub parent_id: Option<u32>,
    /// Name of the project the item was fetched from
    pub project: String,
    /// Raw start value of the configured start field
    pub start: Option<String>,
    /// Raw end value of the configured end field
    pub end: Option<String>,
}

impl WorkItem {
    /// Create a work item with the minimum required fields.
    pub fn new(id: u32, kind: WorkItemType, title: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            title: title.into(),
            state: String::new(),
            assignee: None,
            parent_id: None,
            project: String::new(),
            start: None,
            end: None,
        }
    }

    /// Set the state label.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// Set the assignee.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Set the parent id.
    pub fn with_parent(mut self, parent_id: u32) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Set the originating project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Set the raw start/end values.
    pub fn with_dates(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.map(str::to_string);
        self.end = end.map(str::to_string);
        self
    }

    /// Trimmed assignee name, `None` when unassigned or blank.
    pub fn assignee_name(&self) -> Option<&str> {
        self.assignee.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }

    /// Title used in diagrams and tables; never empty.
    pub fn display_title(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            format!("#{}", self.id)
        } else {
            title.to_string()
        }
    }
}

/// The items retrieved for one configured project.
#[derive(Debug, Clone)]
pub struct ProjectScope {
    /// Project name
    pub name: String,
    /// Web URL of the project
    pub url: String,
    /// Items in query order
    pub items: Vec<WorkItem>,
    /// Date field mapping used for this project
    pub fields: FieldMapping,
}

impl ProjectScope {
    /// Create a new scope.
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        items: Vec<WorkItem>,
        fields: FieldMapping,
    ) -> Self {
        Self { name: name.into(), url: url.into(), items, fields }
    }

    /// Whether the scope has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_work_item_type() {
        assert_eq!(WorkItemType::parse("Feature"), WorkItemType::Feature);
        assert_eq!(WorkItemType::parse("User Story"), WorkItemType::UserStory);
        assert_eq!(WorkItemType::parse("user story"), WorkItemType::UserStory);
        assert_eq!(WorkItemType::parse("Product Backlog Item"), WorkItemType::UserStory);
        assert_eq!(WorkItemType::parse(" TASK "), WorkItemType::Task);
        assert_eq!(WorkItemType::parse("Bug"), WorkItemType::Other);
        assert_eq!(WorkItemType::parse(""), WorkItemType::Other);
    }

    #[test]
    fn test_default_span_days() {
        assert_eq!(WorkItemType::Feature.default_span_days(), 30);
        assert_eq!(WorkItemType::UserStory.default_span_days(), 14);
        assert_eq!(WorkItemType::Task.default_span_days(), 7);
        assert_eq!(WorkItemType::Other.default_span_days(), 7);
    }

    #[test]
    fn test_builder_methods() {
        let item = WorkItem::new(3, WorkItemType::Task, "Write tests")
            .with_state("Active")
            .with_assignee("Ada")
            .with_parent(2)
            .with_project("Web")
            .with_dates(Some("2024-01-01"), None);

        assert_eq!(item.state, "Active");
        assert_eq!(item.assignee.as_deref(), Some("Ada"));
        assert_eq!(item.parent_id, Some(2));
        assert_eq!(item.project, "Web");
        assert_eq!(item.start.as_deref(), Some("2024-01-01"));
        assert!(item.end.is_none());
    }

    #[test]
    fn test_display_title_falls_back_to_id() {
        let item = WorkItem::new(42, WorkItemType::Task, "   ");
        assert_eq!(item.display_title(), "#42");
    }

    #[test]
    fn test_assignee_name() {
        let item = WorkItem::new(1, WorkItemType::Task, "t");
        assert_eq!(item.assignee_name(), None);
        assert_eq!(item.clone().with_assignee("   ").assignee_name(), None);
        assert_eq!(item.with_assignee(" Ada ").assignee_name(), Some("Ada"));
    }
}
