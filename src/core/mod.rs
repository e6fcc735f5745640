//! Core types and functionality for Azure2Md.
//!
//! This module contains the fundamental data structures used throughout
//! the application: work items, configuration, date resolution, status
//! classification, hierarchy building and grouping.

mod config;
mod dates;
mod grouping;
mod hierarchy;
mod status;
mod work_item;

pub use config::{
    Config, ConfigError, DateFields, DisplayOptions, FieldMapping, GanttLayout, GeneralConfig,
    ProjectConfig, ServerConfig, LOCAL_CONFIG_FILE, TOKEN_ENV_VAR,
};
pub use dates::{parse_date, DateResolver, DateSpan, DATE_FORMAT};
pub use grouping::{group_by_assignee, group_by_project, Group, StatusCounts};
pub use hierarchy::{FeatureNode, Hierarchy, StoryNode};
pub use status::{classify, Status};
pub use work_item::{ProjectScope, WorkItem, WorkItemType};
