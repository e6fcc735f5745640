//! # Azure2Md
//!
//! Work item reports for Azure DevOps, written as Markdown with Mermaid Gantt charts.
//!
//! Azure2Md pulls features, user stories and tasks from one or more projects,
//! rebuilds the Feature → Story → Task hierarchy from parent links and renders
//! timelines, status overviews and per-assignee breakdowns.
//!
//! ## Features
//!
//! - **Hierarchy Resolution**: Orphaned stories and tasks land in their own buckets
//! - **Configurable Dates**: Per-type start/end field mapping with sensible defaults
//! - **Gantt Views**: Full, feature-level and story-level Mermaid diagrams
//! - **Merge Mode**: One combined report across projects
//! - **Localization**: English and Simplified Chinese labels
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a starter configuration
//! azure2md init
//!
//! # Generate reports
//! AZURE_DEVOPS_PAT=... azure2md generate
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::derivable_impls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::map_unwrap_or)]
#![allow(clippy::needless_lifetimes)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::format_push_string)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app;
pub mod core;
pub mod i18n;
pub mod report;

#[cfg(feature = "azure")]
pub mod integrations;

#[cfg(feature = "azure")]
pub use integrations::{AzureDevOpsClient, SourceError};

// Re-export commonly used types
pub use app::{App, Document, GenerateOptions, WorkItemSource};
pub use core::{Config, ProjectScope, WorkItem, WorkItemType};
pub use i18n::Texts;
pub use report::ReportAssembler;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "azure2md";
