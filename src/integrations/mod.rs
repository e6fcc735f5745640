//! External integrations module.
//!
//! Work item sources backed by remote trackers.

pub mod azure_devops;

pub use azure_devops::{AzureDevOpsClient, SourceError, SourceResult, BATCH_SIZE, DEFAULT_WIQL};
