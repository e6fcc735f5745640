//! Markdown report generation.
//!
//! Turns project scopes into Markdown documents with Mermaid Gantt charts,
//! status tables and per-assignee sections.

mod assembler;
pub mod gantt;
mod tables;

pub use assembler::ReportAssembler;
pub use gantt::{GanttRenderer, GanttView};
pub use tables::{Column, Table};

use std::collections::HashMap;

use crate::core::{DateResolver, DateSpan, FieldMapping, ProjectScope, WorkItem};

/// Resolved dates of every item in the scopes being rendered.
///
/// Dates are resolved once per item with the mapping of the project the
/// item came from, so merged reports keep per-project field mappings.
/// Spans are keyed by project name and id.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    spans: HashMap<String, HashMap<u32, DateSpan>>,
    resolver: DateResolver,
}

impl Schedule {
    /// Resolve all items of one scope.
    pub fn for_scope(scope: &ProjectScope, resolver: DateResolver) -> Self {
        Self::for_scopes(std::slice::from_ref(scope), resolver)
    }

    /// Resolve all items of several scopes.
    pub fn for_scopes(scopes: &[ProjectScope], resolver: DateResolver) -> Self {
        let mut spans: HashMap<String, HashMap<u32, DateSpan>> = HashMap::new();
        for scope in scopes {
            for item in &scope.items {
                let span = resolver.resolve(item, &scope.fields);
                let project = spans.entry(item.project.clone()).or_default();
                if project.insert(item.id, span).is_some() {
                    tracing::warn!(
                        "Work item #{} appears more than once in '{}'",
                        item.id,
                        item.project
                    );
                }
            }
        }
        Self { spans, resolver }
    }

    /// Dates of an item.
    pub fn span(&self, item: &WorkItem) -> DateSpan {
        self.spans
            .get(item.project.as_str())
            .and_then(|project| project.get(&item.id))
            .copied()
            .unwrap_or_else(|| self.resolver.resolve(item, &FieldMapping::default()))
    }
}
