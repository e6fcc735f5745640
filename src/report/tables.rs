//! Markdown tables.

use crate::core::WorkItem;
use crate::i18n::Texts;

use super::Schedule;

/// A work item column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Project,
    Id,
    Type,
    Title,
    State,
    Assignee,
    Start,
    End,
    Parent,
}

impl Column {
    /// Columns of the per-type detail tables.
    pub const DETAIL: &'static [Self] =
        &[Self::Id, Self::Title, Self::State, Self::Assignee, Self::Start, Self::End];

    /// Detail columns plus the parent id.
    pub const DETAIL_WITH_PARENT: &'static [Self] =
        &[Self::Id, Self::Title, Self::State, Self::Assignee, Self::Start, Self::End, Self::Parent];

    /// Columns of the per-assignee tables.
    pub const ASSIGNEE: &'static [Self] =
        &[Self::Id, Self::Type, Self::Title, Self::State, Self::Start, Self::End];

    fn header_key(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Id => "Id",
            Self::Type => "Type",
            Self::Title => "Title",
            Self::State => "State",
            Self::Assignee => "Assignee",
            Self::Start => "Start",
            Self::End => "End",
            Self::Parent => "Parent",
        }
    }

    fn value(self, item: &WorkItem, schedule: &Schedule, texts: Texts) -> String {
        match self {
            Self::Project => item.project.clone(),
            Self::Id => item.id.to_string(),
            Self::Type => texts.get(item.kind.text_key()).to_string(),
            Self::Title => item.display_title(),
            Self::State => item.state.clone(),
            Self::Assignee => item.assignee_name().unwrap_or(texts.get("Unassigned")).to_string(),
            Self::Start => schedule.span(item).start_str(),
            Self::End => schedule.span(item).end_str(),
            Self::Parent => item.parent_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }
}

/// A Markdown table.
#[derive(Debug, Clone, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { headers: headers.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Table of work items with the given columns.
    pub fn of_items<'a, I>(columns: &[Column], items: I, schedule: &Schedule, texts: Texts) -> Self
    where
        I: IntoIterator<Item = &'a WorkItem>,
    {
        let mut table = Self::new(columns.iter().map(|c| texts.get(c.header_key())));
        for item in items {
            table.push_row(columns.iter().map(|c| c.value(item, schedule, texts)));
        }
        table
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    /// Render with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&render_row(&self.headers));
        out.push_str(&render_row(&vec!["---".to_string(); self.headers.len()]));
        for row in &self.rows {
            out.push_str(&render_row(row));
        }
        out
    }
}

fn render_row(cells: &[String]) -> String {
    let cells: Vec<String> = cells.iter().map(|c| escape_cell(c)).collect();
    format!("| {} |\n", cells.join(" | "))
}

/// Escape a value for use inside a table cell.
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace("\r\n", " ").replace(['\n', '\r'], " ")
}
