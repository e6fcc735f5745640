//! Mapping of backend state labels onto Gantt task states.

/// Rendering state of a work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Finished in any way
    Done,
    /// Being worked on
    Active,
    /// No marker
    None,
}

const DONE_STATES: &[&str] = &["done", "closed", "completed", "resolved", "removed"];
const ACTIVE_STATES: &[&str] = &["active", "in progress", "doing"];

impl Status {
    /// Mermaid task tag for this state; empty when no marker applies.
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Active => "active",
            Self::None => "",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Classify a free-text state label.
pub fn classify(state: &str) -> Status {
    let state = state.trim();
    if DONE_STATES.iter().any(|s| state.eq_ignore_ascii_case(s)) {
        Status::Done
    } else if ACTIVE_STATES.iter().any(|s| state.eq_ignore_ascii_case(s)) {
        Status::Active
    } else {
        Status::None
    }
}
