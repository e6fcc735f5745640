//! Grouping of work items by assignee and by project, with status counts.

use super::status::classify;
use super::work_item::WorkItem;

/// Items sharing a key, in input order.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub key: String,
    pub items: Vec<&'a WorkItem>,
}

impl<'a> Group<'a> {
    /// Status counts for the group.
    pub fn counts(&self) -> StatusCounts {
        StatusCounts::from_items(self.items.iter().copied())
    }
}

/// Total, done and active item counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub done: usize,
    pub active: usize,
}

impl StatusCounts {
    /// Count items by rendering state.
    pub fn from_items<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a WorkItem>,
    {
        items.into_iter().fold(Self::default(), |mut acc, item| {
            let status = classify(&item.state);
            acc.total += 1;
            acc.done += usize::from(status.is_done());
            acc.active += usize::from(status.is_active());
            acc
        })
    }

    /// Add another set of counts.
    pub fn add(&mut self, other: Self) {
        self.total += other.total;
        self.done += other.done;
        self.active += other.active;
    }
}

/// Group items by assignee display name.
///
/// Items without an assignee are grouped under `unassigned_label`.
pub fn group_by_assignee<'a, I>(items: I, unassigned_label: &str) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a WorkItem>,
{
    group_by(items, |item| item.assignee_name().unwrap_or(unassigned_label).to_string())
}

/// Group items by originating project.
pub fn group_by_project<'a, I>(items: I) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a WorkItem>,
{
    group_by(items, |item| item.project.clone())
}

/// Group by an arbitrary key, keeping first-seen key order.
fn group_by<'a, I, F>(items: I, key_of: F) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a WorkItem>,
    F: Fn(&WorkItem) -> String,
{
    let mut groups: Vec<Group<'a>> = Vec::new();
    for item in items {
        let key = key_of(item);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.items.push(item),
            None => groups.push(Group { key, items: vec![item] }),
        }
    }
    groups
}
