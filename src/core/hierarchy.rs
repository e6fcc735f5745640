//! Feature → User Story → Task trees built from flat parent references.
//!
//! Children point at parents through `parent_id` only. A parent link is
//! accepted when the id resolves to an item of the expected parent type in
//! the same item set; anything else lands in the orphan bucket of its own
//! type. Every bucket keeps input order.

use std::collections::HashSet;

use super::work_item::{WorkItem, WorkItemType};

/// A user story with its tasks.
#[derive(Debug, Clone)]
pub struct StoryNode<'a> {
    pub item: &'a WorkItem,
    pub tasks: Vec<&'a WorkItem>,
}

/// A feature with its stories.
#[derive(Debug, Clone)]
pub struct FeatureNode<'a> {
    pub item: &'a WorkItem,
    pub stories: Vec<StoryNode<'a>>,
}

/// The resolved tree of an item set.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy<'a> {
    /// Features with their stories and tasks
    pub features: Vec<FeatureNode<'a>>,
    /// Stories without a feature parent in scope, with their tasks
    pub orphan_stories: Vec<StoryNode<'a>>,
    /// Tasks without a story parent in scope
    pub orphan_tasks: Vec<&'a WorkItem>,
    /// Items that are neither features, stories nor tasks
    pub others: Vec<&'a WorkItem>,
    /// All story nodes in input order
    stories: Vec<StoryNode<'a>>,
}

impl<'a> Hierarchy<'a> {
    /// Build the tree for a set of items.
    pub fn build<I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a WorkItem>,
    {
        let items: Vec<&'a WorkItem> = items.into_iter().collect();

        let ids_of = |kind: WorkItemType| -> HashSet<u32> {
            items.iter().filter(|i| i.kind == kind).map(|i| i.id).collect()
        };
        let feature_ids = ids_of(WorkItemType::Feature);
        let story_ids = ids_of(WorkItemType::UserStory);

        let tasks_of = |story_id: u32| -> Vec<&'a WorkItem> {
            items
                .iter()
                .copied()
                .filter(|i| i.kind == WorkItemType::Task && i.parent_id == Some(story_id))
                .collect()
        };

        let stories: Vec<StoryNode<'a>> = items
            .iter()
            .copied()
            .filter(|i| i.kind == WorkItemType::UserStory)
            .map(|item| StoryNode { item, tasks: tasks_of(item.id) })
            .collect();

        let features = items
            .iter()
            .copied()
            .filter(|i| i.kind == WorkItemType::Feature)
            .map(|item| FeatureNode {
                item,
                stories: stories
                    .iter()
                    .filter(|s| s.item.parent_id == Some(item.id))
                    .cloned()
                    .collect(),
            })
            .collect();

        let orphan_stories = stories
            .iter()
            .filter(|s| !s.item.parent_id.is_some_and(|p| feature_ids.contains(&p)))
            .cloned()
            .collect();

        let orphan_tasks = items
            .iter()
            .copied()
            .filter(|i| i.kind == WorkItemType::Task)
            .filter(|i| !i.parent_id.is_some_and(|p| story_ids.contains(&p)))
            .collect();

        let others = items.iter().copied().filter(|i| i.kind == WorkItemType::Other).collect();

        Self { features, orphan_stories, orphan_tasks, others, stories }
    }

    /// Every story node, attached or orphaned, in input order.
    pub fn stories(&self) -> &[StoryNode<'a>] {
        &self.stories
    }

    /// Whether the set contains at least one feature.
    pub fn has_features(&self) -> bool {
        !self.features.is_empty()
    }

    /// Whether the set contains at least one story.
    pub fn has_stories(&self) -> bool {
        !self.stories.is_empty()
    }

    /// Whether the set contains no items at all.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
            && self.stories.is_empty()
            && self.orphan_tasks.is_empty()
            && self.others.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: u32, title: &str) -> WorkItem {
        WorkItem::new(id, WorkItemType::Feature, title)
    }

    fn story(id: u32, title: &str, parent: Option<u32>) -> WorkItem {
        let item = WorkItem::new(id, WorkItemType::UserStory, title);
        match parent {
            Some(p) => item.with_parent(p),
            None => item,
        }
    }

    fn task(id: u32, title: &str, parent: Option<u32>) -> WorkItem {
        let item = WorkItem::new(id, WorkItemType::Task, title);
        match parent {
            Some(p) => item.with_parent(p),
            None => item,
        }
    }

    fn ids(items: &[&WorkItem]) -> Vec<u32> {
        items.iter().map(|i| i.id).collect()
    }

    /// Count how many positions each id occupies in the tree.
    fn placements(h: &Hierarchy<'_>) -> Vec<u32> {
        let mut seen = Vec::new();
        for f in &h.features {
            seen.push(f.item.id);
            for s in &f.stories {
                seen.push(s.item.id);
                seen.extend(s.tasks.iter().map(|t| t.id));
            }
        }
        for s in &h.orphan_stories {
            seen.push(s.item.id);
            seen.extend(s.tasks.iter().map(|t| t.id));
        }
        seen.extend(h.orphan_tasks.iter().map(|t| t.id));
        seen.extend(h.others.iter().map(|t| t.id));
        seen.sort_unstable();
        seen
    }

    #[test]
    fn test_basic_tree() {
        let items = vec![
            feature(1, "Auth"),
            story(2, "Login", Some(1)),
            task(3, "Form", Some(2)),
            task(4, "Api", Some(2)),
        ];
        let h = Hierarchy::build(&items);

        assert_eq!(h.features.len(), 1);
        assert_eq!(h.features[0].stories.len(), 1);
        assert_eq!(ids(&h.features[0].stories[0].tasks), vec![3, 4]);
        assert!(h.orphan_stories.is_empty());
        assert!(h.orphan_tasks.is_empty());
    }

    #[test]
    fn test_unresolved_parent_is_orphan() {
        let items = vec![story(2, "Login", None), task(3, "Ghost", Some(99))];
        let h = Hierarchy::build(&items);

        assert_eq!(h.orphan_stories.len(), 1);
        assert_eq!(ids(&h.orphan_tasks), vec![3]);
        assert!(h.stories()[0].tasks.is_empty());
    }

    #[test]
    fn test_task_under_orphan_story_stays_attached() {
        let items = vec![story(2, "Login", Some(50)), task(3, "Form", Some(2))];
        let h = Hierarchy::build(&items);

        assert_eq!(h.orphan_stories.len(), 1);
        assert_eq!(ids(&h.orphan_stories[0].tasks), vec![3]);
        assert!(h.orphan_tasks.is_empty());
    }

    #[test]
    fn test_wrong_parent_type_is_orphan() {
        // Story pointing at a task, task pointing at a feature
        let items = vec![feature(1, "F"), task(2, "T", Some(1)), story(3, "S", Some(2))];
        let h = Hierarchy::build(&items);

        assert!(h.features[0].stories.is_empty());
        assert_eq!(ids(&h.orphan_tasks), vec![2]);
        assert_eq!(h.orphan_stories.len(), 1);
        assert_eq!(h.orphan_stories[0].item.id, 3);
    }

    #[test]
    fn test_input_order_is_preserved() {
        let items = vec![
            feature(10, "B"),
            feature(5, "A"),
            story(30, "S30", Some(5)),
            story(20, "S20", Some(5)),
            task(41, "T41", None),
            task(40, "T40", None),
        ];
        let h = Hierarchy::build(&items);

        let feature_ids: Vec<u32> = h.features.iter().map(|f| f.item.id).collect();
        assert_eq!(feature_ids, vec![10, 5]);
        let story_ids: Vec<u32> = h.features[1].stories.iter().map(|s| s.item.id).collect();
        assert_eq!(story_ids, vec![30, 20]);
        assert_eq!(ids(&h.orphan_tasks), vec![41, 40]);
    }

    #[test]
    fn test_every_item_placed_exactly_once() {
        let items = vec![
            feature(1, "F1"),
            feature(2, "F2"),
            story(3, "S3", Some(1)),
            story(4, "S4", Some(2)),
            story(5, "S5", Some(77)),
            story(6, "S6", None),
            task(7, "T7", Some(3)),
            task(8, "T8", Some(5)),
            task(9, "T9", Some(1)),
            task(10, "T10", None),
            WorkItem::new(11, WorkItemType::Other, "Bug"),
        ];
        let h = Hierarchy::build(&items);

        let expected: Vec<u32> = (1..=11).collect();
        assert_eq!(placements(&h), expected);
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<WorkItem> = Vec::new();
        let h = Hierarchy::build(&items);
        assert!(h.is_empty());
        assert!(!h.has_features());
        assert!(!h.has_stories());
    }
}
