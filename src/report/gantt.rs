//! Mermaid Gantt diagram rendering.
//!
//! ```text
//! gantt
//!     title <text>
//!     dateFormat YYYY-MM-DD
//!     section <name>
//!     <label> :<status>, <start>, <end>
//! ```

use std::fmt::Write as _;

use crate::core::{classify, DisplayOptions, Hierarchy, StoryNode, WorkItem};
use crate::i18n::Texts;

use super::Schedule;

/// Which levels of the tree a diagram shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GanttView {
    /// Feature → Story → Task
    Full,
    /// Feature → Story
    FeatureLevel,
    /// Story → Task
    StoryLevel,
}

impl GanttView {
    /// Full when the scope has features, story-level otherwise.
    ///
    /// Both keep every story and task of the scope in the diagram.
    pub fn auto(hierarchy: &Hierarchy<'_>) -> Self {
        if hierarchy.has_features() {
            Self::Full
        } else {
            Self::StoryLevel
        }
    }
}

/// Renders diagrams for item scopes.
#[derive(Debug, Clone, Copy)]
pub struct GanttRenderer<'a> {
    display: DisplayOptions,
    texts: Texts,
    schedule: &'a Schedule,
}

impl<'a> GanttRenderer<'a> {
    pub fn new(display: DisplayOptions, texts: Texts, schedule: &'a Schedule) -> Self {
        Self { display, texts, schedule }
    }

    /// Render a fenced `mermaid` block.
    pub fn render(&self, title: &str, hierarchy: &Hierarchy<'_>, view: GanttView) -> String {
        let sections = match view {
            GanttView::Full => self.full_sections(hierarchy),
            GanttView::FeatureLevel => self.feature_sections(hierarchy),
            GanttView::StoryLevel => self.story_sections(hierarchy),
        };

        let mut out = String::new();
        out.push_str("```mermaid\n");
        out.push_str("gantt\n");
        let _ = writeln!(out, "    title {}", sanitize(title));
        out.push_str("    dateFormat YYYY-MM-DD\n");
        for (name, lines) in sections {
            if lines.is_empty() {
                continue;
            }
            let _ = writeln!(out, "    section {}", sanitize(&name));
            for line in lines {
                let _ = writeln!(out, "    {}", line);
            }
        }
        out.push_str("```\n");
        out
    }

    fn full_sections(&self, hierarchy: &Hierarchy<'_>) -> Vec<(String, Vec<String>)> {
        let mut sections = Vec::new();

        for feature in &hierarchy.features {
            let mut lines = Vec::new();
            if self.display.show_feature_in_gantt {
                lines.push(self.line(feature.item, None));
            }
            for story in &feature.stories {
                self.push_story(&mut lines, story, Some(feature.item));
            }
            sections.push((feature.item.display_title(), lines));
        }

        let mut lines = Vec::new();
        for story in &hierarchy.orphan_stories {
            self.push_story(&mut lines, story, None);
        }
        sections.push((self.texts.get("OtherUserStories").to_string(), lines));

        sections.push((self.texts.get("OtherTasks").to_string(), self.orphan_task_lines(hierarchy)));
        sections
    }

    fn feature_sections(&self, hierarchy: &Hierarchy<'_>) -> Vec<(String, Vec<String>)> {
        let mut sections = Vec::new();

        for feature in &hierarchy.features {
            let mut lines = Vec::new();
            if self.display.show_feature_in_gantt {
                lines.push(self.line(feature.item, None));
            }
            if self.display.show_user_story_in_gantt {
                lines.extend(feature.stories.iter().map(|s| self.line(s.item, Some(feature.item))));
            }
            sections.push((feature.item.display_title(), lines));
        }

        let lines = if self.display.show_user_story_in_gantt {
            hierarchy.orphan_stories.iter().map(|s| self.line(s.item, None)).collect()
        } else {
            Vec::new()
        };
        sections.push((self.texts.get("OtherUserStories").to_string(), lines));
        sections
    }

    fn story_sections(&self, hierarchy: &Hierarchy<'_>) -> Vec<(String, Vec<String>)> {
        let mut sections = Vec::new();

        for story in hierarchy.stories() {
            let mut lines = Vec::new();
            self.push_story(&mut lines, story, None);
            sections.push((story.item.display_title(), lines));
        }

        sections.push((self.texts.get("OtherTasks").to_string(), self.orphan_task_lines(hierarchy)));
        sections
    }

    /// Story line (when enabled) followed by its tasks.
    fn push_story(&self, lines: &mut Vec<String>, story: &StoryNode<'_>, parent: Option<&WorkItem>) {
        if self.display.show_user_story_in_gantt {
            lines.push(self.line(story.item, parent));
        }
        lines.extend(story.tasks.iter().map(|t| self.line(t, Some(story.item))));
    }

    fn orphan_task_lines(&self, hierarchy: &Hierarchy<'_>) -> Vec<String> {
        hierarchy.orphan_tasks.iter().map(|t| self.line(t, None)).collect()
    }

    fn line(&self, item: &WorkItem, parent: Option<&WorkItem>) -> String {
        let label = match parent {
            Some(parent) if self.display.prefix_parent_name => {
                format!("{} - {}", parent.display_title(), item.display_title())
            }
            _ => item.display_title(),
        };

        let span = self.schedule.span(item);
        let marker = classify(&item.state).marker();
        if marker.is_empty() {
            format!("{} :{}, {}", sanitize(&label), span.start_str(), span.end_str())
        } else {
            format!("{} :{}, {}, {}", sanitize(&label), marker, span.start_str(), span.end_str())
        }
    }
}

/// Make text safe for a Mermaid gantt line.
///
/// `:` separates a label from its data and `;` ends a statement, so both
/// are replaced. Whitespace runs (including newlines) collapse to one space.
pub fn sanitize(text: &str) -> String {
    text.replace(':', " ")
        .replace(';', ",")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
