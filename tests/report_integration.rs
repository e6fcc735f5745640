//! Report Integration Tests
//!
//! Renders complete documents through the public API.

use azure2md::core::{DateResolver, DisplayOptions, FieldMapping, GanttLayout, ProjectScope};
use azure2md::{ReportAssembler, Texts, WorkItem, WorkItemType};
use chrono::NaiveDate;

fn resolver() -> DateResolver {
    DateResolver::with_today(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
}

fn assembler(language: &str, layout: GanttLayout) -> ReportAssembler {
    ReportAssembler::new(Texts::new(language), DisplayOptions::default(), layout)
        .with_resolver(resolver())
}

fn scope(name: &str, items: Vec<WorkItem>) -> ProjectScope {
    let url = format!("https://dev.azure.com/org/{}", name);
    let items = items.into_iter().map(|i| i.with_project(name)).collect();
    ProjectScope::new(name, url, items, FieldMapping::default())
}

/// Feature "Auth" > Story "Login" > Task "Login".
fn auth_items() -> Vec<WorkItem> {
    vec![
        WorkItem::new(1, WorkItemType::Feature, "Auth"),
        WorkItem::new(2, WorkItemType::UserStory, "Login").with_parent(1),
        WorkItem::new(3, WorkItemType::Task, "Login").with_parent(2).with_state("Active"),
    ]
}

/// Every mermaid block of a document.
fn diagrams(doc: &str) -> Vec<&str> {
    doc.split("```mermaid\n").skip(1).filter_map(|rest| rest.split("```").next()).collect()
}

/// `(name, body)` of every per-assignee subsection.
fn assignee_sections(doc: &str) -> Vec<(&str, &str)> {
    let (_, by_assignee) = doc.split_once("## By Assignee\n\n").unwrap();
    by_assignee.split("### ").skip(1).filter_map(|s| s.split_once('\n')).collect()
}

/// Features, attached and orphaned stories and tasks, spread over three people.
fn mixed_items() -> Vec<WorkItem> {
    vec![
        WorkItem::new(1, WorkItemType::Feature, "Auth").with_assignee("Ada"),
        WorkItem::new(2, WorkItemType::UserStory, "Login").with_parent(1).with_assignee("Grace"),
        WorkItem::new(3, WorkItemType::Task, "Form").with_parent(2).with_assignee("Ada"),
        WorkItem::new(4, WorkItemType::Task, "Docs").with_parent(99).with_assignee("Ada"),
        WorkItem::new(5, WorkItemType::UserStory, "Search").with_assignee("Linus"),
        WorkItem::new(6, WorkItemType::Task, "Index").with_parent(5).with_assignee("Grace"),
        WorkItem::new(7, WorkItemType::Task, "Cleanup").with_parent(1),
        WorkItem::new(8, WorkItemType::Feature, "Billing").with_assignee(" "),
    ]
}

fn is_story_or_task(item: &WorkItem) -> bool {
    matches!(item.kind, WorkItemType::UserStory | WorkItemType::Task)
}

// ============================================================================
// Single Project Tests
// ============================================================================

#[test]
fn test_single_task_document() {
    let items = vec![WorkItem::new(3, WorkItemType::Task, "Form")
        .with_state("Active")
        .with_assignee("Ada")
        .with_dates(Some("2024-01-03"), Some("2024-01-05"))];
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Web", items));

    let expected = r"# Work Item Report: Web

[Open project in Azure DevOps](https://dev.azure.com/org/Web)

Generated on: 2024-01-01

## Overview

| Total | Done | Active |
| --- | --- | --- |
| 1 | 0 | 1 |

## Timeline

### User Story Timeline

```mermaid
gantt
    title Web - User Story Timeline
    dateFormat YYYY-MM-DD
    section Other Tasks
    Form :active, 2024-01-03, 2024-01-05
```

## Details

### Features

No items.

### User Stories

No items.

### Tasks

| ID | Title | State | Assignee | Start | End | Parent |
| --- | --- | --- | --- | --- | --- | --- |
| 3 | Form | Active | Ada | 2024-01-03 | 2024-01-05 |  |

## By Assignee

### Ada

| Total | Done | Active |
| --- | --- | --- |
| 1 | 0 | 1 |

```mermaid
gantt
    title Ada
    dateFormat YYYY-MM-DD
    section Other Tasks
    Form :active, 2024-01-03, 2024-01-05
```

| ID | Type | Title | State | Start | End |
| --- | --- | --- | --- | --- | --- |
| 3 | Task | Form | Active | 2024-01-03 | 2024-01-05 |

";
    assert_eq!(doc, expected);
}

#[test]
fn test_feature_and_story_views() {
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Web", auth_items()));
    let blocks = diagrams(&doc);

    // feature-level, story-level, then the Unassigned group
    assert_eq!(blocks.len(), 3);

    assert!(blocks[0].contains(
        "    section Auth\n    Auth :2024-01-01, 2024-01-31\n    Auth - Login :2024-01-01, 2024-01-15\n"
    ));
    assert!(!blocks[0].contains("Login - Login"));

    assert!(blocks[1].contains(
        "    section Login\n    Login :2024-01-01, 2024-01-15\n    Login - Login :active, 2024-01-01, 2024-01-08\n"
    ));
    assert!(!blocks[1].contains("section Auth"));
}

#[test]
fn test_full_layout_renders_one_timeline() {
    let doc = assembler("en-US", GanttLayout::Full).render_project(&scope("Web", auth_items()));
    let blocks = diagrams(&doc);

    assert_eq!(blocks.len(), 2);
    assert!(blocks[0].contains("    title Web\n"));
    assert!(blocks[0].contains("    Login - Login :active, 2024-01-01, 2024-01-08\n"));
    assert!(!doc.contains("### Feature Timeline"));
}

#[test]
fn test_orphan_task_only_in_other_tasks() {
    let mut items = auth_items();
    items.push(WorkItem::new(4, WorkItemType::Task, "Ghost").with_parent(99));
    let doc = assembler("en-US", GanttLayout::Full).render_project(&scope("Web", items));

    let full = diagrams(&doc)[0];
    assert!(full.ends_with("    section Other Tasks\n    Ghost :2024-01-01, 2024-01-08\n"));
    assert_eq!(full.matches("Ghost").count(), 1);

    // Still listed with its dangling parent id
    assert!(doc.contains("| 4 | Ghost |  | Unassigned | 2024-01-01 | 2024-01-08 | 99 |"));
}

#[test]
fn test_orphan_task_next_to_features_gets_story_timeline() {
    let items = vec![
        WorkItem::new(1, WorkItemType::Feature, "Auth"),
        WorkItem::new(3, WorkItemType::Task, "Ghost").with_parent(99),
    ];
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Web", items));
    let blocks = diagrams(&doc);

    assert!(doc.contains("### User Story Timeline\n"));
    assert_eq!(blocks.len(), 3);
    assert!(!blocks[0].contains("Ghost"));
    assert!(blocks[1].ends_with("    section Other Tasks\n    Ghost :2024-01-01, 2024-01-08\n"));
}

#[test]
fn test_assignee_with_feature_keeps_tasks() {
    let items = vec![
        WorkItem::new(1, WorkItemType::Feature, "Auth").with_assignee("Ada"),
        WorkItem::new(2, WorkItemType::UserStory, "Login").with_parent(1).with_assignee("Grace"),
        WorkItem::new(3, WorkItemType::Task, "Form").with_parent(2).with_assignee("Ada"),
        WorkItem::new(4, WorkItemType::Task, "Docs").with_assignee("Ada"),
    ];
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Web", items));

    let (name, body) = assignee_sections(&doc)[0];
    assert_eq!(name, "Ada");
    assert!(diagrams(body)[0].ends_with(
        "    title Ada\n    dateFormat YYYY-MM-DD\n\
         \x20   section Auth\n    Auth :2024-01-01, 2024-01-31\n\
         \x20   section Other Tasks\n    Form :2024-01-01, 2024-01-08\n\
         \x20   Docs :2024-01-01, 2024-01-08\n"
    ));
}

#[test]
fn test_every_story_and_task_is_drawn() {
    let item_sets = [
        mixed_items(),
        auth_items(),
        vec![
            WorkItem::new(1, WorkItemType::Feature, "Auth"),
            WorkItem::new(3, WorkItemType::Task, "Ghost").with_parent(99),
        ],
        vec![WorkItem::new(2, WorkItemType::UserStory, "Lonely").with_parent(1)],
    ];

    for items in item_sets {
        for layout in [GanttLayout::Split, GanttLayout::Full] {
            let project = scope("Web", items.clone());
            let merged = [project.clone(), scope("Mobile", Vec::new())];
            let assembler = assembler("en-US", layout);

            for doc in [assembler.render_project(&project), assembler.render_merged(&merged)] {
                let (timeline, _) = doc.split_once("## Details").unwrap();
                let timeline = diagrams(timeline).concat();
                for item in project.items.iter().filter(|i| is_story_or_task(i)) {
                    assert!(
                        timeline.contains(&item.title),
                        "{:?}: '{}' missing from the timeline",
                        layout,
                        item.title
                    );
                }

                for (name, body) in assignee_sections(&doc) {
                    let diagram = diagrams(body)[0];
                    let owned = project
                        .items
                        .iter()
                        .filter(|i| i.assignee_name().unwrap_or("Unassigned") == name)
                        .filter(|i| is_story_or_task(i));
                    for item in owned {
                        assert!(
                            diagram.contains(&item.title),
                            "{:?}: '{}' missing from {}'s diagram",
                            layout,
                            item.title,
                            name
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_blank_assignee_is_unassigned() {
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Web", mixed_items()));

    assert!(doc.contains("| 8 | Billing |  | Unassigned | 2024-01-01 | 2024-01-31 |\n"));
    let names: Vec<&str> = assignee_sections(&doc).iter().map(|(name, _)| *name).collect();
    assert_eq!(names, vec!["Ada", "Grace", "Linus", "Unassigned"]);
}

#[test]
fn test_empty_project() {
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Empty", Vec::new()));

    assert!(doc.contains("| 0 | 0 | 0 |"));
    assert_eq!(doc.matches("No items.").count(), 3);
    assert_eq!(
        diagrams(&doc),
        vec!["gantt\n    title Empty - User Story Timeline\n    dateFormat YYYY-MM-DD\n"]
    );
    assert!(doc.ends_with("## By Assignee\n\n"));
}

#[test]
fn test_other_items_table() {
    let items = vec![WorkItem::new(8, WorkItemType::Other, "Crash on start").with_state("New")];
    let doc = assembler("en-US", GanttLayout::Split).render_project(&scope("Web", items));

    assert!(doc.contains("### Other Items\n\n| ID | Type | Title | State | Start | End |\n"));
    assert!(doc.contains("| 8 | Other | Crash on start | New | 2024-01-01 | 2024-01-08 |"));
}

#[test]
fn test_rendering_is_deterministic() {
    let project = scope("Web", auth_items());
    let assembler = assembler("en-US", GanttLayout::Split);
    assert_eq!(assembler.render_project(&project), assembler.render_project(&project));
}

// ============================================================================
// Merge Mode Tests
// ============================================================================

#[test]
fn test_merged_report() {
    let web = scope("Web", auth_items());
    let mobile = scope(
        "Mobile",
        vec![WorkItem::new(10, WorkItemType::Task, "Splash").with_state("Done").with_assignee("Ada")],
    );
    let doc = assembler("en-US", GanttLayout::Split).render_merged(&[web, mobile]);

    assert!(doc.starts_with("# Combined Work Item Report\n"));
    assert!(doc.contains("## Project Overview\n\n| Project | Total | Done | Active |\n"));
    assert!(doc.contains("| [Web](https://dev.azure.com/org/Web) | 3 | 0 | 1 |\n"));
    assert!(doc.contains("| [Mobile](https://dev.azure.com/org/Mobile) | 1 | 1 | 0 |\n"));
    assert!(doc.contains("| **Total** | 4 | 1 | 1 |\n"));

    assert!(doc.contains("| Project | ID | Title | State | Assignee | Start | End | Parent |\n"));
    assert!(doc.contains("| Mobile | 10 | Splash | Done | Ada | 2024-01-01 | 2024-01-08 |  |\n"));

    // Per-assignee project breakdown
    assert!(doc.contains("### Ada\n"));
    assert!(doc.contains("| Mobile | 1 | 1 | 0 |\n"));
    assert!(doc.contains("    Splash :done, 2024-01-01, 2024-01-08\n"));
}

// ============================================================================
// Localization Tests
// ============================================================================

#[test]
fn test_chinese_labels() {
    let doc = assembler("zh_CN.UTF-8", GanttLayout::Split).render_project(&scope("Web", auth_items()));

    assert!(doc.starts_with("# 工作项报告: Web\n"));
    assert!(doc.contains("## 概览\n"));
    assert!(doc.contains("### 未分配\n"));
    assert!(doc.contains("| 编号 | 标题 | 状态 | 负责人 | 开始 | 结束 |\n"));
    assert!(!doc.contains("Overview"));
}

#[test]
fn test_unsupported_language_uses_english() {
    let doc = assembler("fr-FR", GanttLayout::Split).render_project(&scope("Web", auth_items()));
    assert!(doc.contains("## Overview\n"));
}
