//! Report document assembly.

use std::fmt::Write as _;

use crate::core::{
    group_by_assignee, group_by_project, DateResolver, DisplayOptions, GanttLayout, Hierarchy,
    ProjectScope, StatusCounts, WorkItem, WorkItemType, DATE_FORMAT,
};
use crate::i18n::Texts;

use super::{Column, GanttRenderer, GanttView, Schedule, Table};

/// Builds Markdown reports for project scopes.
#[derive(Debug, Clone, Copy)]
pub struct ReportAssembler {
    texts: Texts,
    display: DisplayOptions,
    layout: GanttLayout,
    resolver: DateResolver,
}

impl ReportAssembler {
    pub fn new(texts: Texts, display: DisplayOptions, layout: GanttLayout) -> Self {
        Self { texts, display, layout, resolver: DateResolver::new() }
    }

    /// Anchor default dates at a fixed resolver instead of the clock.
    pub fn with_resolver(mut self, resolver: DateResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Report for a single project.
    pub fn render_project(&self, scope: &ProjectScope) -> String {
        let schedule = Schedule::for_scope(scope, self.resolver);
        let ctx = Context { texts: self.texts, schedule: &schedule, merged: false };
        let t = self.texts;

        let mut out = String::new();
        let _ = writeln!(out, "# {}: {}\n", t.get("ReportTitle"), scope.name);
        if !scope.url.is_empty() {
            let _ = writeln!(out, "[{}]({})\n", t.get("ViewProject"), scope.url);
        }
        self.push_generated_on(&mut out);

        let _ = writeln!(out, "## {}\n", t.get("Overview"));
        out.push_str(&counts_table(t, StatusCounts::from_items(&scope.items)).render());
        out.push('\n');

        let items: Vec<&WorkItem> = scope.items.iter().collect();
        let hierarchy = Hierarchy::build(items.iter().copied());
        self.push_timelines(&mut out, &ctx, &scope.name, &hierarchy);
        self.push_details(&mut out, &ctx, &items);
        self.push_assignees(&mut out, &ctx, items.iter().copied());
        out
    }

    /// One report covering several projects.
    pub fn render_merged(&self, scopes: &[ProjectScope]) -> String {
        let schedule = Schedule::for_scopes(scopes, self.resolver);
        let ctx = Context { texts: self.texts, schedule: &schedule, merged: true };
        let t = self.texts;

        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", t.get("MergedReportTitle"));
        self.push_generated_on(&mut out);

        let _ = writeln!(out, "## {}\n", t.get("ProjectOverview"));
        let mut overview =
            Table::new([t.get("Project"), t.get("Total"), t.get("Done"), t.get("Active")]);
        let mut totals = StatusCounts::default();
        for scope in scopes {
            let counts = StatusCounts::from_items(&scope.items);
            totals.add(counts);
            let name = if scope.url.is_empty() {
                scope.name.clone()
            } else {
                format!("[{}]({})", scope.name, scope.url)
            };
            overview.push_row(counts_row(name, counts));
        }
        overview.push_row(counts_row(format!("**{}**", t.get("Total")), totals));
        out.push_str(&overview.render());
        out.push('\n');

        let items: Vec<&WorkItem> = scopes.iter().flat_map(|s| s.items.iter()).collect();
        let hierarchy = Hierarchy::build(items.iter().copied());
        self.push_timelines(&mut out, &ctx, t.get("MergedReportTitle"), &hierarchy);
        self.push_details(&mut out, &ctx, &items);
        self.push_assignees(&mut out, &ctx, items.iter().copied());
        out
    }

    fn push_generated_on(&self, out: &mut String) {
        let _ = writeln!(
            out,
            "{}: {}\n",
            self.texts.get("GeneratedOn"),
            self.resolver.today().format(DATE_FORMAT)
        );
    }

    fn push_timelines(
        &self,
        out: &mut String,
        ctx: &Context<'_>,
        name: &str,
        hierarchy: &Hierarchy<'_>,
    ) {
        let t = self.texts;
        let gantt = GanttRenderer::new(self.display, t, ctx.schedule);
        let _ = writeln!(out, "## {}\n", t.get("Timeline"));

        match self.layout {
            GanttLayout::Full => {
                out.push_str(&gantt.render(name, hierarchy, GanttView::Full));
                out.push('\n');
            }
            GanttLayout::Split => {
                if hierarchy.has_features() {
                    let title = format!("{} - {}", name, t.get("FeatureTimeline"));
                    let _ = writeln!(out, "### {}\n", t.get("FeatureTimeline"));
                    out.push_str(&gantt.render(&title, hierarchy, GanttView::FeatureLevel));
                    out.push('\n');
                }
                // Tasks only show up in the story-level view.
                if hierarchy.has_stories()
                    || !hierarchy.orphan_tasks.is_empty()
                    || !hierarchy.has_features()
                {
                    let title = format!("{} - {}", name, t.get("StoryTimeline"));
                    let _ = writeln!(out, "### {}\n", t.get("StoryTimeline"));
                    out.push_str(&gantt.render(&title, hierarchy, GanttView::StoryLevel));
                    out.push('\n');
                }
            }
        }
    }

    fn push_details(&self, out: &mut String, ctx: &Context<'_>, items: &[&WorkItem]) {
        let t = self.texts;
        let _ = writeln!(out, "## {}\n", t.get("Details"));

        let of_kind =
            |kind: WorkItemType| items.iter().copied().filter(|i| i.kind == kind).collect::<Vec<_>>();

        let sections: [(&str, WorkItemType, &[Column]); 3] = [
            ("Features", WorkItemType::Feature, Column::DETAIL),
            ("UserStories", WorkItemType::UserStory, Column::DETAIL_WITH_PARENT),
            ("Tasks", WorkItemType::Task, Column::DETAIL_WITH_PARENT),
        ];
        for (key, kind, columns) in sections {
            let _ = writeln!(out, "### {}\n", t.get(key));
            push_item_table(out, ctx, columns, &of_kind(kind));
        }

        let others = of_kind(WorkItemType::Other);
        if !others.is_empty() {
            let _ = writeln!(out, "### {}\n", t.get("OtherItems"));
            push_item_table(out, ctx, Column::ASSIGNEE, &others);
        }
    }

    fn push_assignees<'a, I>(&self, out: &mut String, ctx: &Context<'_>, items: I)
    where
        I: IntoIterator<Item = &'a WorkItem>,
    {
        let t = self.texts;
        let gantt = GanttRenderer::new(self.display, t, ctx.schedule);
        let _ = writeln!(out, "## {}\n", t.get("ByAssignee"));

        for group in group_by_assignee(items, t.get("Unassigned")) {
            let _ = writeln!(out, "### {}\n", group.key);
            out.push_str(&counts_table(t, group.counts()).render());
            out.push('\n');

            if ctx.merged {
                let mut by_project =
                    Table::new([t.get("Project"), t.get("Total"), t.get("Done"), t.get("Active")]);
                for project in group_by_project(group.items.iter().copied()) {
                    by_project.push_row(counts_row(project.key.clone(), project.counts()));
                }
                out.push_str(&by_project.render());
                out.push('\n');
            }

            let hierarchy = Hierarchy::build(group.items.iter().copied());
            out.push_str(&gantt.render(&group.key, &hierarchy, GanttView::auto(&hierarchy)));
            out.push('\n');

            push_item_table(out, ctx, Column::ASSIGNEE, &group.items);
        }
    }
}

/// Per-document rendering state.
struct Context<'a> {
    texts: Texts,
    schedule: &'a Schedule,
    merged: bool,
}

impl Context<'_> {
    /// Columns with a leading project column in merged reports.
    fn columns(&self, columns: &[Column]) -> Vec<Column> {
        let mut all = Vec::with_capacity(columns.len() + 1);
        if self.merged {
            all.push(Column::Project);
        }
        all.extend_from_slice(columns);
        all
    }
}

fn push_item_table(out: &mut String, ctx: &Context<'_>, columns: &[Column], items: &[&WorkItem]) {
    if items.is_empty() {
        let _ = writeln!(out, "{}\n", ctx.texts.get("NoItems"));
        return;
    }
    let table = Table::of_items(&ctx.columns(columns), items.iter().copied(), ctx.schedule, ctx.texts);
    out.push_str(&table.render());
    out.push('\n');
}

fn counts_table(t: Texts, counts: StatusCounts) -> Table {
    let mut table = Table::new([t.get("Total"), t.get("Done"), t.get("Active")]);
    table.push_row([counts.total.to_string(), counts.done.to_string(), counts.active.to_string()]);
    table
}

fn counts_row(label: String, counts: StatusCounts) -> [String; 4] {
    [label, counts.total.to_string(), counts.done.to_string(), counts.active.to_string()]
}
