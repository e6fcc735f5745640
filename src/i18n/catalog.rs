//! Built-in text catalogs.

pub(super) const EN_US: &[(&str, &str)] = &[
    ("ReportTitle", "Work Item Report"),
    ("MergedReportTitle", "Combined Work Item Report"),
    ("ViewProject", "Open project in Azure DevOps"),
    ("GeneratedOn", "Generated on"),
    ("Overview", "Overview"),
    ("ProjectOverview", "Project Overview"),
    ("Total", "Total"),
    ("Done", "Done"),
    ("Active", "Active"),
    ("Timeline", "Timeline"),
    ("FeatureTimeline", "Feature Timeline"),
    ("StoryTimeline", "User Story Timeline"),
    ("OtherUserStories", "Other User Stories"),
    ("OtherTasks", "Other Tasks"),
    ("Features", "Features"),
    ("UserStories", "User Stories"),
    ("Tasks", "Tasks"),
    ("OtherItems", "Other Items"),
    ("Details", "Details"),
    ("ByAssignee", "By Assignee"),
    ("Unassigned", "Unassigned"),
    ("NoItems", "No items."),
    ("Project", "Project"),
    ("Id", "ID"),
    ("Title", "Title"),
    ("Type", "Type"),
    ("State", "State"),
    ("Assignee", "Assignee"),
    ("Start", "Start"),
    ("End", "End"),
    ("Parent", "Parent"),
    ("TypeFeature", "Feature"),
    ("TypeUserStory", "User Story"),
    ("TypeTask", "Task"),
    ("TypeOther", "Other"),
];

pub(super) const ZH_CN: &[(&str, &str)] = &[
    ("ReportTitle", "工作项报告"),
    ("MergedReportTitle", "合并工作项报告"),
    ("ViewProject", "在 Azure DevOps 中打开项目"),
    ("GeneratedOn", "生成日期"),
    ("Overview", "概览"),
    ("ProjectOverview", "项目概览"),
    ("Total", "总数"),
    ("Done", "已完成"),
    ("Active", "进行中"),
    ("Timeline", "甘特图"),
    ("FeatureTimeline", "功能甘特图"),
    ("StoryTimeline", "用户故事甘特图"),
    ("OtherUserStories", "其他用户故事"),
    ("OtherTasks", "其他任务"),
    ("Features", "功能"),
    ("UserStories", "用户故事"),
    ("Tasks", "任务"),
    ("OtherItems", "其他工作项"),
    ("Details", "明细"),
    ("ByAssignee", "按负责人"),
    ("Unassigned", "未分配"),
    ("NoItems", "无工作项。"),
    ("Project", "项目"),
    ("Id", "编号"),
    ("Title", "标题"),
    ("Type", "类型"),
    ("State", "状态"),
    ("Assignee", "负责人"),
    ("Start", "开始"),
    ("End", "结束"),
    ("Parent", "父项"),
    ("TypeFeature", "功能"),
    ("TypeUserStory", "用户故事"),
    ("TypeTask", "任务"),
    ("TypeOther", "其他"),
];
