use crate::github::issues::GitHubIssue;
use crate::group::IssueGroup;
use crate::tasks::extract_tasks;
use chrono::{NaiveDate, NaiveDateTime};

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
const NO_LABELS_CATEGORY: &str = "No labels";

/// Name of the report written for `date`, e.g. `tasks-20240301.md`.
pub fn report_file_name(date: NaiveDate) -> String {
    format!("tasks-{}.md", date.format("%Y%m%d"))
}

/// Renders the Markdown task list for `repo`, one section per group in the
/// order given.
pub fn render_report(
    repo: &str,
    groups: &[IssueGroup<'_>],
    generated_at: NaiveDateTime,
) -> String {
    let header = format!(
        "# Task List for {repo}\n\nGenerated automatically from GitHub issues on {}.\n\n",
        generated_at.format(TIMESTAMP_FORMAT)
    );

    groups
        .iter()
        .map(render_group)
        .fold(header, |mut document, section| {
            document.push_str(&section);
            document
        })
}

fn category_name(key: &str) -> &str {
    if key.is_empty() {
        NO_LABELS_CATEGORY
    } else {
        key
    }
}

fn render_group(group: &IssueGroup<'_>) -> String {
    let heading = format!("## Category: {}\n\n", category_name(&group.key));
    group
        .issues
        .iter()
        .copied()
        .map(render_issue)
        .fold(heading, |mut section, issue| {
            section.push_str(&issue);
            section
        })
}

fn render_issue(issue: &GitHubIssue) -> String {
    let checklist: String = extract_tasks(issue.body())
        .iter()
        .map(|task| format!("- [ ] {task}\n"))
        .collect();

    format!(
        "### {} (Issue #{})\n\n{}\n\n**Link:** {}\n\n**Tasks:**\n{checklist}\n---\n\n",
        issue.title,
        issue.number,
        issue.body(),
        issue.html_url,
    )
}

/// One console block describing an issue, used by the `dump` command.
pub fn format_issue_summary(issue: &GitHubIssue) -> String {
    let mut lines = vec![
        format!("Issue #{}: {}", issue.number, issue.title),
        format!("State: {}", issue.state.as_str()),
        format!("Created: {}", issue.created_at.format(TIMESTAMP_FORMAT)),
        format!("URL: {}", issue.html_url),
    ];
    if !issue.labels.is_empty() {
        let names: Vec<&str> = issue.label_names().collect();
        lines.push(format!("Labels: {}", names.join(", ")));
    }
    lines.push("---".to_string());
    lines.join("\n")
}
