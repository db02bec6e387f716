use crate::github::issues::GitHubIssue;
use std::collections::HashMap;

/// How an issue's label names become its group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupKeyMode {
    /// Names in the order GitHub returned them, duplicates kept.
    #[default]
    SourceOrder,
    /// Names sorted and deduplicated, so `bug, ui` and `ui, bug` share a group.
    Normalized,
}

/// Issues sharing one label combination. An empty key means no labels.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueGroup<'a> {
    pub key: String,
    pub issues: Vec<&'a GitHubIssue>,
}

pub fn group_key(issue: &GitHubIssue, mode: GroupKeyMode) -> String {
    let mut names: Vec<&str> = issue.label_names().collect();
    if mode == GroupKeyMode::Normalized {
        names.sort_unstable();
        names.dedup();
    }
    names.join(", ")
}

/// Partitions issues by label key. Groups come out in first-seen order and
/// each group keeps the relative order of its issues.
pub fn group_issues(issues: &[GitHubIssue], mode: GroupKeyMode) -> Vec<IssueGroup<'_>> {
    let mut groups: Vec<IssueGroup<'_>> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for issue in issues {
        let key = group_key(issue, mode);
        match index_by_key.get(&key) {
            Some(&index) => groups[index].issues.push(issue),
            None => {
                index_by_key.insert(key.clone(), groups.len());
                groups.push(IssueGroup {
                    key,
                    issues: vec![issue],
                });
            }
        }
    }

    groups
}
