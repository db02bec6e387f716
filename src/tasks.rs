use crate::error::{IssueTasksError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// `- description`, optionally indented. The capture excludes surrounding whitespace.
static TASK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*-\s+(\S(?:.*\S)?)\s*$").expect("task line pattern is valid")
});

/// Returns the dash-bullet lines of an issue body, in line order.
///
/// Checkbox markers are not special: `- [ ] ship it` yields `[ ] ship it`.
pub fn extract_tasks(body: &str) -> Vec<String> {
    body.lines()
        .filter_map(|line| TASK_LINE.captures(line))
        .filter_map(|captures| captures.get(1))
        .map(|task| task.as_str().to_string())
        .collect()
}

/// Like [`extract_tasks`], for raw bytes that must be valid UTF-8.
pub fn extract_tasks_from_bytes(body: &[u8]) -> Result<Vec<String>> {
    let text = std::str::from_utf8(body)
        .map_err(|e| IssueTasksError::Decode(format!("issue body is not UTF-8: {e}")))?;
    Ok(extract_tasks(text))
}
