use crate::IssueTasksWorld;
use chrono::NaiveDate;
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use issue_tasks::error::IssueTasksError;
use issue_tasks::run::{RunOutcome, run};
use std::io::Write;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OWNER: &str = "octo";

fn issue_json(number: u64, labels: &str, body: Option<&str>) -> serde_json::Value {
    let labels: Vec<serde_json::Value> = labels
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| serde_json::json!({"name": name, "color": "ededed", "description": null}))
        .collect();
    serde_json::json!({
        "number": number,
        "title": format!("Issue {number}"),
        "body": body,
        "state": "open",
        "created_at": "2024-03-01T10:00:00Z",
        "updated_at": "2024-03-01T10:00:00Z",
        "html_url": format!("https://github.com/{OWNER}/repo/issues/{number}"),
        "labels": labels,
        "user": {"login": "octocat"}
    })
}

fn read_report(world: &IssueTasksWorld) -> String {
    std::fs::read_to_string(&world.report_path)
        .unwrap_or_else(|e| panic!("Failed to read report {:?}: {}", world.report_path, e))
}

/// The section of the report between `### ... (Issue #n)` and the next `---`.
fn issue_section(report: &str, number: u64) -> String {
    let marker = format!("(Issue #{number})");
    let start = report
        .find(&marker)
        .unwrap_or_else(|| panic!("Issue #{number} not found in report:\n{report}"));
    let rest = &report[start..];
    let end = rest.find("\n---\n").unwrap_or(rest.len());
    rest[..end].to_string()
}

#[given(regex = r#"^the repository "(.*)" is configured$"#)]
async fn given_configured_repository(world: &mut IssueTasksWorld, repo: String) {
    let server = MockServer::start().await;
    let workdir = tempfile::tempdir().expect("Failed to create working directory");

    let env_file = workdir.path().join(".env");
    std::fs::write(
        &env_file,
        format!("# test credentials\nGITHUB_TOKEN=test-token\nGITHUB_OWNER={OWNER}\nGITHUB_REPO={repo}\n"),
    )
    .expect("Failed to write env file");

    world
        .env
        .insert("GITHUB_API_URL".to_string(), server.uri());
    world.report_path = workdir.path().join("report.md");
    world.env_file = env_file;
    world.mock_server = Some(server);
    world.workdir = Some(workdir);
}

#[given("no credentials are configured")]
async fn given_no_credentials(world: &mut IssueTasksWorld) {
    let server = MockServer::start().await;
    let workdir = tempfile::tempdir().expect("Failed to create working directory");

    world
        .env
        .insert("GITHUB_API_URL".to_string(), server.uri());
    world.env_file = workdir.path().join(".env");
    world.report_path = workdir.path().join("report.md");
    world.mock_server = Some(server);
    world.workdir = Some(workdir);
}

#[given(regex = r#"^an open issue #(\d+) labelled "(.*)" with body:$"#)]
async fn given_issue_with_body(world: &mut IssueTasksWorld, number: u64, labels: String, step: &Step) {
    let body = step.docstring.clone().unwrap_or_default();
    world.issues.push(issue_json(number, &labels, Some(body.trim_start_matches('\n'))));
}

#[given(regex = r#"^an open issue #(\d+) without labels or body$"#)]
async fn given_bare_issue(world: &mut IssueTasksWorld, number: u64) {
    world.issues.push(issue_json(number, "", None));
}

#[given(regex = r#"^GitHub answers with status (\d+)$"#)]
async fn given_github_status(world: &mut IssueTasksWorld, status: u16) {
    world.response_override =
        Some(ResponseTemplate::new(status).set_body_string(r#"{"message": "Bad credentials"}"#));
}

#[given("GitHub answers with a malformed body")]
async fn given_github_malformed(world: &mut IssueTasksWorld) {
    world.response_override = Some(ResponseTemplate::new(200).set_body_string("<html>oops</html>"));
}

#[given("a previous report exists")]
async fn given_previous_report(world: &mut IssueTasksWorld) {
    std::fs::write(&world.report_path, "previous report").expect("Failed to write previous report");
}

#[when("I generate the report")]
async fn when_generate_report(world: &mut IssueTasksWorld) {
    let server = world
        .mock_server
        .as_ref()
        .expect("A repository must be configured first");

    let response = world.response_override.take().unwrap_or_else(|| {
        ResponseTemplate::new(200).set_body_json(serde_json::Value::Array(world.issues.clone()))
    });
    Mock::given(method("GET"))
        .and(path(format!("/repos/{OWNER}/repo/issues")))
        .and(query_param("state", "open"))
        .respond_with(response)
        .mount(server)
        .await;

    let args = vec![
        "issue-tasks".to_string(),
        "report".to_string(),
        "--env-file".to_string(),
        world.env_file.display().to_string(),
        "--output".to_string(),
        world.report_path.display().to_string(),
    ];
    let generated_at = NaiveDate::from_ymd_opt(2024, 3, 5)
        .and_then(|date| date.and_hms_opt(8, 30, 0))
        .expect("Valid timestamp");

    let mut captured = Vec::new();
    let result = run(
        args,
        Some(&mut captured as &mut dyn Write),
        &world.env,
        Some(generated_at),
    )
    .await;

    world.captured_output = captured;
    world.result = Some(result);
}

#[then("the report is written")]
async fn then_report_written(world: &mut IssueTasksWorld) {
    match &world.result {
        Some(Ok(RunOutcome::ReportWritten(path))) => assert_eq!(path, &world.report_path),
        other => panic!("Expected a written report, got {other:?}"),
    }
    assert!(world.report_path.exists(), "Report file was not created");
}

#[then(regex = r#"^the report title names "(.*)"$"#)]
async fn then_report_title(world: &mut IssueTasksWorld, repo: String) {
    let report = read_report(world);
    assert!(
        report.starts_with(&format!("# Task List for {repo}\n")),
        "Unexpected report header:\n{report}"
    );
    assert!(report.contains("Generated automatically from GitHub issues on 05/03/2024 08:30:00."));
}

#[then(regex = r#"^the report has the categories "(.*)"$"#)]
async fn then_report_categories(world: &mut IssueTasksWorld, categories: String) {
    let report = read_report(world);
    let found: Vec<&str> = report
        .lines()
        .filter_map(|line| line.strip_prefix("## Category: "))
        .collect();
    let expected: Vec<&str> = categories.split('|').collect();
    assert_eq!(found, expected);
}

#[then(regex = r#"^issue #(\d+) lists (\d+) unchecked tasks?$"#)]
async fn then_issue_lists_tasks(world: &mut IssueTasksWorld, number: u64, count: usize) {
    let report = read_report(world);
    let section = issue_section(&report, number);
    let tasks = section.lines().filter(|line| line.starts_with("- [ ] ")).count();
    assert_eq!(tasks, count, "Unexpected task count in section:\n{section}");
}

#[then(regex = r#"^issue #(\d+) lists the task "(.*)"$"#)]
async fn then_issue_lists_task(world: &mut IssueTasksWorld, number: u64, task: String) {
    let report = read_report(world);
    let section = issue_section(&report, number);
    assert!(
        section.lines().any(|line| line == format!("- [ ] {task}")),
        "Task '{task}' missing from section:\n{section}"
    );
}

#[then(regex = r#"^the output should contain "(.*)"$"#)]
async fn then_output_contains(world: &mut IssueTasksWorld, expected: String) {
    let output = String::from_utf8(world.captured_output.clone()).expect("Invalid UTF-8");
    assert!(
        output.contains(&expected),
        "Expected output to contain '{expected}', but got:\n---\n{output}\n---"
    );
}

#[then("the run finishes without issues")]
async fn then_no_issues(world: &mut IssueTasksWorld) {
    assert!(
        matches!(world.result, Some(Ok(RunOutcome::NoIssues))),
        "Expected NoIssues, got {:?}",
        world.result
    );
}

#[then(regex = r#"^the run fails because GitHub rejected the request with "(.*)"$"#)]
async fn then_remote_rejected(world: &mut IssueTasksWorld, expected: String) {
    match &world.result {
        Some(Err(IssueTasksError::RemoteRejected { status, .. })) => assert_eq!(status, &expected),
        other => panic!("Expected RemoteRejected, got {other:?}"),
    }
}

#[then("the run fails with a decode error")]
async fn then_decode_error(world: &mut IssueTasksWorld) {
    assert!(
        matches!(world.result, Some(Err(IssueTasksError::Decode(_)))),
        "Expected Decode error, got {:?}",
        world.result
    );
}

#[then(regex = r#"^the run fails because "(.*)" is missing$"#)]
async fn then_configuration_missing(world: &mut IssueTasksWorld, key: String) {
    match &world.result {
        Some(Err(IssueTasksError::ConfigurationMissing(missing))) => assert_eq!(missing, &key),
        other => panic!("Expected ConfigurationMissing, got {other:?}"),
    }
}

#[then("GitHub was not contacted")]
async fn then_github_not_contacted(world: &mut IssueTasksWorld) {
    let server = world.mock_server.as_ref().expect("Mock server not started");
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "Unexpected requests: {}", requests.len());
}

#[then("no report file exists")]
async fn then_no_report(world: &mut IssueTasksWorld) {
    assert!(!world.report_path.exists(), "Report file should not exist");
}

#[then(regex = r#"^the report file still reads "(.*)"$"#)]
async fn then_report_unchanged(world: &mut IssueTasksWorld, expected: String) {
    assert_eq!(read_report(world), expected);
}
