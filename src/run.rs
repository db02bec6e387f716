use crate::cli::parser::{self, Command, Options};
use crate::config::{self, Config};
use crate::error::{IssueTasksError, Result};
use crate::github::fetch::{self, HttpIssueSource, IssuePageSource, IssueQuery};
use crate::github::issues::StateFilter;
use crate::group::{self, GroupKeyMode};
use crate::output;
use crate::report;
use crate::storage::{FileReportStorage, ReportStorage};
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_DUMP_FILE: &str = "issues.json";

/// How a successful run ended.
#[derive(Debug, PartialEq)]
pub enum RunOutcome {
    ReportWritten(PathBuf),
    Dumped { path: PathBuf, count: usize },
    NoIssues,
    Help,
}

/// Fetches, groups and renders issues for one configured repository.
pub struct Pipeline<S, W> {
    config: Config,
    source: S,
    storage: W,
    key_mode: GroupKeyMode,
}

impl<S: IssuePageSource, W: ReportStorage> Pipeline<S, W> {
    pub fn new(config: Config, source: S, storage: W, key_mode: GroupKeyMode) -> Self {
        Pipeline {
            config,
            source,
            storage,
            key_mode,
        }
    }

    /// Writes the task list of open issues to `output`, or to the dated
    /// default name when `output` is `None`.
    pub async fn generate_report(
        &self,
        output: Option<&Path>,
        generated_at: NaiveDateTime,
        out: &mut Option<&mut dyn Write>,
    ) -> Result<RunOutcome> {
        let Config { owner, repo, .. } = &self.config;
        output::println(&format!("Fetching issues from {owner}/{repo}..."), out)?;

        let query = IssueQuery::new(owner, repo, StateFilter::Open);
        let issues = fetch::fetch_issues(&self.source, &query).await?;
        if issues.is_empty() {
            output::println("No issues found.", out)?;
            return Ok(RunOutcome::NoIssues);
        }
        output::println(&format!("Found {} issues.", issues.len()), out)?;

        let groups = group::group_issues(&issues, self.key_mode);
        info!("rendering {} categories", groups.len());
        let content = report::render_report(repo, &groups, generated_at);

        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(report::report_file_name(generated_at.date())));
        self.storage.save(&path, &content)?;

        output::println(&format!("Task list written to {}", path.display()), out)?;
        Ok(RunOutcome::ReportWritten(path))
    }

    /// Prints every issue regardless of state and saves them as JSON.
    pub async fn dump_issues(
        &self,
        output: Option<&Path>,
        out: &mut Option<&mut dyn Write>,
    ) -> Result<RunOutcome> {
        let Config { owner, repo, .. } = &self.config;

        let query = IssueQuery::new(owner, repo, StateFilter::All);
        let issues = fetch::fetch_issues(&self.source, &query).await?;
        if issues.is_empty() {
            output::println("No issues found.", out)?;
            return Ok(RunOutcome::NoIssues);
        }

        output::println(
            &format!("Found {} issues in {owner}/{repo}:\n", issues.len()),
            out,
        )?;
        for issue in &issues {
            output::println(&report::format_issue_summary(issue), out)?;
        }

        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DUMP_FILE));
        let json = serde_json::to_string_pretty(&issues)?;
        self.storage.save(&path, &json)?;

        output::println(&format!("Issues saved to {}", path.display()), out)?;
        Ok(RunOutcome::Dumped {
            path,
            count: issues.len(),
        })
    }
}

/// Entry point shared by the binary and the acceptance tests.
///
/// `env` is the process environment snapshot; `generated_at` defaults to the
/// current local time.
pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn Write>,
    env: &HashMap<String, String>,
    generated_at: Option<NaiveDateTime>,
) -> Result<RunOutcome> {
    match parser::parse_args(&args) {
        Command::Report(options) => {
            let pipeline = build_pipeline(&options, env)?;
            let generated_at = generated_at.unwrap_or_else(|| chrono::Local::now().naive_local());
            pipeline
                .generate_report(
                    options.output.as_deref(),
                    generated_at,
                    &mut stdout_additional,
                )
                .await
        }
        Command::Dump(options) => {
            let pipeline = build_pipeline(&options, env)?;
            pipeline
                .dump_issues(options.output.as_deref(), &mut stdout_additional)
                .await
        }
        Command::Help => {
            output::println(parser::USAGE, &mut stdout_additional)?;
            Ok(RunOutcome::Help)
        }
        Command::Unknown(arg) => Err(IssueTasksError::Usage(format!(
            "Invalid command or argument: {arg}\n\n{}",
            parser::USAGE
        ))),
    }
}

fn build_pipeline(
    options: &Options,
    env: &HashMap<String, String>,
) -> Result<Pipeline<HttpIssueSource, FileReportStorage>> {
    let config = config::load_config(&options.env_file, env)?;
    let source = HttpIssueSource::new(&config.api_base, &config.token)?;
    let key_mode = if options.normalize_labels {
        GroupKeyMode::Normalized
    } else {
        GroupKeyMode::SourceOrder
    };
    Ok(Pipeline::new(config, source, FileReportStorage::new(), key_mode))
}
