use cucumber::World;
use issue_tasks::error::IssueTasksError;
use issue_tasks::run::RunOutcome;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Default, World)]
pub struct IssueTasksWorld {
    pub mock_server: Option<wiremock::MockServer>,
    pub workdir: Option<tempfile::TempDir>,
    pub env_file: PathBuf,
    pub env: HashMap<String, String>,
    pub issues: Vec<serde_json::Value>,
    pub response_override: Option<wiremock::ResponseTemplate>,
    pub captured_output: Vec<u8>,
    pub result: Option<Result<RunOutcome, IssueTasksError>>,
    pub report_path: PathBuf,
}

impl std::fmt::Debug for IssueTasksWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssueTasksWorld")
            .field("env_file", &self.env_file)
            .field("issues", &self.issues.len())
            .field("result", &self.result)
            .field("report_path", &self.report_path)
            .finish_non_exhaustive()
    }
}

#[tokio::main]
async fn main() {
    IssueTasksWorld::run("features").await;
}

mod steps;
