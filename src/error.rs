use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum IssueTasksError {
    #[error("{0} is not configured. Add {0}=... to the .env file or the environment.")]
    ConfigurationMissing(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("request to GitHub failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub rejected the request: {status}")]
    RemoteRejected { status: String, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to print output: {0}")]
    Output(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, IssueTasksError>;
