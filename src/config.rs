use crate::error::{IssueTasksError, Result};
use crate::github::fetch::DEFAULT_API_BASE;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Configuration keys enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Token,
    Owner,
    Repo,
    ApiUrl,
}

impl ConfigKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::Token => "GITHUB_TOKEN",
            ConfigKey::Owner => "GITHUB_OWNER",
            ConfigKey::Repo => "GITHUB_REPO",
            ConfigKey::ApiUrl => "GITHUB_API_URL",
        }
    }

    /// Get all config keys
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::Token,
            ConfigKey::Owner,
            ConfigKey::Repo,
            ConfigKey::ApiUrl,
        ]
    }

    fn from_name(name: &str) -> Option<ConfigKey> {
        ConfigKey::all().iter().copied().find(|key| key.as_str() == name)
    }
}

/// Default credentials file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Everything the pipeline needs to reach one repository.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub api_base: String,
}

impl Config {
    /// Builds a config from resolved values. Token, owner and repo are
    /// required and must be non-empty.
    pub fn from_values(values: &HashMap<ConfigKey, String>) -> Result<Config> {
        let required = |key: ConfigKey| -> Result<String> {
            values
                .get(&key)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or_else(|| IssueTasksError::ConfigurationMissing(key.as_str().to_string()))
        };

        Ok(Config {
            token: required(ConfigKey::Token)?,
            owner: required(ConfigKey::Owner)?,
            repo: required(ConfigKey::Repo)?,
            api_base: values
                .get(&ConfigKey::ApiUrl)
                .filter(|value| !value.is_empty())
                .cloned()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }
}

/// Parses `.env` style content into known configuration values.
///
/// Blank lines and `#` comments are skipped, lines are split on the first
/// `=`, and one pair of matching quotes around a value is removed. Unknown
/// keys are ignored; a repeated key keeps its first value.
pub fn parse_env_file(content: &str) -> HashMap<ConfigKey, String> {
    let mut config_map = HashMap::new();

    for line in content.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        if let Some(key) = ConfigKey::from_name(name.trim()) {
            config_map
                .entry(key)
                .or_insert_with(|| unquote(value.trim()).to_string());
        }
    }

    config_map
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Picks the known, non-empty keys out of an environment snapshot.
pub fn values_from_environment(env: &HashMap<String, String>) -> HashMap<ConfigKey, String> {
    ConfigKey::all()
        .iter()
        .filter_map(|key| match env.get(key.as_str()) {
            Some(value) if !value.is_empty() => Some((*key, value.clone())),
            _ => None,
        })
        .collect()
}

pub fn load_config(env_file: &Path, env: &HashMap<String, String>) -> Result<Config> {
    let mut values = match std::fs::read_to_string(env_file) {
        Ok(content) => parse_env_file(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("no env file at {}", env_file.display());
            HashMap::new()
        }
        Err(e) => {
            return Err(IssueTasksError::Config(format!(
                "failed to read {}: {e}",
                env_file.display()
            )));
        }
    };

    values.extend(values_from_environment(env));

    Config::from_values(&values)
}
