use crate::config::DEFAULT_ENV_FILE;
use std::path::PathBuf;

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Report(Options),
    Dump(Options),
    Help,
    Unknown(String),
}

/// Flags shared by `report` and `dump`
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub output: Option<PathBuf>,
    pub env_file: PathBuf,
    pub normalize_labels: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            output: None,
            env_file: PathBuf::from(DEFAULT_ENV_FILE),
            normalize_labels: false,
        }
    }
}

pub const USAGE: &str = "Usage: issue-tasks [report|dump|help] [--output <path>] [--env-file <path>] [--normalize-labels]

Commands:
  report   Write a Markdown task list of the open issues (default)
  dump     Print every issue and save them as JSON
  help     Show this message";

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    let rest = args.get(1..).unwrap_or_default();

    let (command, flags) = match rest.first().map(String::as_str) {
        None => return Command::Report(Options::default()),
        Some("help") | Some("--help") | Some("-h") => return Command::Help,
        Some("report") => ("report", &rest[1..]),
        Some("dump") => ("dump", &rest[1..]),
        Some(flag) if flag.starts_with('-') => ("report", rest),
        Some(cmd) => return Command::Unknown(cmd.to_string()),
    };

    match parse_options(flags) {
        Ok(options) if command == "dump" => Command::Dump(options),
        Ok(options) => Command::Report(options),
        Err(message) => Command::Unknown(message),
    }
}

fn parse_options(flags: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = flags.iter();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--output" | "-o" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("Missing value for {flag}"))?;
                options.output = Some(PathBuf::from(value));
            }
            "--env-file" => {
                let value = iter
                    .next()
                    .ok_or_else(|| format!("Missing value for {flag}"))?;
                options.env_file = PathBuf::from(value);
            }
            "--normalize-labels" => options.normalize_labels = true,
            other => return Err(other.to_string()),
        }
    }

    Ok(options)
}
