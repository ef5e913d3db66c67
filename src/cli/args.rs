//! Command-line argument parsing for the writeflow CLI.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Submit the request in the given JSON file and follow its progress
    Submit(PathBuf),
    /// Print the last persisted session snapshot
    Last,
    /// Query the service health endpoint
    Health,
    /// Show version information
    Version,
    /// Show usage (default)
    Help,
}

/// Parse command-line arguments and return the appropriate command.
///
/// Flags win over a positional path; the first positional argument is the
/// request file.
///
/// # Examples
///
/// ```
/// use writeflow::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["writeflow".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut request_path = None;

    // Skip the program name
    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--last" => return CliCommand::Last,
            "--health" => return CliCommand::Health,
            flag if flag.starts_with('-') => return CliCommand::Help,
            path => {
                if request_path.is_none() {
                    request_path = Some(PathBuf::from(path));
                }
            }
        }
    }

    request_path.map_or(CliCommand::Help, CliCommand::Submit)
}

pub const USAGE: &str = "\
Usage: writeflow <request.json>   Submit a request and follow its progress
       writeflow --last           Show the last saved session
       writeflow --health         Check the writing service
       writeflow --version        Show version

Environment: WRITEFLOW_API_URL, WRITEFLOW_IDLE_TIMEOUT_SECS,
WRITEFLOW_SNAPSHOT_DEBOUNCE_MS, WRITEFLOW_HISTORY_CAPACITY, WRITEFLOW_DATA_DIR";
