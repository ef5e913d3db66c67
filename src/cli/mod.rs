//! CLI module for writeflow.
//!
//! A thin consumer of the library: parses arguments, wires the reqwest and
//! file-store adapters into a [`GenerationClient`], and prints progress.
//!
//! ```ignore
//! use writeflow::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, ClientConfig::from_env()).await?;
//! ```

pub mod args;
pub mod progress;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use progress::{format_state, ProgressPrinter};
pub use version::{version_line, VERSION};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use std::path::Path;

use crate::adapters::{FileKeyValueStore, ReqwestHttpClient};
use crate::config::ClientConfig;
use crate::generation::{GenerationClient, Session};
use crate::models::{GenerationResult, RequestPayload};
use crate::snapshot::{SessionSnapshot, SnapshotStore};

/// Execute a parsed command.
pub async fn run_cli_command(command: CliCommand, config: ClientConfig) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Health => run_health(config).await,
        CliCommand::Last => run_last(config).await,
        CliCommand::Submit(path) => run_submit(&path, config).await,
    }
}

fn open_store(config: &ClientConfig) -> Result<FileKeyValueStore> {
    match &config.data_dir {
        Some(dir) => Ok(FileKeyValueStore::new(dir)),
        None => FileKeyValueStore::default_location().wrap_err("Cannot locate data directory"),
    }
}

async fn run_health(config: ClientConfig) -> Result<()> {
    let client = GenerationClient::new(ReqwestHttpClient::new(), config);
    let report = client
        .health_check()
        .await
        .map_err(|e| eyre!(e.user_message()))?;

    println!("{:?} (version {})", report.status, report.version);
    for name in report.unhealthy_services() {
        println!("  {}: {}", name, report.services[name]);
    }

    if !report.is_healthy() {
        return Err(eyre!("Writing service is not healthy"));
    }
    Ok(())
}

async fn run_last(config: ClientConfig) -> Result<()> {
    let snapshots = SnapshotStore::new(open_store(&config)?);

    let Some(snapshot) = snapshots.load().await else {
        println!("No saved session.");
        return Ok(());
    };

    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    println!("Saved at {}", snapshot.saved_at);
    println!("{}", format_state(&snapshot.state));
    if snapshot.is_stale() {
        println!("(this generation did not finish; its stream is gone)");
    }
    if let Some(failure) = &snapshot.state.failure {
        println!("Failure: {}", failure);
    }

    for (i, result) in snapshot.history.iter().enumerate() {
        let words = result.text_stats.as_ref().map_or(0, |s| s.word_count);
        println!(
            "{}. {} {:?} ({} words, {} iterations)",
            i + 1,
            result.request_id,
            result.status,
            words,
            result.iterations
        );
    }
}

async fn run_submit(path: &Path, config: ClientConfig) -> Result<()> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Cannot read {}", path.display()))?;
    let request: RequestPayload = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("{} is not a valid request", path.display()))?;

    let store = open_store(&config)?;
    let mut session = Session::restore(store, &config).await;
    let client = GenerationClient::new(ReqwestHttpClient::new(), config);

    let cancel = client.cancel_handle();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut printer = ProgressPrinter::new(std::io::stderr());
    let outcome = client.start(&request, &mut session, &mut printer).await;
    signal.abort();

    let result = outcome.map_err(|e| eyre!("{} [{}]", e.user_message(), e.error_code()))?;
    print_result(&result)
}

fn print_result(result: &GenerationResult) -> Result<()> {
    if let Some(message) = result.failure_message() {
        return Err(eyre!("Generation failed: {}", message));
    }

    if let Some(content) = &result.content {
        println!("{}", content);
    }
    if let Some(metrics) = &result.quality_metrics {
        eprintln!("Quality score: {:.1}/100", metrics.overall_score);
    }
    for suggestion in &result.suggestions {
        eprintln!("- {}", suggestion);
    }
    Ok(())
}
