#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod history;
mod scan;

use std::process;

use clap::Parser;
use ragdoll_core::ServiceStatus;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Command, ProviderArgs};
use crate::history::HistoryFile;

// Tracing target constants
pub const TRACING_TARGET_CONFIG: &str = "ragdoll_cli::config";
pub const TRACING_TARGET_SCAN: &str = "ragdoll_cli::scan";
pub const TRACING_TARGET_HISTORY: &str = "ragdoll_cli::history";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_CONFIG,
            error = %error,
            "command terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();

    match &cli.command {
        Command::Scan(args) => scan::run(&cli.provider, args).await,
        Command::History => run_history(&cli.provider),
        Command::Health => run_health(&cli.provider).await,
    }
}

/// Prints the local scan history, most recent first.
fn run_history(provider: &ProviderArgs) -> anyhow::Result<()> {
    let history = HistoryFile::new(
        provider
            .history_file
            .clone()
            .unwrap_or_else(HistoryFile::default_path),
    );
    let log = history.load()?;

    if log.is_empty() {
        println!("no scans recorded yet");
        return Ok(());
    }

    for entry in log.entries() {
        println!("{}  {}  {}", entry.timestamp, entry.task_id, entry.image_ref);
        for line in entry.result_text.lines().take(3) {
            println!("    {line}");
        }
        if entry.result_text.lines().count() > 3 {
            println!("    ...");
        }
        println!();
    }
    Ok(())
}

/// Probes the provider's health endpoint and reports the outcome.
///
/// The probe works without credentials; a key is applied when present.
async fn run_health(provider: &ProviderArgs) -> anyhow::Result<()> {
    let client = provider.client(false)?;
    let health = client.health_check().await?;

    let label = match health.status {
        ServiceStatus::Healthy => "healthy",
        ServiceStatus::Degraded => "degraded",
        ServiceStatus::Unhealthy => "unhealthy",
    };
    print!("status: {label}");
    if let Some(response) = health.response {
        print!(" ({} ms)", response.as_millis());
    }
    println!();

    if let Some(message) = &health.message {
        println!("message: {message}");
    }

    if health.status == ServiceStatus::Unhealthy {
        anyhow::bail!("service is unhealthy");
    }
    Ok(())
}

/// Initializes tracing with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
