//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use ragdoll_gitee::{GiteeClient, GiteeConfig, GiteeCredentials};

use crate::TRACING_TARGET_CONFIG;

/// OCR scans against the Gitee AI DeepSeek-OCR service.
#[derive(Debug, Parser)]
#[command(name = "ragdoll", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Provider connection settings shared by all subcommands.
#[derive(Debug, Args)]
pub struct ProviderArgs {
    /// API key for the OCR provider.
    #[arg(long, global = true, env = "GITEE_AI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OCR API.
    #[arg(long, global = true, default_value = "https://ai.gitee.com/v1")]
    pub base_url: String,

    /// Seconds between task status checks.
    #[arg(long, global = true, default_value_t = 10)]
    pub poll_interval_secs: u64,

    /// Maximum number of status checks before giving up.
    #[arg(long, global = true, default_value_t = 180)]
    pub max_poll_attempts: u32,

    /// Path of the local scan history file.
    #[arg(long, global = true, env = "RAGDOLL_HISTORY")]
    pub history_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit an image and wait for the extracted text.
    Scan(ScanArgs),
    /// Show the local scan history, most recent first.
    History,
    /// Probe the OCR provider's health endpoint.
    Health,
}

/// Arguments for the `scan` subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Image to recognize (jpg, png or webp).
    pub image: PathBuf,

    /// Prompt guiding the extraction.
    #[arg(long)]
    pub prompt: Option<String>,

    /// OCR model identifier.
    #[arg(long)]
    pub model: Option<String>,

    /// Model size variant.
    #[arg(long)]
    pub model_size: Option<String>,

    /// Write the result to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl ProviderArgs {
    /// Builds a client; `require_key` distinguishes the scan flow from the
    /// anonymous health probe.
    pub fn client(&self, require_key: bool) -> anyhow::Result<GiteeClient> {
        let credentials = match &self.api_key {
            Some(key) => GiteeCredentials::bearer(key.clone()),
            None if require_key => {
                anyhow::bail!("an API key is required; pass --api-key or set GITEE_AI_API_KEY")
            }
            None => GiteeCredentials::none(),
        };

        let config = GiteeConfig::builder()
            .with_base_url(&self.base_url)
            .context("invalid --base-url")?
            .with_poll_interval(Duration::from_secs(self.poll_interval_secs))
            .with_max_poll_attempts(self.max_poll_attempts)
            .build()
            .context("invalid provider configuration")?;

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            base_url = %config.base_url,
            poll_interval_secs = self.poll_interval_secs,
            max_poll_attempts = self.max_poll_attempts,
            "provider configuration"
        );

        Ok(GiteeClient::new(config, credentials)?)
    }
}
