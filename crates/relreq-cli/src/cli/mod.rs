//! CLI for relreq.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use relreq_core::config::{self, secs_to_duration};
use relreq_core::retry::RetryPolicy;
use std::path::PathBuf;

use commands::{run_fetch, run_items};

/// Top-level CLI for relreq.
#[derive(Debug, Parser)]
#[command(name = "relreq")]
#[command(about = "relreq: reliable HTTP fetch with escalating timeouts, plus an item store", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL, retrying with a growing timeout until it succeeds.
    Fetch {
        /// Absolute HTTP/HTTPS URL.
        url: String,

        /// Write the body to this file instead of stdout.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,

        #[command(flatten)]
        retry: RetryArgs,
    },

    /// Manage the item store.
    Items {
        /// sqlx SQLite URL (overrides `database_url` in config).
        #[arg(long, value_name = "URL")]
        database_url: Option<String>,

        #[command(subcommand)]
        command: ItemsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// Create the items table if missing.
    Init,

    /// Insert a JSON array of items in one batch.
    Import {
        /// Path to the JSON file.
        path: PathBuf,
    },

    /// List items matching user, title and description exactly.
    Find {
        #[arg(long)]
        user_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
    },
}

/// Per-invocation overrides of the `[retry]` config section.
#[derive(Debug, Clone, Default, Args)]
pub struct RetryArgs {
    /// Maximum number of attempts, including the first.
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// Timeout of the first attempt, in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Seconds added to the timeout after each failed attempt.
    #[arg(long, value_name = "SECS")]
    pub increment: Option<f64>,

    /// Stop on the first 4xx response instead of retrying it.
    #[arg(long)]
    pub no_retry_client_errors: bool,
}

impl RetryArgs {
    /// Apply overrides on top of `base`. Validation happens in the engine.
    pub fn apply(&self, base: RetryPolicy) -> Result<RetryPolicy> {
        let mut policy = base;
        if let Some(n) = self.max_attempts {
            policy.max_attempts = n;
        }
        if let Some(secs) = self.timeout {
            policy.initial_timeout = secs_to_duration("--timeout", secs)?;
        }
        if let Some(secs) = self.increment {
            policy.timeout_increment = secs_to_duration("--increment", secs)?;
        }
        if self.no_retry_client_errors {
            policy.retry_client_errors = false;
        }
        Ok(policy)
    }
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Fetch { url, output, retry } => {
                run_fetch(&cfg, &url, output.as_deref(), &retry).await?
            }
            CliCommand::Items {
                database_url,
                command,
            } => {
                let url = database_url.as_deref().or(cfg.database_url.as_deref());
                run_items(url, command).await?
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
