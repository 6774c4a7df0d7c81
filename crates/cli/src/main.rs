//! Singularity dashboard CLI
//!
//! A command-line front end for the dashboard view layer: renders the
//! resource utilization panel for scheduler requests and runs the log
//! search filter interactively.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{search, utilization};
use dashboard_lib::observability::init_tracing;
use std::io;
use std::sync::Arc;

const DEFAULT_API_URL: &str = "http://localhost:7099/singularity/";

/// Singularity dashboard CLI
#[derive(Parser)]
#[command(name = "sdash")]
#[command(author, version, about = "Terminal dashboard for the Singularity scheduler", long_about = None)]
pub struct Cli {
    /// Scheduler API base URL (can also be set via SDASH_API_URL env var)
    #[arg(long, env = "SDASH_API_URL")]
    pub api_url: Option<String>,

    /// Output format (defaults to the configured format, then table)
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show resource usage over the past 24 hours
    Utilization {
        /// Request ID (lists every request when omitted)
        request_id: Option<String>,

        /// Keep polling and re-render on every change
        #[arg(long, short)]
        watch: bool,

        /// Refresh interval in seconds for --watch (overrides config)
        #[arg(long)]
        interval: Option<u64>,

        /// Fail if the snapshot lists a request ID more than once
        #[arg(long, conflicts_with = "watch")]
        strict: bool,
    },

    /// Edit the log search filter interactively from stdin
    Search {
        /// Search string committed before the session starts
        #[arg(long, default_value = "")]
        initial: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(if cli.verbose { "debug" } else { "warn" }, false);

    let config = config::DashboardConfig::load()?;
    let format = cli
        .format
        .or_else(|| {
            config
                .default_format
                .as_deref()
                .and_then(output::OutputFormat::parse)
        })
        .unwrap_or_default();

    match cli.command {
        Commands::Utilization {
            request_id,
            watch,
            interval,
            strict,
        } => {
            let api_url = cli
                .api_url
                .or_else(|| config.api_url.clone())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string());
            let client = Arc::new(client::ApiClient::new(&api_url, config.request_timeout())?);

            if watch {
                let interval = interval
                    .filter(|secs| *secs > 0)
                    .map(std::time::Duration::from_secs)
                    .unwrap_or_else(|| config.refresh_interval());
                utilization::watch_utilization(client, request_id, interval, format).await?;
            } else {
                utilization::show_utilization(client, request_id, format, strict).await?;
            }
        }
        Commands::Search { initial } => {
            let stdin = io::stdin();
            let committed = search::run_session(stdin.lock(), io::stdout(), &initial, format)?;
            tracing::info!(search = %committed, "Search session finished");
        }
    }

    Ok(())
}
