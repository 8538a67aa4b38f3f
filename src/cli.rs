//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::config::MAX_PRECISION;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ocean Leaderboard - challenge round results in your terminal
///
/// Fetches submissions for an Ocean Data Farming challenge round and shows
/// summary metrics, the ranked leaderboard, a wallet lookup and the wallets
/// that submitted more than once.
///
/// Examples:
///   ocean-leaderboard
///   ocean-leaderboard --round 42 --top 20
///   ocean-leaderboard --round 42 --wallet 0xabc... --format json -o round42.json
///   ocean-leaderboard --interactive
///   ocean-leaderboard --list-rounds
///   ocean-leaderboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Challenge round to display
    ///
    /// Defaults to the newest round with challenge rewards.
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    pub round: Option<i64>,

    /// Wallet address to look up in the selected round
    ///
    /// Matched exactly, including letter case.
    #[arg(short, long, value_name = "ADDR")]
    pub wallet: Option<String>,

    /// Show only the best N submissions in the leaderboard table
    #[arg(short, long, value_name = "N")]
    pub top: Option<usize>,

    /// Output format (markdown, json)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Start an interactive console reading commands from stdin
    #[arg(short, long, conflicts_with = "list_rounds")]
    pub interactive: bool,

    /// Print the available rounds and exit
    #[arg(long)]
    pub list_rounds: bool,

    /// df-sql service base URL
    #[arg(long, value_name = "URL", env = "OCEAN_API_URL")]
    pub api_url: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Decimal places for score metrics
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .ocean-leaderboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no spinner)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .ocean-leaderboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.top == Some(0) {
            return Err("Top must be at least 1".to_string());
        }

        if let Some(precision) = self.precision {
            if precision > MAX_PRECISION {
                return Err(format!("Precision must be at most {} digits", MAX_PRECISION));
            }
        }

        if let Some(ref wallet) = self.wallet {
            if wallet.trim().is_empty() {
                return Err("Wallet address cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
