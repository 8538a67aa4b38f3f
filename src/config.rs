//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.ocean-leaderboard.toml` files.

use crate::cli::OutputFormat;
use crate::client::df_sql::DEFAULT_API_URL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = ".ocean-leaderboard.toml";

/// Largest accepted number of decimals for score metrics.
pub const MAX_PRECISION: usize = 12;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Query service settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Dashboard display settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// df-sql service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the query service.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds. Unset means wait indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_seconds: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Dashboard display settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for score metrics.
    #[serde(default = "default_precision")]
    pub precision: usize,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Leaderboard rows to print.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<usize>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            format: OutputFormat::default(),
            top: None,
        }
    }
}

fn default_precision() -> usize {
    3
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.ocean-leaderboard.toml` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only explicitly provided values override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.service.api_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.service.timeout_seconds = Some(timeout);
        }

        if let Some(precision) = args.precision {
            self.display.precision = precision;
        }
        if let Some(format) = args.format {
            self.display.format = format;
        }
        if let Some(top) = args.top {
            self.display.top = Some(top);
        }
    }

    /// Check the merged settings, whichever source they came from.
    pub fn validate(&self) -> Result<()> {
        let url = &self.service.api_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("API URL must start with 'http://' or 'https://': {}", url);
        }

        if self.service.timeout_seconds == Some(0) {
            bail!("Timeout must be at least 1 second");
        }

        if self.display.top == Some(0) {
            bail!("Top must be at least 1");
        }

        if self.display.precision > MAX_PRECISION {
            bail!("Precision must be at most {} digits", MAX_PRECISION);
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
