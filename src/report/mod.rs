//! Dashboard output.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::dashboard::DashboardView;
use crate::models::RoundRange;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Information about where and when the dashboard was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub api_url: String,
    pub generated_at: DateTime<Utc>,
    pub round_range: RoundRange,
}

/// A rendered dashboard with its metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub dashboard: DashboardView,
}

/// Display-only knobs for the Markdown renderer.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Decimal places for score metrics.
    pub precision: usize,
    /// Maximum leaderboard rows to print.
    pub top: Option<usize>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            precision: 3,
            top: None,
        }
    }
}
