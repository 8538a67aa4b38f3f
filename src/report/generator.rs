//! Markdown and JSON dashboard rendering.
//!
//! This module turns a `Report` into the text printed to the terminal or
//! written to the output file.

use crate::dashboard::{DashboardView, RoundPanel};
use crate::models::{LeaderboardAggregate, ResultSet, RoundMetrics, ScoreStats, WalletSummary};
use crate::report::{RenderOptions, Report, ReportMetadata};
use anyhow::Result;

/// Generate the complete Markdown dashboard.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", report.dashboard.title));

    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str(&generate_round_selector(&report.dashboard));

    match &report.dashboard.round {
        Some(panel) => {
            output.push_str(&generate_round_section(panel, options));
            output.push_str(&generate_wallet_section(panel, options));
            output.push_str(&generate_duplicates_section(panel, options));
        }
        None if report.dashboard.rounds.is_empty() => {
            output.push_str("No challenge rounds available.\n\n");
        }
        None => {
            output.push_str("Select a challenge round to view the leaderboard.\n\n");
        }
    }

    output.push_str(&generate_footer());

    output
}

/// Format a score with a fixed number of decimals, or a placeholder.
pub fn format_score(score: Option<f64>, precision: usize) -> String {
    match score {
        Some(value) if value.is_finite() => format!("{:.*}", precision, value),
        Some(value) => value.to_string(),
        None => "n/a".to_string(),
    }
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str(&format!("- **Source:** {}\n", metadata.api_url));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rounds available:** {}\n", metadata.round_range));
    section.push('\n');

    section
}

/// List the selector options, marking the selected round.
fn generate_round_selector(view: &DashboardView) -> String {
    if view.rounds.is_empty() {
        return String::new();
    }

    let options: Vec<String> = view
        .rounds
        .iter()
        .map(|round| {
            if Some(*round) == view.selected_round {
                format!("**[{}]**", round)
            } else {
                round.to_string()
            }
        })
        .collect();

    format!("**Challenge rounds:** {}\n\n", options.join(" · "))
}

fn generate_metrics_table(count: usize, scores: Option<ScoreStats>, precision: usize) -> String {
    let mut table = String::new();

    table.push_str("| Submissions | Best score | Worst score | Average score |\n");
    table.push_str("|:---:|:---:|:---:|:---:|\n");
    table.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        count,
        format_score(scores.map(|s| s.best), precision),
        format_score(scores.map(|s| s.worst), precision),
        format_score(scores.map(|s| s.mean), precision),
    ));

    table
}

fn generate_submissions_table(rows: &ResultSet, top: Option<usize>) -> String {
    let mut table = String::new();

    table.push_str("| # | from_addr | nft_addr | nmse |\n");
    table.push_str("|---:|:---|:---|---:|\n");

    let shown = top.unwrap_or(rows.len()).min(rows.len());
    for (rank, row) in rows.iter().take(shown).enumerate() {
        table.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            rank + 1,
            code_cell(&row.from_addr),
            code_cell(&row.nft_addr),
            row.nmse
        ));
    }

    if shown < rows.len() {
        table.push_str(&format!("\n*Showing {} of {} submissions.*\n", shown, rows.len()));
    }
    table.push('\n');

    table
}

/// Header metrics and the ranked submissions for the selected round.
fn generate_round_section(panel: &RoundPanel, options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Challenge Round {}\n\n", panel.round));

    if panel.results.is_empty() {
        section.push_str("No submissions for this round.\n\n");
        return section;
    }

    let RoundMetrics {
        num_submissions,
        scores,
        ..
    } = panel.metrics;
    section.push_str(&generate_metrics_table(
        num_submissions,
        scores,
        options.precision,
    ));
    section.push_str(&generate_submissions_table(&panel.results, options.top));

    section
}

/// Wallet selector options, followed by the selected wallet's submissions.
fn generate_wallet_section(panel: &RoundPanel, options: &RenderOptions) -> String {
    let mut section = String::new();
    section.push_str("## Wallet Lookup\n\n");

    if panel.wallet_options.is_empty() && panel.wallet.is_none() {
        section.push_str("No wallets submitted in this round.\n\n");
        return section;
    }

    let wallets: Vec<String> = panel
        .wallet_options
        .iter()
        .map(|addr| code_span(addr))
        .collect();
    section.push_str(&format!(
        "**Wallets in this round ({}):** {}\n\n",
        wallets.len(),
        wallets.join(" · ")
    ));

    match &panel.wallet {
        Some(wallet) => section.push_str(&generate_wallet_block(wallet, options)),
        None => section.push_str(
            "Select a wallet with `--wallet <ADDR>`, or `wallet <ADDR>` in interactive mode.\n\n",
        ),
    }

    section
}

fn generate_wallet_block(wallet: &WalletSummary, options: &RenderOptions) -> String {
    let mut block = String::new();

    block.push_str(&format!("**Wallet:** {}\n\n", code_span(&wallet.address)));

    if wallet.submissions.is_empty() {
        block.push_str("No submissions from this wallet in this round.\n\n");
        return block;
    }

    block.push_str(&generate_metrics_table(
        wallet.total_submissions(),
        wallet.scores,
        options.precision,
    ));
    block.push_str(&generate_submissions_table(&wallet.submissions, None));

    block
}

/// Wallets that submitted more than once.
fn generate_duplicates_section(panel: &RoundPanel, options: &RenderOptions) -> String {
    let mut section = String::new();

    section.push_str("## Multiple Submissions\n\n");
    section.push_str("| Repeat submissions | Duplicate addresses |\n");
    section.push_str("|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} |\n\n",
        panel.metrics.num_duplicates,
        panel.duplicates.len()
    ));

    if panel.duplicates.is_empty() {
        section.push_str("Every wallet submitted once.\n\n");
        return section;
    }

    section.push_str(&generate_aggregate_table(&panel.duplicates, options.precision));

    section
}

fn generate_aggregate_table(rows: &[LeaderboardAggregate], precision: usize) -> String {
    let mut table = String::new();

    table.push_str("| from_addr | total_submissions | best_score | worst_score | avg_score |\n");
    table.push_str("|:---|:---:|---:|---:|---:|\n");

    for row in rows {
        table.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            code_cell(&row.from_addr),
            row.total_submissions,
            format_score(Some(row.best_score), precision),
            format_score(Some(row.worst_score), precision),
            format_score(Some(row.avg_score), precision),
        ));
    }
    table.push('\n');

    table
}

/// Inline code span that survives backticks in `value`.
fn code_span(value: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in value.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    if longest == 0 {
        return format!("`{}`", value);
    }
    let fence = "`".repeat(longest + 1);
    format!("{} {} {}", fence, value, fence)
}

/// Code span for a table cell; `|` would otherwise end the cell.
fn code_cell(value: &str) -> String {
    code_span(&value.replace('|', "\\|"))
}

fn generate_footer() -> String {
    "---\n\n*Data from the Ocean Data Farming df-sql service*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::state::DashboardState;
    use crate::dashboard::view::build_view;
    use crate::models::{RoundRange, Submission};
    use chrono::Utc;

    fn metadata(range: RoundRange) -> ReportMetadata {
        ReportMetadata {
            api_url: "https://df-sql.example".to_string(),
            generated_at: Utc::now(),
            round_range: range,
        }
    }

    fn create_test_report(wallet: Option<&str>) -> Report {
        let range = RoundRange::new(Some(1), Some(3));
        let state = DashboardState {
            round: Some(3),
            wallet: wallet.map(String::from),
        };
        let rows = vec![
            Submission::new("0xA", "0xN1", 0.123456),
            Submission::new("0xB", "0xN3", 0.2),
            Submission::new("0xA", "0xN2", 0.3),
        ];

        Report {
            metadata: metadata(range),
            dashboard: build_view(&range, &state, Some(&rows)),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(None);
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("# OCEAN Leaderboard Results"));
        assert!(markdown.contains("## Challenge Round 3"));
        assert!(markdown.contains("**[3]** · 2 · 1"));
        assert!(markdown.contains("| 3 | 0.123 | 0.300 | 0.208 |"));
        assert!(markdown.contains("| 1 | `0xA` | `0xN1` | 0.123456 |"));
        assert!(markdown.contains("## Multiple Submissions"));
        assert!(markdown.contains("| `0xA` | 2 | 0.123 | 0.300 | 0.212 |"));
        assert!(markdown.contains("## Wallet Lookup"));
        assert!(markdown.contains("**Wallets in this round (2):** `0xA` · `0xB`"));
        assert!(!markdown.contains("**Wallet:**"));
    }

    #[test]
    fn test_wallet_section() {
        let report = create_test_report(Some("0xB"));
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("## Wallet Lookup"));
        assert!(markdown.contains("**Wallet:** `0xB`"));
        assert!(markdown.contains("| 1 | 0.200 | 0.200 | 0.200 |"));
    }

    #[test]
    fn test_top_limits_leaderboard() {
        let report = create_test_report(None);
        let options = RenderOptions {
            precision: 2,
            top: Some(1),
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(markdown.contains("*Showing 1 of 3 submissions.*"));
        assert!(!markdown.contains("| 2 | `0xB`"));
        assert!(markdown.contains("| 3 | 0.12 | 0.30 | 0.21 |"));
    }

    #[test]
    fn test_wallet_options_listed_below_top_cutoff() {
        let report = create_test_report(None);
        let options = RenderOptions {
            precision: 3,
            top: Some(1),
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("| 2 | `0xB`"));
        assert!(markdown.contains("`0xA` · `0xB`"));
    }

    #[test]
    fn test_table_cells_escape_markdown() {
        let range = RoundRange::new(Some(1), Some(1));
        let state = DashboardState {
            round: Some(1),
            wallet: None,
        };
        let rows = vec![
            Submission::new("0x|A", "n`ft", 0.1),
            Submission::new("0x|A", "0xN2", 0.2),
        ];
        let report = Report {
            metadata: metadata(range),
            dashboard: build_view(&range, &state, Some(&rows)),
        };
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("| 1 | `0x\\|A` | `` n`ft `` | 0.1 |"));
        assert!(markdown.contains("| `0x\\|A` | 2 | 0.100 | 0.200 | 0.150 |"));
        assert!(markdown.contains("**Wallets in this round (1):** `0x|A`"));
    }

    #[test]
    fn test_code_span_fences() {
        assert_eq!(code_span("0xA"), "`0xA`");
        assert_eq!(code_span("a`b"), "`` a`b ``");
        assert_eq!(code_span("a``b"), "``` a``b ```");
    }

    #[test]
    fn test_empty_round_shows_no_data() {
        let range = RoundRange::new(Some(7), Some(7));
        let state = DashboardState::initial(&range);
        let report = Report {
            metadata: metadata(range),
            dashboard: build_view(&range, &state, Some(&Vec::new())),
        };
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("No submissions for this round."));
        assert!(!markdown.contains("NaN"));
    }

    #[test]
    fn test_no_rounds_available() {
        let range = RoundRange::default();
        let report = Report {
            metadata: metadata(range),
            dashboard: build_view(&range, &DashboardState::initial(&range), None),
        };
        let markdown = generate_markdown_report(&report, &RenderOptions::default());

        assert!(markdown.contains("No challenge rounds available."));
        assert!(markdown.contains("- **Rounds available:** none"));
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(0.1), 3), "0.100");
        assert_eq!(format_score(Some(1.23456), 1), "1.2");
        assert_eq!(format_score(None, 3), "n/a");
        assert_eq!(format_score(Some(f64::NAN), 3), "NaN");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(Some("0xA"));
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"generated_at\""));
        assert!(json.contains("\"selected_round\": 3"));
        assert!(json.contains("\"duplicates\""));
        assert!(json.contains("\"num_duplicates\": 1"));
    }
}
