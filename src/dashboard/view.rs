//! Render model handed to the report generator.

use crate::analysis::{
    duplicate_subset, leaderboard_aggregate, round_metrics, wallet_options, wallet_summary,
};
use crate::dashboard::state::DashboardState;
use crate::models::{LeaderboardAggregate, ResultSet, RoundMetrics, RoundRange, WalletSummary};
use serde::{Deserialize, Serialize};

pub const DASHBOARD_TITLE: &str = "OCEAN Leaderboard Results";

/// Everything the dashboard displays for one state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub title: String,
    /// Round selector options, newest first.
    pub rounds: Vec<i64>,
    pub selected_round: Option<i64>,
    /// Present whenever a round is selected.
    pub round: Option<RoundPanel>,
}

/// Data for the selected round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundPanel {
    pub round: i64,
    pub metrics: RoundMetrics,
    /// Submissions ordered best first.
    pub results: ResultSet,
    pub leaderboard: Vec<LeaderboardAggregate>,
    pub wallet_options: Vec<String>,
    pub wallet: Option<WalletSummary>,
    pub duplicates: Vec<LeaderboardAggregate>,
}

impl RoundPanel {
    pub fn build(round: i64, results: &ResultSet, wallet: Option<&str>) -> Self {
        let leaderboard = leaderboard_aggregate(results);
        let duplicates = duplicate_subset(&leaderboard);

        Self {
            round,
            metrics: round_metrics(results),
            results: results.clone(),
            wallet_options: wallet_options(&leaderboard),
            wallet: wallet.map(|addr| wallet_summary(results, addr)),
            leaderboard,
            duplicates,
        }
    }
}

/// Build the view for `state`. `results` must be the selected round's rows.
pub fn build_view(
    range: &RoundRange,
    state: &DashboardState,
    results: Option<&ResultSet>,
) -> DashboardView {
    let round = match (state.round, results) {
        (Some(round), Some(rows)) => Some(RoundPanel::build(round, rows, state.wallet.as_deref())),
        _ => None,
    };

    DashboardView {
        title: DASHBOARD_TITLE.to_string(),
        rounds: range.rounds(),
        selected_round: state.round,
        round,
    }
}
