//! Round aggregation and statistics.
//!
//! This module provides the pure transforms that turn a round's result set
//! into the numbers and tables shown on the dashboard.

use crate::models::{LeaderboardAggregate, ResultSet, RoundMetrics, ScoreStats, WalletSummary};
use std::collections::{BTreeMap, HashSet};

/// Compute the headline metrics for a round.
///
/// `num_duplicates` counts every occurrence of a sender after its first one,
/// so three rows from the same wallet contribute two.
pub fn round_metrics(rs: &ResultSet) -> RoundMetrics {
    let mut seen: HashSet<&str> = HashSet::new();
    let num_duplicates = rs
        .iter()
        .filter(|row| !seen.insert(row.from_addr.as_str()))
        .count();

    RoundMetrics {
        num_submissions: rs.len(),
        num_duplicates,
        scores: ScoreStats::from_scores(rs.iter().map(|row| row.nmse)),
    }
}

/// Group a round by sender address.
///
/// Returns exactly one row per distinct address, ordered by address.
pub fn leaderboard_aggregate(rs: &ResultSet) -> Vec<LeaderboardAggregate> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();

    for row in rs {
        grouped
            .entry(row.from_addr.as_str())
            .or_default()
            .push(row.nmse);
    }

    grouped
        .into_iter()
        .filter_map(|(addr, scores)| {
            let total_submissions = scores.len();
            ScoreStats::from_scores(scores).map(|stats| LeaderboardAggregate {
                from_addr: addr.to_string(),
                total_submissions,
                best_score: stats.best,
                worst_score: stats.worst,
                avg_score: stats.mean,
            })
        })
        .collect()
}

/// Wallets with more than one submission.
pub fn duplicate_subset(agg: &[LeaderboardAggregate]) -> Vec<LeaderboardAggregate> {
    agg.iter()
        .filter(|row| row.total_submissions > 1)
        .cloned()
        .collect()
}

/// Rows submitted by exactly `address` (case-sensitive, no normalization).
pub fn wallet_filter(rs: &ResultSet, address: &str) -> ResultSet {
    rs.iter()
        .filter(|row| row.from_addr == address)
        .cloned()
        .collect()
}

/// Individual lookup for a wallet.
pub fn wallet_summary(rs: &ResultSet, address: &str) -> WalletSummary {
    let submissions = wallet_filter(rs, address);
    let scores = ScoreStats::from_scores(submissions.iter().map(|row| row.nmse));

    WalletSummary {
        address: address.to_string(),
        submissions,
        scores,
    }
}

/// Addresses offered by the wallet selector, in leaderboard order.
pub fn wallet_options(agg: &[LeaderboardAggregate]) -> Vec<String> {
    agg.iter().map(|row| row.from_addr.clone()).collect()
}
