//! Data models for the leaderboard dashboard.
//!
//! This module contains the rows returned by the df-sql service and the
//! aggregates derived from them for display.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single challenge submission as returned by `/challenge/data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Wallet address of the participant that submitted.
    pub from_addr: String,
    /// Address of the NFT holding the submitted predictions.
    pub nft_addr: String,
    /// Normalized mean squared error. Lower is better.
    pub nmse: f64,
}

#[cfg(test)]
impl Submission {
    pub fn new(from_addr: impl Into<String>, nft_addr: impl Into<String>, nmse: f64) -> Self {
        Self {
            from_addr: from_addr.into(),
            nft_addr: nft_addr.into(),
            nmse,
        }
    }
}

/// All submissions of one round, ordered best (lowest nmse) first.
pub type ResultSet = Vec<Submission>;

/// Sort submissions ascending by score.
///
/// The sort is stable, so rows with equal scores keep the service order.
/// NaN scores sort after every real score.
pub fn sort_by_score(rows: &mut [Submission]) {
    rows.sort_by(|a, b| compare_scores(a.nmse, b.nmse));
}

fn compare_scores(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}

/// Range of rounds that have challenge rewards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRange {
    pub min_round: Option<i64>,
    pub max_round: Option<i64>,
}

impl RoundRange {
    pub fn new(min_round: Option<i64>, max_round: Option<i64>) -> Self {
        Self {
            min_round,
            max_round,
        }
    }

    /// Selectable rounds, newest first.
    pub fn rounds(&self) -> Vec<i64> {
        match (self.min_round, self.max_round) {
            (Some(min), Some(max)) if min <= max => (min..=max).rev().collect(),
            _ => Vec::new(),
        }
    }

    /// The round selected when the operator has not picked one.
    pub fn newest(&self) -> Option<i64> {
        match (self.min_round, self.max_round) {
            (Some(min), Some(max)) if min <= max => Some(max),
            _ => None,
        }
    }

    pub fn contains(&self, round: i64) -> bool {
        matches!(
            (self.min_round, self.max_round),
            (Some(min), Some(max)) if (min..=max).contains(&round)
        )
    }

    pub fn is_empty(&self) -> bool {
        self.newest().is_none()
    }
}

impl fmt::Display for RoundRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min_round, self.max_round) {
            (Some(min), Some(max)) => write!(f, "{}..={}", min, max),
            _ => write!(f, "none"),
        }
    }
}

/// Best, worst and mean of a non-empty set of scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreStats {
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
}

impl ScoreStats {
    /// Returns `None` for an empty iterator.
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut best = f64::INFINITY;
        let mut worst = f64::NEG_INFINITY;

        for score in scores {
            count += 1;
            sum += score;
            best = best.min(score);
            worst = worst.max(score);
        }

        if count == 0 {
            return None;
        }

        Some(Self {
            best,
            worst,
            mean: sum / count as f64,
        })
    }
}

/// Headline numbers for a round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundMetrics {
    /// Number of rows in the round.
    pub num_submissions: usize,
    /// Rows whose sender already appeared earlier in the round.
    pub num_duplicates: usize,
    /// Score statistics; absent when the round has no submissions.
    pub scores: Option<ScoreStats>,
}

/// Per-wallet aggregate for one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardAggregate {
    pub from_addr: String,
    pub total_submissions: usize,
    pub best_score: f64,
    pub worst_score: f64,
    pub avg_score: f64,
}

/// A wallet's submissions within a round, with their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    pub address: String,
    pub submissions: ResultSet,
    pub scores: Option<ScoreStats>,
}

impl WalletSummary {
    pub fn total_submissions(&self) -> usize {
        self.submissions.len()
    }
}
