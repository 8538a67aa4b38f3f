//! Access to challenge data.
//!
//! `ScoreSource` is the seam the dashboard fetches through; `DfSqlClient`
//! implements it over HTTP.

pub mod df_sql;

pub use df_sql::{ClientConfig, DfSqlClient};

use crate::error::FetchError;
use crate::models::{ResultSet, RoundRange};

/// Something that can answer the two dashboard queries.
#[allow(async_fn_in_trait)]
pub trait ScoreSource {
    /// Minimum and maximum round with challenge rewards.
    async fn fetch_round_range(&self) -> Result<RoundRange, FetchError>;

    /// All submissions for `round`, sorted ascending by score.
    async fn fetch_results(&self, round: i64) -> Result<ResultSet, FetchError>;
}
