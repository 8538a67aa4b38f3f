//! Error types for fetching and dashboard interaction.

use thiserror::Error;

/// Failure while talking to the df-sql query service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, ...).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body could not be decoded into the expected shape.
    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body decoded but held no rows where at least one was required.
    #[error("empty response from {url}")]
    Empty { url: String },
}

/// Failure while applying an operator event to the dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("round {0} is not available")]
    UnknownRound(i64),

    #[error("wallet {wallet} has no submissions in round {round}")]
    UnknownWallet { round: i64, wallet: String },

    #[error("no challenge round is selected")]
    NoRoundSelected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            url: "https://example.test/challenge/data".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "upstream down".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("502"));
        assert!(msg.contains("upstream down"));
    }

    #[test]
    fn test_dashboard_error_wraps_fetch() {
        let err: DashboardError = FetchError::Empty {
            url: "https://example.test/rewardsSummary".to_string(),
        }
        .into();
        assert!(matches!(err, DashboardError::Fetch(FetchError::Empty { .. })));
        assert_eq!(
            err.to_string(),
            "empty response from https://example.test/rewardsSummary"
        );
    }
}
