//! HTTP client for the Ocean df-sql query service.
//!
//! Two endpoints are used:
//! - `POST /rewardsSummary` for the range of rounds with challenge rewards
//! - `POST /challenge/data` for the submissions of a single round

use crate::client::ScoreSource;
use crate::error::FetchError;
use crate::models::{sort_by_score, ResultSet, RoundRange, Submission};
use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_API_URL: &str = "https://df-sql.oceandao.org";

/// Configuration for the client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    /// `None` waits for the service indefinitely.
    pub timeout_seconds: Option<u64>,
    /// Show a spinner on stderr while a request is in flight.
    pub show_progress: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_seconds: None,
            show_progress: false,
        }
    }
}

/// `/challenge/data` request body.
#[derive(Debug, Serialize)]
struct ChallengeDataRequest {
    query: RoundQuery,
}

#[derive(Debug, Serialize)]
struct RoundQuery {
    round: i64,
}

/// `/rewardsSummary` request body.
#[derive(Debug, Serialize)]
struct RewardsSummaryRequest {
    query: RewardsQuery,
    fields: Vec<FieldExpression>,
}

#[derive(Debug, Serialize)]
struct RewardsQuery {
    round: GreaterThan,
    challenge_amt: GreaterThan,
}

#[derive(Debug, Serialize)]
struct GreaterThan {
    #[serde(rename = "$gt")]
    gt: i64,
}

#[derive(Debug, Serialize)]
struct FieldExpression {
    expression: Pattern,
}

#[derive(Debug, Serialize)]
struct Pattern {
    pattern: String,
}

impl RewardsSummaryRequest {
    fn round_range() -> Self {
        Self {
            query: RewardsQuery {
                round: GreaterThan { gt: -1 },
                challenge_amt: GreaterThan { gt: 0 },
            },
            fields: ["min(round) AS min_round", "max(round) AS max_round"]
                .into_iter()
                .map(|pattern| FieldExpression {
                    expression: Pattern {
                        pattern: pattern.to_string(),
                    },
                })
                .collect(),
        }
    }
}

/// One row of the `/rewardsSummary` response.
#[derive(Debug, Deserialize)]
struct RoundRangeRow {
    #[serde(default)]
    min_round: Option<i64>,
    #[serde(default)]
    max_round: Option<i64>,
}

/// Client for the df-sql service.
pub struct DfSqlClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl DfSqlClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        info!("Using df-sql service at {}", config.api_url);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder.build().map_err(|source| FetchError::Transport {
            url: config.api_url.clone(),
            source,
        })?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body and decode the JSON answer.
    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, FetchError>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {} {:?}", url, body);

        let spinner = self.spinner(path);

        let result = self.send(&url, body).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let text = result?;
        debug!("Received {} bytes from {}", text.len(), url);

        serde_json::from_str(&text).map_err(|source| FetchError::Malformed { url, source })
    }

    async fn send<B: Serialize>(&self, url: &str, body: &B) -> Result<String, FetchError> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .http_client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        response.text().await.map_err(transport)
    }

    fn spinner(&self, path: &str) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Querying /{}", path));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

impl ScoreSource for DfSqlClient {
    async fn fetch_round_range(&self) -> Result<RoundRange, FetchError> {
        let request = RewardsSummaryRequest::round_range();
        let rows: Vec<RoundRangeRow> = self.post_json("rewardsSummary", &request).await?;

        let row = rows.into_iter().next().ok_or_else(|| FetchError::Empty {
            url: self.endpoint("rewardsSummary"),
        })?;

        let range = RoundRange::new(row.min_round, row.max_round);
        info!("Challenge rounds available: {}", range);
        Ok(range)
    }

    async fn fetch_results(&self, round: i64) -> Result<ResultSet, FetchError> {
        let request = ChallengeDataRequest {
            query: RoundQuery { round },
        };
        let mut rows: Vec<Submission> = self.post_json("challenge/data", &request).await?;
        sort_by_score(&mut rows);

        info!("Fetched {} submissions for round {}", rows.len(), round);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the raw request.
    async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {} Test\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}", addr), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let line = line.to_ascii_lowercase();
                        line.strip_prefix("content-length:")
                            .and_then(|v| v.trim().parse::<usize>().ok())
                    })
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).to_string()
    }

    fn request_body(raw: &str) -> Value {
        let (_, body) = raw.split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    fn client(api_url: String) -> DfSqlClient {
        DfSqlClient::new(ClientConfig {
            api_url,
            timeout_seconds: Some(5),
            show_progress: false,
        })
        .unwrap()
    }

    #[test]
    fn test_rewards_summary_body() {
        let body = serde_json::to_value(RewardsSummaryRequest::round_range()).unwrap();
        assert_eq!(
            body,
            json!({
                "query": {"round": {"$gt": -1}, "challenge_amt": {"$gt": 0}},
                "fields": [
                    {"expression": {"pattern": "min(round) AS min_round"}},
                    {"expression": {"pattern": "max(round) AS max_round"}}
                ]
            })
        );
    }

    #[test]
    fn test_challenge_data_body() {
        let body = serde_json::to_value(ChallengeDataRequest {
            query: RoundQuery { round: 42 },
        })
        .unwrap();
        assert_eq!(body, json!({"query": {"round": 42}}));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = client("https://df-sql.example/".to_string());
        assert_eq!(
            client.endpoint("challenge/data"),
            "https://df-sql.example/challenge/data"
        );
    }

    #[tokio::test]
    async fn test_fetch_results_sorted_by_score() {
        let (url, server) = serve_once(
            200,
            r#"[{"from_addr":"0xB","nft_addr":"n2","nmse":0.7},
                {"from_addr":"0xA","nft_addr":"n1","nmse":0.05},
                {"from_addr":"0xC","nft_addr":"n3","nmse":0.3,"round":12}]"#,
        )
        .await;

        let rows = client(url).fetch_results(12).await.unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.from_addr.as_str()).collect();
        assert_eq!(order, vec!["0xA", "0xC", "0xB"]);

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /challenge/data "));
        assert_eq!(request_body(&raw), json!({"query": {"round": 12}}));
    }

    #[tokio::test]
    async fn test_fetch_round_range() {
        let (url, server) = serve_once(200, r#"[{"min_round":1,"max_round":9}]"#).await;

        let range = client(url).fetch_round_range().await.unwrap();
        assert_eq!(range, RoundRange::new(Some(1), Some(9)));

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /rewardsSummary "));
        assert_eq!(request_body(&raw)["query"]["challenge_amt"], json!({"$gt": 0}));
    }

    #[tokio::test]
    async fn test_fetch_round_range_missing_fields() {
        let (url, _server) = serve_once(200, r#"[{"min_round":null}]"#).await;

        let range = client(url).fetch_round_range().await.unwrap();
        assert_eq!(range, RoundRange::default());
        assert!(range.rounds().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_round_range_empty_array() {
        let (url, _server) = serve_once(200, "[]").await;

        let err = client(url).fetch_round_range().await.unwrap_err();
        assert!(matches!(err, FetchError::Empty { .. }));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let (url, _server) = serve_once(500, r#"{"error":"boom"}"#).await;

        let err = client(url).fetch_results(3).await.unwrap_err();
        match err {
            FetchError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 500);
                assert!(body.contains("boom"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (url, _server) = serve_once(200, "not json").await;

        let err = client(url).fetch_results(3).await.unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(format!("http://{}", addr))
            .fetch_results(1)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
