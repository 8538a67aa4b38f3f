//! Dashboard session: owns the data source, the fetched round range, the
//! per-round result cache and the current selections.

use crate::cache::ResultCache;
use crate::client::ScoreSource;
use crate::dashboard::state::{DashboardState, Event};
use crate::dashboard::view::{build_view, DashboardView};
use crate::error::DashboardError;
use crate::models::{ResultSet, RoundRange};
use std::sync::Arc;
use tracing::{debug, info};

pub struct Dashboard<S> {
    source: S,
    range: RoundRange,
    cache: ResultCache<i64, ResultSet>,
    state: DashboardState,
}

impl<S: ScoreSource> Dashboard<S> {
    /// Fetch the round range (once for the session) and select the newest round.
    pub async fn open(source: S) -> Result<Self, DashboardError> {
        let range = source.fetch_round_range().await?;
        let state = DashboardState::initial(&range);
        debug!("Initial dashboard state: {:?}", state);

        Ok(Self {
            source,
            range,
            cache: ResultCache::new(),
            state,
        })
    }

    pub fn range(&self) -> &RoundRange {
        &self.range
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Apply an operator event. On error the previous state is kept.
    ///
    /// The next round's results are fetched before the state changes, so a
    /// failed fetch leaves the previous selection in place.
    pub async fn apply(&mut self, event: Event) -> Result<(), DashboardError> {
        let next = self.state.next(&event, &self.range)?;

        if let Some(round) = next.round {
            let results = self.results(round).await?;

            if let Some(wallet) = next.wallet.as_deref() {
                if !results.iter().any(|row| row.from_addr == wallet) {
                    return Err(DashboardError::UnknownWallet {
                        round,
                        wallet: wallet.to_string(),
                    });
                }
            }
        }

        info!("Applied {:?}", event);
        self.state = next;
        Ok(())
    }

    /// Build the view for the current state, fetching the round if needed.
    pub async fn render(&mut self) -> Result<DashboardView, DashboardError> {
        let results = match self.state.round {
            Some(round) => Some(self.results(round).await?),
            None => None,
        };

        Ok(build_view(&self.range, &self.state, results.as_deref()))
    }

    /// Rows for `round`, fetched at most once per session.
    pub async fn results(&mut self, round: i64) -> Result<Arc<ResultSet>, DashboardError> {
        if !self.cache.contains(&round) {
            info!("Fetching challenge results for round {}", round);
        }

        let source = &self.source;
        let rows = self
            .cache
            .get_or_fetch(round, || source.fetch_results(round))
            .await?;
        Ok(rows)
    }

    pub fn cached_rounds(&self) -> usize {
        self.cache.len()
    }
}
