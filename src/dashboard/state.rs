//! Dashboard selections and the events that change them.

use crate::error::DashboardError;
use crate::models::RoundRange;
use serde::{Deserialize, Serialize};

/// Current operator selections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub round: Option<i64>,
    pub wallet: Option<String>,
}

/// An operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectRound(i64),
    SelectWallet(String),
    ClearWallet,
}

impl DashboardState {
    /// Initial selection: the newest round, no wallet.
    pub fn initial(range: &RoundRange) -> Self {
        Self {
            round: range.newest(),
            wallet: None,
        }
    }

    /// Compute the state that follows `event`.
    ///
    /// Only the round is validated here; whether a wallet belongs to the
    /// selected round depends on fetched data and is checked by the session.
    pub fn next(&self, event: &Event, range: &RoundRange) -> Result<Self, DashboardError> {
        match event {
            Event::SelectRound(round) => {
                if !range.contains(*round) {
                    return Err(DashboardError::UnknownRound(*round));
                }
                let wallet = if self.round == Some(*round) {
                    self.wallet.clone()
                } else {
                    None
                };
                Ok(Self {
                    round: Some(*round),
                    wallet,
                })
            }
            Event::SelectWallet(wallet) => {
                if self.round.is_none() {
                    return Err(DashboardError::NoRoundSelected);
                }
                Ok(Self {
                    round: self.round,
                    wallet: Some(wallet.clone()),
                })
            }
            Event::ClearWallet => Ok(Self {
                round: self.round,
                wallet: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> RoundRange {
        RoundRange::new(Some(1), Some(5))
    }

    #[test]
    fn test_initial_selects_newest() {
        assert_eq!(DashboardState::initial(&range()).round, Some(5));
        assert_eq!(DashboardState::initial(&RoundRange::default()).round, None);
    }

    #[test]
    fn test_select_round() {
        let state = DashboardState::initial(&range());
        let next = state.next(&Event::SelectRound(2), &range()).unwrap();
        assert_eq!(next.round, Some(2));
    }

    #[test]
    fn test_select_round_out_of_range() {
        let state = DashboardState::initial(&range());
        let err = state.next(&Event::SelectRound(9), &range()).unwrap_err();
        assert!(matches!(err, DashboardError::UnknownRound(9)));
    }

    #[test]
    fn test_changing_round_clears_wallet() {
        let state = DashboardState {
            round: Some(5),
            wallet: Some("0xA".to_string()),
        };

        let same = state.next(&Event::SelectRound(5), &range()).unwrap();
        assert_eq!(same.wallet.as_deref(), Some("0xA"));

        let other = state.next(&Event::SelectRound(4), &range()).unwrap();
        assert_eq!(other.wallet, None);
    }

    #[test]
    fn test_select_and_clear_wallet() {
        let state = DashboardState::initial(&range());
        let with_wallet = state
            .next(&Event::SelectWallet("0xA".to_string()), &range())
            .unwrap();
        assert_eq!(with_wallet.wallet.as_deref(), Some("0xA"));

        let cleared = with_wallet.next(&Event::ClearWallet, &range()).unwrap();
        assert_eq!(cleared.wallet, None);
        assert_eq!(cleared.round, Some(5));
    }

    #[test]
    fn test_wallet_needs_round() {
        let state = DashboardState::default();
        let err = state
            .next(&Event::SelectWallet("0xA".to_string()), &RoundRange::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::NoRoundSelected));
    }
}
