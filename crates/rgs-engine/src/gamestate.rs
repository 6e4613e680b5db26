//! Round state — Gamestate, Prize, GameParams, wallet transactions
//!
//! A [`Gamestate`] is the resolved outcome of one player action. It is
//! constructed fresh per action and handed to the caller for persistence;
//! the engine never retains a reference. Every field survives a
//! serialize/deserialize cycle unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rgs_core::Fixed;

use crate::definition::{Payout, SymbolId};

/// A single win: which pay-table entry fired, the applied wild/round
/// multiplier, and the contributing symbol positions (column-major flat
/// indices, for client highlighting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prize {
    pub payout: Payout,
    /// Unique win-type identifier: `"<symbol>:<count>"`, a named special
    /// like `"freespin:10"`, or a `V`-prefixed vertical blaze index.
    pub index: String,
    /// Wild multiplier applied to this prize (round multiplier excluded).
    pub multiplier: Fixed,
    pub symbol_positions: Vec<usize>,
    /// Win-line index for line-family wins.
    #[serde(default)]
    pub win_line: Option<usize>,
}

impl Prize {
    /// The prize's contribution in pay-table units.
    pub fn relative_payout(&self) -> Fixed {
        self.payout.multiplier.mul(self.multiplier)
    }
}

/// Wallet transaction kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionKind {
    Wager,
    Payout,
}

/// A wallet transaction the caller must settle. Idempotent submission and
/// retry bookkeeping are the wallet collaborator's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Fixed,
}

impl WalletTransaction {
    pub fn new(kind: TransactionKind, amount: Fixed) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            amount,
        }
    }
}

/// Feature-continuation state persisted between rounds of one feature.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureState {
    /// Identifier of the reel set a trigger switched the round to, if any.
    pub reel_set: String,
    /// Trigger-owned payload, opaque to the engine.
    pub data: serde_json::Value,
}

/// The resolved outcome of one action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Gamestate {
    pub id: String,
    /// The action this state resolves.
    pub action: String,
    /// Name of the engine definition used.
    pub definition: String,
    pub previous_gamestate: String,
    pub next_gamestate: String,
    /// Carried unchanged across all continuation steps of one round.
    pub round_id: String,
    /// Column-major visible symbols, one vector per reel.
    pub symbol_grid: Vec<Vec<SymbolId>>,
    /// Stop position per reel.
    pub stop_list: Vec<usize>,
    pub prizes: Vec<Prize>,
    /// Win total in pay-table units (stake-unit multiples).
    pub relative_payout: Fixed,
    /// Round multiplier applied on top of the relative payout.
    pub multiplier: Fixed,
    /// Pending action queue; `["finish"]` alone means the round is closed.
    pub next_actions: Vec<String>,
    /// Stake unit this round was played at.
    pub bet_per_line: Fixed,
    pub selected_win_lines: Vec<usize>,
    /// Money won by this step.
    pub spin_win: Fixed,
    /// Money won by the round so far.
    pub cumulative_win: Fixed,
    pub transactions: Vec<WalletTransaction>,
    /// Names of feature triggers active for this round.
    pub features: Vec<String>,
    pub feature_view: Option<FeatureState>,
}

impl Gamestate {
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// A closed round is eligible for wager-charging on the next request.
    pub fn round_closed(&self) -> bool {
        self.next_actions.len() == 1 && self.next_actions[0] == crate::actions::FINISH
    }

    /// Head of the pending queue, if any.
    pub fn queued_action(&self) -> Option<&str> {
        self.next_actions.first().map(String::as_str)
    }
}

/// The player's request. `previous_gamestate` is injected by the
/// orchestrator from the store — never taken from an external caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameParams {
    pub action: String,
    /// Total stake for the round.
    pub stake: Fixed,
    pub selected_win_lines: Vec<usize>,
    /// Selection id for pick rounds, or a shuffle subset name.
    pub selection: String,
    /// Reel index for respin rounds.
    pub respin_reel: Option<usize>,
    #[serde(skip)]
    pub previous_gamestate: Option<Box<Gamestate>>,
}

impl GameParams {
    pub fn previous(&self) -> Option<&Gamestate> {
        self.previous_gamestate.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_closed() {
        let mut gs = Gamestate {
            next_actions: vec!["finish".into()],
            ..Default::default()
        };
        assert!(gs.round_closed());

        gs.next_actions = vec!["freespin".into(), "finish".into()];
        assert!(!gs.round_closed());
    }

    #[test]
    fn test_prize_relative_payout() {
        let prize = Prize {
            payout: Payout {
                symbol: 1,
                count: 5,
                multiplier: Fixed::from_int(10),
            },
            index: "1:5".into(),
            multiplier: Fixed::from_int(3),
            symbol_positions: vec![0, 3, 6, 9, 12],
            win_line: Some(0),
        };
        assert_eq!(prize.relative_payout(), Fixed::from_int(30));
    }

    #[test]
    fn test_gamestate_serde_round_trip() {
        let gs = Gamestate {
            id: "a".into(),
            action: "base".into(),
            definition: "base".into(),
            round_id: "r".into(),
            symbol_grid: vec![vec![1, 2, 3]; 5],
            stop_list: vec![0, 4, 2, 7, 1],
            relative_payout: Fixed::from_int(12),
            multiplier: Fixed::from_int(2),
            next_actions: vec!["cascade".into(), "finish".into()],
            bet_per_line: Fixed::from_raw(100_000),
            cumulative_win: Fixed::from_int(24),
            spin_win: Fixed::from_int(24),
            transactions: vec![WalletTransaction::new(TransactionKind::Payout, Fixed::from_int(24))],
            feature_view: Some(FeatureState {
                reel_set: "bonus".into(),
                data: serde_json::json!({"charge": 2}),
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&gs).unwrap();
        let back: Gamestate = serde_json::from_str(&json).unwrap();
        assert_eq!(gs, back);
    }

    #[test]
    fn test_game_params_previous_not_serialized() {
        let params = GameParams {
            action: "base".into(),
            previous_gamestate: Some(Box::new(Gamestate::default())),
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: GameParams = serde_json::from_str(&json).unwrap();
        assert!(back.previous_gamestate.is_none());
    }
}
