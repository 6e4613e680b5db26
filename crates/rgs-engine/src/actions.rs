//! Action-queue state machine and round post-processing
//!
//! The `next_actions` queue is the round's implicit state machine: the head
//! is the action about to execute, and `["finish"]` alone means the round
//! is closed and eligible for wager-charging on the next request. A bug
//! here can let a player replay a round or be charged twice, so the merge
//! rules are explicit and exhaustively tested.

use log::debug;

use rgs_core::Fixed;

use crate::definition::EngineDefinition;
use crate::error::EngineError;
use crate::gamestate::{GameParams, Gamestate, TransactionKind, WalletTransaction};
use crate::rounds::RoundDraft;

/// Terminates every queue; alone it closes the round.
pub const FINISH: &str = "finish";
/// Directive: overwrite every queued action (except `finish`) with the next
/// proposed action.
pub const REPLACE_QUEUED_ACTION_TYPE: &str = "replaceQueuedActionType";
/// Directive: discard the previous queue and start over from the proposal.
pub const REPLACE_QUEUED_ACTIONS: &str = "replaceQueuedActions";
/// Directive: run the previously queued actions first, then the proposal.
pub const QUEUE_ACTIONS_AFTER: &str = "queueActionsAfter";

/// Merge a generator's proposed actions into the previous queue.
///
/// The result always carries a trailing `finish`.
pub fn prepare_actions(previous: &[String], proposed: &[String]) -> Vec<String> {
    let mut queue = match proposed.first().map(String::as_str) {
        None => previous.get(1..).unwrap_or_default().to_vec(),
        Some(REPLACE_QUEUED_ACTION_TYPE) => {
            let replacement = proposed.get(1).cloned().unwrap_or_default();
            previous
                .iter()
                .map(|a| {
                    if a == FINISH {
                        a.clone()
                    } else {
                        replacement.clone()
                    }
                })
                .collect()
        }
        Some(REPLACE_QUEUED_ACTIONS) => proposed[1..].to_vec(),
        Some(QUEUE_ACTIONS_AFTER) => {
            let mut queue: Vec<String> = previous
                .get(1..)
                .unwrap_or_default()
                .iter()
                .filter(|a| *a != FINISH)
                .cloned()
                .collect();
            queue.extend(proposed[1..].iter().cloned());
            queue
        }
        Some(_) => {
            let mut queue = proposed.to_vec();
            queue.extend(previous.get(1..).unwrap_or_default().iter().cloned());
            queue
        }
    };

    if queue.last().map(String::as_str) != Some(FINISH) {
        queue.push(FINISH.to_string());
    }
    queue
}

/// Turn a generator draft into the final gamestate: queue merge, identity
/// linkage, wager/payout transaction synthesis, win totals.
pub fn finalize(
    def: &EngineDefinition,
    draft: RoundDraft,
    params: &GameParams,
    action: &str,
) -> Result<Gamestate, EngineError> {
    let prev = params.previous();
    let fresh = prev.map(|p| p.round_closed()).unwrap_or(true);

    let previous_queue: Vec<String> = match prev {
        Some(p) => p.next_actions.clone(),
        None => vec![FINISH.to_string()],
    };
    let next_actions = prepare_actions(&previous_queue, &draft.next_actions);

    // The previous state pre-linked our id; honour it so the chain stays
    // contiguous across continuations.
    let id = prev
        .filter(|p| !p.next_gamestate.is_empty())
        .map(|p| p.next_gamestate.clone())
        .unwrap_or_else(Gamestate::new_id);
    let round_id = match prev {
        Some(p) if !fresh => p.round_id.clone(),
        _ => id.clone(),
    };

    let bet_per_line = if fresh {
        params
            .stake
            .div_int(def.stake_divisor())
            .ok_or_else(|| EngineError::malformed(&def.name, "zero stake divisor"))?
    } else {
        prev.map(|p| p.bet_per_line).unwrap_or(params.stake)
    };
    let selected_win_lines = match prev {
        Some(p) if !fresh => p.selected_win_lines.clone(),
        _ => params.selected_win_lines.clone(),
    };

    let spin_win = draft
        .payout_override
        .unwrap_or_else(|| draft.relative_payout.mul(draft.multiplier).mul(bet_per_line));
    let cumulative_win = match prev {
        Some(p) if !fresh => p.cumulative_win + spin_win,
        _ => spin_win,
    };

    let mut transactions = Vec::new();
    if fresh {
        let wager = draft.wager_override.unwrap_or(params.stake);
        if !wager.is_zero() {
            transactions.push(WalletTransaction::new(TransactionKind::Wager, wager));
        }
    }
    if !spin_win.is_zero() {
        transactions.push(WalletTransaction::new(TransactionKind::Payout, spin_win));
    } else if fresh {
        // Sentinel: every round boundary carries at least one payout entry.
        transactions.push(WalletTransaction::new(TransactionKind::Payout, Fixed::ZERO));
    }

    // Feature state set earlier in the round survives generators that do
    // not touch features.
    let feature_view = match draft.feature_view {
        Some(state) => Some(state),
        None if !fresh => prev.and_then(|p| p.feature_view.clone()),
        None => None,
    };

    let gamestate = Gamestate {
        id,
        action: action.to_string(),
        definition: def.name.clone(),
        previous_gamestate: prev.map(|p| p.id.clone()).unwrap_or_default(),
        next_gamestate: Gamestate::new_id(),
        round_id,
        symbol_grid: draft.symbol_grid,
        stop_list: draft.stop_list,
        prizes: draft.prizes,
        relative_payout: draft.relative_payout,
        multiplier: draft.multiplier,
        next_actions,
        bet_per_line,
        selected_win_lines,
        spin_win,
        cumulative_win,
        transactions,
        features: draft.features,
        feature_view,
    };
    debug!(
        "finalized {} action {} win {} queue {:?}",
        gamestate.id, gamestate.action, gamestate.spin_win, gamestate.next_actions
    );
    Ok(gamestate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_dequeue_on_empty_proposal() {
        let previous = strings(&["freespin", "freespin", "finish"]);
        assert_eq!(
            prepare_actions(&previous, &[]),
            strings(&["freespin", "finish"])
        );
    }

    #[test]
    fn test_dequeue_to_closed_round() {
        let previous = strings(&["finish"]);
        assert_eq!(prepare_actions(&previous, &[]), strings(&["finish"]));
    }

    #[test]
    fn test_replace_queued_action_type() {
        let previous = strings(&["A", "A", "A", "finish"]);
        let proposed = strings(&["replaceQueuedActionType", "B"]);
        assert_eq!(
            prepare_actions(&previous, &proposed),
            strings(&["B", "B", "B", "finish"])
        );
    }

    #[test]
    fn test_replace_queued_actions() {
        let previous = strings(&["A", "A", "A", "finish"]);
        let proposed = strings(&["replaceQueuedActions", "B", "B"]);
        assert_eq!(
            prepare_actions(&previous, &proposed),
            strings(&["B", "B", "finish"])
        );
    }

    #[test]
    fn test_queue_actions_after() {
        let previous = strings(&["A", "A", "A", "finish"]);
        let proposed = strings(&["queueActionsAfter", "B", "B"]);
        assert_eq!(
            prepare_actions(&previous, &proposed),
            strings(&["A", "A", "B", "B", "finish"])
        );
    }

    #[test]
    fn test_default_prepend() {
        let previous = strings(&["A", "finish"]);
        let proposed = strings(&["C", "C"]);
        assert_eq!(
            prepare_actions(&previous, &proposed),
            strings(&["C", "C", "finish"])
        );
    }

    #[test]
    fn test_fresh_round_wager_and_sentinel_payout() {
        let def = EngineDefinition {
            name: "base".into(),
            reels: vec![vec![0]; 1],
            view_size: vec![1],
            ..Default::default()
        };
        let params = GameParams {
            action: "base".into(),
            stake: Fixed::from_int(5),
            ..Default::default()
        };
        let draft = RoundDraft {
            multiplier: Fixed::ONE,
            ..Default::default()
        };
        let gs = finalize(&def, draft, &params, "base").unwrap();
        assert_eq!(gs.transactions.len(), 2);
        assert_eq!(gs.transactions[0].kind, TransactionKind::Wager);
        assert_eq!(gs.transactions[0].amount, Fixed::from_int(5));
        assert_eq!(gs.transactions[1].kind, TransactionKind::Payout);
        assert!(gs.transactions[1].amount.is_zero());
        assert_eq!(gs.round_id, gs.id);
        assert!(gs.round_closed());
    }

    #[test]
    fn test_continuation_charges_no_wager() {
        let def = EngineDefinition {
            name: "base".into(),
            stake_divisor: 1,
            ..Default::default()
        };
        let prev = Gamestate {
            id: "prev".into(),
            next_gamestate: "linked".into(),
            round_id: "round".into(),
            next_actions: vec!["freespin".into(), "finish".into()],
            bet_per_line: Fixed::from_int(2),
            cumulative_win: Fixed::from_int(7),
            ..Default::default()
        };
        let params = GameParams {
            action: "freespin".into(),
            stake: Fixed::from_int(5),
            previous_gamestate: Some(Box::new(prev)),
            ..Default::default()
        };
        let draft = RoundDraft {
            relative_payout: Fixed::from_int(3),
            multiplier: Fixed::ONE,
            ..Default::default()
        };
        let gs = finalize(&def, draft, &params, "freespin").unwrap();
        // Only a payout: 3 × 1 × bet 2 = 6, cumulative 7 + 6.
        assert_eq!(gs.transactions.len(), 1);
        assert_eq!(gs.transactions[0].kind, TransactionKind::Payout);
        assert_eq!(gs.transactions[0].amount, Fixed::from_int(6));
        assert_eq!(gs.cumulative_win, Fixed::from_int(13));
        assert_eq!(gs.id, "linked");
        assert_eq!(gs.previous_gamestate, "prev");
        assert_eq!(gs.round_id, "round");
        assert!(gs.round_closed());
    }
}
