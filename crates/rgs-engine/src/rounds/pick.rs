//! Prize-selection generator
//!
//! Resolves a player-chosen special payout: the request's selection id is
//! matched against the definition's special-payout table, paying its stake
//! multiplier and queueing its feature actions. No reel is spun.

use rgs_core::Fixed;

use crate::definition::Payout;
use crate::error::EngineError;
use crate::gamestate::Prize;

use super::{RoundDraft, RoundInput};

pub fn prize_select_round(input: &RoundInput<'_>) -> Result<RoundDraft, EngineError> {
    let def = input.def;
    let selection = input.params.selection.as_str();
    let special = def
        .special_payouts
        .iter()
        .find(|s| !s.selection.is_empty() && s.selection == selection)
        .ok_or_else(|| EngineError::InvalidSelection(selection.to_string()))?;

    let prize = Prize {
        payout: Payout {
            symbol: special.symbol,
            count: special.count,
            multiplier: special.multiplier,
        },
        index: format!("{}:{}", special.action, special.action_count),
        multiplier: Fixed::ONE,
        symbol_positions: Vec::new(),
        win_line: None,
    };
    let next_actions = vec![special.action.clone(); special.action_count];

    // The previous grid stays on display; nothing spins.
    let (symbol_grid, stop_list) = match input.params.previous() {
        Some(prev) => (prev.symbol_grid.clone(), prev.stop_list.clone()),
        None => (Vec::new(), Vec::new()),
    };

    let mut draft = RoundDraft {
        symbol_grid,
        stop_list,
        prizes: vec![prize],
        multiplier: Fixed::ONE,
        next_actions,
        ..Default::default()
    };
    draft.sum_prizes();
    Ok(draft)
}
