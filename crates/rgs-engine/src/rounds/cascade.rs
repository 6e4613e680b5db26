//! Cascade round generators
//!
//! A fresh call behaves like a spin. A continuation removes the cells that
//! contributed to the previous gamestate's prizes, compacts the survivors
//! downward, and refills the vacated cells by reading further along each
//! reel strip from the previous stop, wrapping as needed. A win on the new
//! grid re-queues another `"cascade"` action until a step produces nothing.
//!
//! The multiply variant advances a configured multiplier ladder while the
//! action sequence stays on the ladder's advance list, holds it on the hold
//! list, and resets it otherwise.

use std::collections::HashSet;

use log::debug;

use rgs_core::{Fixed, select_weighted};

use crate::definition::{CascadeSpec, EngineDefinition, SymbolId};
use crate::error::EngineError;
use crate::gamestate::Gamestate;
use crate::play::PlayContext;
use crate::reels::{spin, spin_forced, window};
use crate::wins::{WildMultiplierCache, compute_wins, special_wins};

use super::base::apply_sticky_wilds;
use super::{RoundDraft, RoundInput, active_reels};

/// The continuation action a winning cascade step queues.
pub const CASCADE_ACTION: &str = "cascade";

pub fn cascade_round(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
    multiply: bool,
) -> Result<RoundDraft, EngineError> {
    if input.action == CASCADE_ACTION {
        cascade_continuation(input, ctx, multiply)
    } else {
        cascade_fresh(input, ctx, multiply)
    }
}

fn cascade_fresh(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
    multiply: bool,
) -> Result<RoundDraft, EngineError> {
    let def = input.def;
    let rng = &mut *ctx.rng;

    let (stop_list, mut grid) = match &ctx.forced_stops {
        Some(stops) => {
            let grid = spin_forced(&def.reels, &def.view_size, stops)?;
            (stops.clone(), grid)
        }
        None => spin(rng, &def.reels, &def.view_size),
    };

    if let Some(prev) = input.params.previous() {
        apply_sticky_wilds(def, prev, input.action, &mut grid);
    }

    let mut cache = WildMultiplierCache::new();
    let mut prizes = compute_wins(rng, def, &grid, &input.params.selected_win_lines, &mut cache);

    let mut next_actions = Vec::new();
    if !prizes.is_empty() {
        next_actions.push(CASCADE_ACTION.to_string());
    }
    if let Some((prize, actions)) = special_wins(def, &grid) {
        prizes.push(prize);
        next_actions.extend(actions);
    }

    let multiplier = if multiply {
        ladder_multiplier(cascade_spec(def)?, input.action, input.params.previous())
    } else {
        select_weighted(rng, &def.multipliers.multipliers, &def.multipliers.weights)
    };

    let mut draft = RoundDraft {
        symbol_grid: grid,
        stop_list,
        prizes,
        multiplier,
        next_actions,
        ..Default::default()
    };
    draft.sum_prizes();
    Ok(draft)
}

fn cascade_continuation(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
    multiply: bool,
) -> Result<RoundDraft, EngineError> {
    let def = input.def;
    let prev = input
        .params
        .previous()
        .ok_or_else(|| EngineError::InvalidContinuation(CASCADE_ACTION.into()))?;
    let reels = active_reels(input.config, def, Some(prev));

    let removed = removed_rows(def, prev);
    let mut grid = Vec::with_capacity(reels.len());
    let mut stop_list = Vec::with_capacity(reels.len());
    for (reel, strip) in reels.iter().enumerate() {
        let view = def.view_size[reel];
        let (column, new_stop, refilled) = reflow_column(
            strip,
            &prev.symbol_grid[reel],
            &removed[reel],
            prev.stop_list.get(reel).copied().unwrap_or(0),
            view,
        );
        debug!("cascade reel {reel}: refilled {refilled}, stop {new_stop}");
        grid.push(column);
        stop_list.push(new_stop);
    }

    let rng = &mut *ctx.rng;
    let mut cache = WildMultiplierCache::new();
    let prizes = compute_wins(rng, def, &grid, &input.params.selected_win_lines, &mut cache);

    let next_actions = if prizes.is_empty() {
        Vec::new()
    } else {
        vec![CASCADE_ACTION.to_string()]
    };

    let multiplier = if multiply {
        ladder_multiplier(cascade_spec(def)?, input.action, Some(prev))
    } else {
        prev.multiplier
    };

    let mut draft = RoundDraft {
        symbol_grid: grid,
        stop_list,
        prizes,
        multiplier,
        next_actions,
        ..Default::default()
    };
    draft.sum_prizes();
    Ok(draft)
}

/// Rows each reel loses: the cells that contributed to the previous prizes.
fn removed_rows(def: &EngineDefinition, prev: &Gamestate) -> Vec<HashSet<usize>> {
    let mut removed = vec![HashSet::new(); def.view_size.len()];
    for prize in &prev.prizes {
        for &position in &prize.symbol_positions {
            let (reel, row) = def.reel_row(position);
            if reel < removed.len() {
                removed[reel].insert(row);
            }
        }
    }
    removed
}

/// Reflow one column: drop the removed rows, compact the survivors
/// downward, refill from the strip past the previous window. Removed plus
/// kept always equals the view size.
pub(crate) fn reflow_column(
    strip: &[SymbolId],
    prev_column: &[SymbolId],
    removed: &HashSet<usize>,
    prev_stop: usize,
    view: usize,
) -> (Vec<SymbolId>, usize, usize) {
    let kept: Vec<SymbolId> = prev_column
        .iter()
        .enumerate()
        .filter(|(row, _)| !removed.contains(row))
        .map(|(_, &symbol)| symbol)
        .collect();
    let refill_count = view - kept.len();

    let mut column = window(strip, (prev_stop + view) % strip.len(), refill_count);
    column.extend(kept);
    let new_stop = (prev_stop + refill_count) % strip.len();
    (column, new_stop, refill_count)
}

fn cascade_spec(def: &EngineDefinition) -> Result<&CascadeSpec, EngineError> {
    def.cascade
        .as_ref()
        .ok_or_else(|| EngineError::malformed(&def.name, "missing cascade multiplier ladder"))
}

/// The ladder position for this step: advance on the advance list, hold on
/// the hold list, reset otherwise. Advancing clamps to the ladder's end.
fn ladder_multiplier(spec: &CascadeSpec, action: &str, prev: Option<&Gamestate>) -> Fixed {
    let ladder = &spec.multiplier_ladder;
    let carried = prev.filter(|p| !p.round_closed()).map(|p| p.multiplier);
    match carried {
        None => ladder[0],
        Some(current) => {
            if spec.advance_actions.iter().any(|a| a == action) {
                match ladder.iter().position(|v| *v == current) {
                    Some(i) => ladder[(i + 1).min(ladder.len() - 1)],
                    None => ladder[0],
                }
            } else if spec.hold_actions.iter().any(|a| a == action) {
                current
            } else {
                ladder[0]
            }
        }
    }
}
