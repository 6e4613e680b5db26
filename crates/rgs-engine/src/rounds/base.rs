//! Base round generator
//!
//! Spin, carry over sticky wilds, compute wins and the special payout, draw
//! the round multiplier, assemble. The max-wild and dynamic-wild-ways
//! variants share this flow and differ only in how wilds enter the grid.

use log::debug;
use rand::Rng;

use rgs_core::{select_weighted, uniform_index, weighted_index};

use crate::definition::{EngineDefinition, SymbolId};
use crate::error::EngineError;
use crate::gamestate::Gamestate;
use crate::play::PlayContext;
use crate::reels::{spin, spin_forced};
use crate::wins::{WildMultiplierCache, compute_wins, special_wins};

use super::{RoundDraft, RoundInput};

/// How wilds enter a base-family round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseMode {
    Standard,
    /// Every wild multiplier takes the maximum option of its distribution.
    MaxWild,
    /// A weighted count of wilds is injected at uniform positions before
    /// win calculation.
    DynamicWilds,
}

pub fn base_round(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
    mode: BaseMode,
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

    if mode == BaseMode::DynamicWilds {
        inject_wilds(rng, def, &mut grid);
    }

    let mut cache = WildMultiplierCache::new();
    if mode == BaseMode::MaxWild {
        seed_max_wilds(def, &mut cache);
    }

    let mut prizes = compute_wins(
        rng,
        def,
        &grid,
        &input.params.selected_win_lines,
        &mut cache,
    );

    let mut next_actions = Vec::new();
    if let Some((prize, actions)) = special_wins(def, &grid) {
        debug!("special payout fired: {}", prize.index);
        prizes.push(prize);
        next_actions = actions;
    }

    let multiplier = select_weighted(
        rng,
        &def.multipliers.multipliers,
        &def.multipliers.weights,
    );

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

/// Carry sticky wilds from the previous grid: same symbol, same position,
/// only while the previous action chains into this one.
pub(crate) fn apply_sticky_wilds(
    def: &EngineDefinition,
    prev: &Gamestate,
    action: &str,
    grid: &mut [Vec<SymbolId>],
) {
    if prev.round_closed() || prev.action != action {
        return;
    }
    for wild in def.wilds.iter().filter(|w| w.sticky) {
        for (reel, column) in prev.symbol_grid.iter().enumerate() {
            for (row, &symbol) in column.iter().enumerate() {
                if symbol == wild.symbol && reel < grid.len() && row < grid[reel].len() {
                    grid[reel][row] = symbol;
                }
            }
        }
    }
}

/// Seed the multiplier cache with every wild's maximum option so no draw is
/// consumed and every wild pays its ceiling.
pub(crate) fn seed_max_wilds(def: &EngineDefinition, cache: &mut WildMultiplierCache) {
    for wild in &def.wilds {
        let max = wild
            .multipliers
            .multipliers
            .iter()
            .copied()
            .max()
            .unwrap_or(rgs_core::Fixed::ONE);
        cache.insert(wild.symbol, max);
    }
}

/// Place a weighted count of wilds at distinct uniform grid positions.
fn inject_wilds<R: Rng + ?Sized>(rng: &mut R, def: &EngineDefinition, grid: &mut [Vec<SymbolId>]) {
    let Some(injection) = &def.wild_injection else {
        return;
    };
    let count = injection.counts[weighted_index(rng, &injection.weights)] as usize;
    let mut pool: Vec<usize> = (0..def.total_view()).collect();
    for _ in 0..count.min(pool.len()) {
        let pick = uniform_index(rng, pool.len());
        let position = pool.swap_remove(pick);
        let (reel, row) = def.reel_row(position);
        grid[reel][row] = injection.symbol;
    }
}
