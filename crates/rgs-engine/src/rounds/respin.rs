//! Respin and shuffle generators
//!
//! Both re-draw a subset of reels while holding the rest of the previous
//! grid fixed and recompute wins on the hybrid grid. Respin re-draws a
//! single player-chosen reel and is priced at its expected value; shuffle
//! re-draws a configured subset (prime, flop, or all) and charges no wager.

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rgs_core::{Fixed, select_weighted, uniform_index};

use crate::definition::EngineDefinition;
use crate::error::EngineError;
use crate::gamestate::Gamestate;
use crate::play::PlayContext;
use crate::reels::window;
use crate::wins::{WildMultiplierCache, compute_wins};

use super::base::seed_max_wilds;
use super::{RoundDraft, RoundInput};

pub fn respin_round(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
) -> Result<RoundDraft, EngineError> {
    let def = input.def;
    let prev = input
        .params
        .previous()
        .ok_or_else(|| EngineError::InvalidRespin("no previous round to respin".into()))?;
    let reel = input
        .params
        .respin_reel
        .filter(|r| *r < def.reels.len())
        .ok_or_else(|| EngineError::InvalidRespin("reel index missing or out of range".into()))?;
    if !def.respin_allowed {
        return Err(EngineError::InvalidRespin(format!(
            "definition {} does not allow respins",
            def.name
        )));
    }

    // Price first: it reads only the previous grid and consumes no draw.
    let price = respin_price(def, prev, reel)?;
    debug!("respin reel {reel} priced at {price}");

    let rng = &mut *ctx.rng;
    let strip = &def.reels[reel];
    let stop = match &ctx.forced_stops {
        Some(stops) => stops.get(reel).copied().unwrap_or(0) % strip.len(),
        None => uniform_index(rng, strip.len()),
    };

    let mut grid = prev.symbol_grid.clone();
    let mut stop_list = prev.stop_list.clone();
    grid[reel] = window(strip, stop, def.view_size[reel]);
    stop_list[reel] = stop;

    let mut cache = WildMultiplierCache::new();
    let prizes = compute_wins(rng, def, &grid, &prev.selected_win_lines, &mut cache);
    let multiplier = select_weighted(rng, &def.multipliers.multipliers, &def.multipliers.weights);

    let mut draft = RoundDraft {
        symbol_grid: grid,
        stop_list,
        prizes,
        multiplier,
        wager_override: Some(price),
        ..Default::default()
    };
    draft.sum_prizes();
    Ok(draft)
}

/// Expected-value price of re-spinning one reel: the mean over all stops of
/// that reel of the hybrid-grid payout, with every wild at its maximum
/// multiplier, rounded up. Deterministic — no draw is consumed.
pub fn respin_price(
    def: &EngineDefinition,
    prev: &Gamestate,
    reel: usize,
) -> Result<Fixed, EngineError> {
    let strip = &def.reels[reel];
    let mut cache = WildMultiplierCache::new();
    seed_max_wilds(def, &mut cache);
    // The seeded cache covers every wild symbol, so evaluation never draws.
    let mut silent_rng = StdRng::seed_from_u64(0);

    let mut total = Fixed::ZERO;
    for stop in 0..strip.len() {
        let mut grid = prev.symbol_grid.clone();
        grid[reel] = window(strip, stop, def.view_size[reel]);
        let prizes = compute_wins(&mut silent_rng, def, &grid, &prev.selected_win_lines, &mut cache);
        total += prizes.iter().map(|p| p.relative_payout()).sum::<Fixed>();
    }

    let mean = total
        .div_int_ceil(strip.len() as i64)
        .ok_or_else(|| EngineError::malformed(&def.name, "empty reel strip"))?;
    Ok(mean.mul(prev.bet_per_line))
}

/// Which reels a shuffle re-draws.
fn shuffle_subset(def: &EngineDefinition, selection: &str) -> Vec<usize> {
    let prime = def.prime_reels();
    match selection {
        "prime" => (0..prime).collect(),
        "flop" => (prime..def.reels.len()).collect(),
        _ => (0..def.reels.len()).collect(),
    }
}

pub fn shuffle_round(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
) -> Result<RoundDraft, EngineError> {
    let def = input.def;
    let prev = input
        .params
        .previous()
        .ok_or_else(|| EngineError::InvalidContinuation("shuffle".into()))?;

    let rng = &mut *ctx.rng;
    let mut grid = prev.symbol_grid.clone();
    let mut stop_list = prev.stop_list.clone();
    for reel in shuffle_subset(def, &input.params.selection) {
        let strip = &def.reels[reel];
        let stop = uniform_index(rng, strip.len());
        grid[reel] = window(strip, stop, def.view_size[reel]);
        stop_list[reel] = stop;
    }

    let mut cache = WildMultiplierCache::new();
    let prizes = compute_wins(rng, def, &grid, &prev.selected_win_lines, &mut cache);
    let multiplier = select_weighted(rng, &def.multipliers.multipliers, &def.multipliers.weights);

    let mut draft = RoundDraft {
        symbol_grid: grid,
        stop_list,
        prizes,
        multiplier,
        // Shuffles are free.
        wager_override: Some(Fixed::ZERO),
        ..Default::default()
    };
    draft.sum_prizes();
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Payout;

    fn respin_def() -> EngineDefinition {
        EngineDefinition {
            name: "base".into(),
            reels: vec![vec![0, 1, 2, 3]; 5],
            view_size: vec![3; 5],
            payouts: vec![Payout { symbol: 1, count: 5, multiplier: Fixed::from_int(8) }],
            win_lines: vec![vec![0; 5]],
            respin_allowed: true,
            ..Default::default()
        }
    }

    fn prev_state() -> Gamestate {
        Gamestate {
            // Four 1s on the top row; reel 4 shows a 0 there.
            symbol_grid: vec![
                vec![1, 0, 0],
                vec![1, 0, 0],
                vec![1, 0, 0],
                vec![1, 0, 0],
                vec![0, 2, 3],
            ],
            stop_list: vec![0; 5],
            bet_per_line: Fixed::from_int(1),
            next_actions: vec!["finish".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_respin_price_is_mean_over_stops() {
        let def = respin_def();
        let prev = prev_state();
        // Strip [0,1,2,3]: exactly one of four stops puts a 1 on the top
        // row of reel 4 and completes 1:5 paying 8. Mean = 8/4 = 2.
        let price = respin_price(&def, &prev, 4).unwrap();
        assert_eq!(price, Fixed::from_int(2));
    }

    #[test]
    fn test_shuffle_subsets() {
        let mut def = respin_def();
        def.prime_reels = 3;
        assert_eq!(shuffle_subset(&def, "prime"), vec![0, 1, 2]);
        assert_eq!(shuffle_subset(&def, "flop"), vec![3, 4]);
        assert_eq!(shuffle_subset(&def, "all"), vec![0, 1, 2, 3, 4]);
    }
}
