//! Line wins
//!
//! Walks each configured win line left to right counting a run of identical
//! symbols. A wild is a placeholder that assumes the identity of the first
//! non-wild symbol in the run; the identity changes at most once, from wild
//! to real. One prize per line at most: the earliest-declared pay-table
//! entry matching the final (symbol, run length).

use std::collections::HashMap;

use rand::Rng;

use rgs_core::{Fixed, select_weighted};

use crate::definition::{EngineDefinition, SymbolId, WildCompounding};
use crate::gamestate::Prize;

/// First-drawn wild multipliers, keyed by wild symbol. The first multiplier
/// drawn for a wild within one evaluation is remembered and reused for that
/// symbol for the rest of the evaluation.
pub type WildMultiplierCache = HashMap<SymbolId, Fixed>;

/// A maximal run along a sequence of line cells.
#[derive(Debug, Clone)]
pub(crate) struct LineRun {
    pub symbol: SymbolId,
    pub count: usize,
    pub positions: Vec<usize>,
    /// Distinct wild symbols contributing to the run, in appearance order.
    pub wild_symbols: Vec<SymbolId>,
}

/// Walk the run starting at `start` over `(symbol, flat position)` cells.
pub(crate) fn walk_run(
    def: &EngineDefinition,
    cells: &[(SymbolId, usize)],
    start: usize,
) -> LineRun {
    let mut identity = cells[start].0;
    let mut count = 0;
    let mut positions = Vec::new();
    let mut wild_symbols = Vec::new();

    for &(symbol, position) in &cells[start..] {
        if def.is_wild(identity) && !def.is_wild(symbol) {
            identity = symbol;
        }
        if symbol == identity || def.is_wild(symbol) {
            count += 1;
            positions.push(position);
            if def.is_wild(symbol) && !wild_symbols.contains(&symbol) {
                wild_symbols.push(symbol);
            }
        } else {
            break;
        }
    }

    LineRun {
        symbol: identity,
        count,
        positions,
        wild_symbols,
    }
}

/// The cached-or-drawn multiplier for one wild symbol.
pub(crate) fn wild_multiplier<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    cache: &mut WildMultiplierCache,
    symbol: SymbolId,
) -> Fixed {
    if let Some(m) = cache.get(&symbol) {
        return *m;
    }
    let drawn = def
        .wild(symbol)
        .map(|w| select_weighted(rng, &w.multipliers.multipliers, &w.multipliers.weights))
        .unwrap_or(Fixed::ONE);
    cache.insert(symbol, drawn);
    drawn
}

/// Combine the multipliers of the run's wild symbols under the definition's
/// compounding policy.
pub(crate) fn compound_wilds<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    cache: &mut WildMultiplierCache,
    wild_symbols: &[SymbolId],
) -> Fixed {
    let mut combined = Fixed::ONE;
    for &symbol in wild_symbols {
        let m = wild_multiplier(rng, def, cache, symbol);
        combined = match def.compounding() {
            WildCompounding::Max => combined.max(m),
            WildCompounding::Multiply => combined.mul(m),
        };
    }
    combined
}

/// Evaluate the selected win lines; an empty selection plays every line.
pub fn line_wins<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    grid: &[Vec<SymbolId>],
    selected_lines: &[usize],
) -> Vec<Prize> {
    let mut cache = WildMultiplierCache::new();
    line_wins_with_cache(rng, def, grid, selected_lines, &mut cache)
}

/// As [`line_wins`], sharing a wild multiplier cache with other passes of
/// the same evaluation.
pub fn line_wins_with_cache<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    grid: &[Vec<SymbolId>],
    selected_lines: &[usize],
    cache: &mut WildMultiplierCache,
) -> Vec<Prize> {
    let mut prizes = Vec::new();
    for (line_index, line) in def.win_lines.iter().enumerate() {
        if !selected_lines.is_empty() && !selected_lines.contains(&line_index) {
            continue;
        }
        let cells: Vec<(SymbolId, usize)> = line
            .iter()
            .enumerate()
            .map(|(reel, &row)| (grid[reel][row], def.position(reel, row)))
            .collect();
        if let Some(prize) = evaluate_line(rng, def, &cells, line_index, cache) {
            prizes.push(prize);
        }
    }
    prizes
}

fn evaluate_line<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    cells: &[(SymbolId, usize)],
    line_index: usize,
    cache: &mut WildMultiplierCache,
) -> Option<Prize> {
    if cells.is_empty() {
        return None;
    }
    let run = walk_run(def, cells, 0);
    let payout = def.payout_for(run.symbol, run.count)?;
    let multiplier = compound_wilds(rng, def, cache, &run.wild_symbols);
    Some(Prize {
        payout: payout.clone(),
        index: format!("{}:{}", run.symbol, run.count),
        multiplier,
        symbol_positions: run.positions,
        win_line: Some(line_index),
    })
}
