//! Ways wins and prime-and-flop wins
//!
//! A ways win counts every combination of matching-or-wild positions across
//! consecutive reels from the left. The prize multiplier carries the number
//! of ways; each symbol wins at most once per evaluation.

use std::collections::HashSet;

use rgs_core::Fixed;

use crate::definition::{EngineDefinition, Payout, SymbolId};
use crate::gamestate::Prize;

/// Evaluate ways wins over the whole grid.
pub fn ways_wins(def: &EngineDefinition, grid: &[Vec<SymbolId>]) -> Vec<Prize> {
    ways_family(def, grid, 1)
}

/// Prime-and-flop wins: every "prime" reel (the leading `prime_reels`
/// columns) must contain the symbol or a wild; the win then extends through
/// consecutive "flop" reels, ways-counted across all participating reels.
pub fn prime_and_flop_wins(def: &EngineDefinition, grid: &[Vec<SymbolId>]) -> Vec<Prize> {
    ways_family(def, grid, def.prime_reels())
}

fn ways_family(def: &EngineDefinition, grid: &[Vec<SymbolId>], min_run: usize) -> Vec<Prize> {
    let mut won: HashSet<SymbolId> = HashSet::new();
    let mut prizes = Vec::new();

    for payout in &def.payouts {
        if won.contains(&payout.symbol) || payout.count < min_run {
            continue;
        }
        if let Some(prize) = evaluate_ways_entry(def, grid, payout) {
            won.insert(payout.symbol);
            prizes.push(prize);
        }
    }
    prizes
}

fn evaluate_ways_entry(
    def: &EngineDefinition,
    grid: &[Vec<SymbolId>],
    payout: &Payout,
) -> Option<Prize> {
    if payout.count > grid.len() {
        return None;
    }

    let symbol_is_wild = def.is_wild(payout.symbol);
    let mut total_ways: u64 = 1;
    let mut wild_only_ways: u64 = 1;
    let mut positions = Vec::new();
    let mut run_len = 0;

    for (reel, column) in grid.iter().enumerate().take(payout.count) {
        let mut matches: u64 = 0;
        let mut wild_matches: u64 = 0;
        for (row, &symbol) in column.iter().enumerate() {
            let is_wild = def.is_wild(symbol);
            if symbol == payout.symbol || is_wild {
                matches += 1;
                if is_wild && symbol != payout.symbol {
                    wild_matches += 1;
                }
                positions.push(def.position(reel, row));
            }
        }
        if matches == 0 {
            return None;
        }
        run_len += 1;
        total_ways *= matches;
        wild_only_ways *= wild_matches;
    }

    if run_len != payout.count {
        return None;
    }

    // A variation made of wilds alone pays only when the pay table defines
    // a payout at the wild symbol itself.
    let ways = if symbol_is_wild {
        total_ways
    } else {
        total_ways - wild_only_ways
    };
    if ways == 0 {
        return None;
    }

    Some(Prize {
        payout: payout.clone(),
        index: format!("{}:{}", payout.symbol, payout.count),
        multiplier: Fixed::from_int(ways as i64),
        symbol_positions: positions,
        win_line: None,
    })
}
