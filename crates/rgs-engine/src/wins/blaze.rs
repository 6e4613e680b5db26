//! Anywhere-on-line ("blaze") wins
//!
//! Like line wins, but a line may carry several non-overlapping matches:
//! after a match the scan resumes past it with the matched symbol's pay
//! entries excluded for the rest of that line. A vertical pass transposes
//! the grid, re-runs the horizontal algorithm over each reel column, and
//! re-maps positions back to the original coordinate space under a
//! `V`-prefixed win index.

use std::collections::HashSet;

use rand::Rng;

use crate::definition::{EngineDefinition, SymbolId};
use crate::gamestate::Prize;
use crate::wins::lines::{WildMultiplierCache, compound_wilds, walk_run};

/// Evaluate blaze-line wins: horizontal pass over the configured win lines,
/// then the vertical transposed pass.
pub fn blaze_wins<R: Rng + ?Sized>(
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
        scan_line(rng, def, &cells, Some(line_index), "", cache, &mut prizes);
    }

    // Vertical pass: each reel column read top to bottom is a transposed
    // line; positions already live in the original coordinate space.
    for (reel, column) in grid.iter().enumerate() {
        let cells: Vec<(SymbolId, usize)> = column
            .iter()
            .enumerate()
            .map(|(row, &symbol)| (symbol, def.position(reel, row)))
            .collect();
        scan_line(rng, def, &cells, Some(reel), "V", cache, &mut prizes);
    }

    prizes
}

/// Repeatedly scan one line for non-overlapping matches. Symbols that
/// already matched on this line are excluded from the remaining pay table.
fn scan_line<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    cells: &[(SymbolId, usize)],
    win_line: Option<usize>,
    index_prefix: &str,
    cache: &mut WildMultiplierCache,
    prizes: &mut Vec<Prize>,
) {
    let mut matched: HashSet<SymbolId> = HashSet::new();
    let mut start = 0;

    while start < cells.len() {
        let run = walk_run(def, cells, start);
        let payout = if matched.contains(&run.symbol) {
            None
        } else {
            def.payout_for(run.symbol, run.count)
        };
        match payout {
            Some(payout) => {
                let multiplier = compound_wilds(rng, def, cache, &run.wild_symbols);
                prizes.push(Prize {
                    payout: payout.clone(),
                    index: format!("{index_prefix}{}:{}", run.symbol, run.count),
                    multiplier,
                    symbol_positions: run.positions,
                    win_line,
                });
                matched.insert(run.symbol);
                start += run.count;
            }
            None => start += 1,
        }
    }
}
