//! Bar-substitution line wins
//!
//! Symbols inside a bar group are remapped to the group's synthetic payout
//! symbol, line wins are computed with and without the remap, and per line
//! the higher-paying of the two results is kept. The wild multiplier cache
//! is shared across both passes so a wild draws the same multiplier in each.

use std::collections::HashMap;

use rand::Rng;

use crate::definition::{EngineDefinition, SymbolId};
use crate::gamestate::Prize;
use crate::wins::lines::{WildMultiplierCache, line_wins_with_cache};

/// Evaluate line wins under bar substitution.
pub fn bar_line_wins<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    grid: &[Vec<SymbolId>],
    selected_lines: &[usize],
    cache: &mut WildMultiplierCache,
) -> Vec<Prize> {
    let plain = line_wins_with_cache(rng, def, grid, selected_lines, cache);
    if def.bars.is_empty() {
        return plain;
    }

    let substituted_grid = apply_bars(def, grid);
    let substituted = line_wins_with_cache(rng, def, &substituted_grid, selected_lines, cache);

    // Per line keep the higher-paying result; the plain win stands on ties.
    let mut best: HashMap<usize, Prize> = HashMap::new();
    for prize in plain.into_iter().chain(substituted) {
        let Some(line) = prize.win_line else { continue };
        let better = match best.get(&line) {
            Some(existing) => prize.relative_payout() > existing.relative_payout(),
            None => true,
        };
        if better {
            best.insert(line, prize);
        }
    }

    let mut prizes: Vec<Prize> = best.into_values().collect();
    prizes.sort_by_key(|p| p.win_line);
    prizes
}

/// The grid with every bar-group member remapped to its payout symbol.
fn apply_bars(def: &EngineDefinition, grid: &[Vec<SymbolId>]) -> Vec<Vec<SymbolId>> {
    grid.iter()
        .map(|column| {
            column
                .iter()
                .map(|&symbol| {
                    def.bars
                        .iter()
                        .find(|group| group.symbols.contains(&symbol))
                        .map(|group| group.payout_symbol)
                        .unwrap_or(symbol)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{BarGroup, Payout, WinType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rgs_core::Fixed;

    fn bar_def() -> EngineDefinition {
        EngineDefinition {
            name: "bars".into(),
            reels: vec![vec![0, 1, 2, 3, 4, 5]; 5],
            view_size: vec![3; 5],
            payouts: vec![
                Payout { symbol: 1, count: 3, multiplier: Fixed::from_int(10) },
                // Synthetic "any bar" symbol.
                Payout { symbol: 7, count: 3, multiplier: Fixed::from_int(2) },
            ],
            win_lines: vec![vec![0; 5]],
            bars: vec![BarGroup { symbols: vec![2, 3], payout_symbol: 7 }],
            win_type: Some(WinType::BarLines),
            ..Default::default()
        }
    }

    fn grid_rows(rows: [[SymbolId; 5]; 3]) -> Vec<Vec<SymbolId>> {
        (0..5)
            .map(|reel| (0..3).map(|row| rows[row][reel]).collect())
            .collect()
    }

    #[test]
    fn test_mixed_bars_pay_as_group() {
        let def = bar_def();
        // 2,3,2 pays nothing plain but 3-of-bar after the remap.
        let grid = grid_rows([
            [2, 3, 2, 0, 0],
            [4, 4, 4, 4, 4],
            [5, 5, 5, 5, 5],
        ]);
        let mut rng = StdRng::seed_from_u64(1);
        let mut cache = WildMultiplierCache::new();
        let prizes = bar_line_wins(&mut rng, &def, &grid, &[], &mut cache);
        assert_eq!(prizes.len(), 1);
        assert_eq!(prizes[0].index, "7:3");
    }

    #[test]
    fn test_higher_paying_pass_wins() {
        let def = bar_def();
        // Three 1s pay 10 plain; the remap leaves them untouched, and the
        // plain result must survive.
        let grid = grid_rows([
            [1, 1, 1, 0, 0],
            [4, 4, 4, 4, 4],
            [5, 5, 5, 5, 5],
        ]);
        let mut rng = StdRng::seed_from_u64(2);
        let mut cache = WildMultiplierCache::new();
        let prizes = bar_line_wins(&mut rng, &def, &grid, &[], &mut cache);
        assert_eq!(prizes.len(), 1);
        assert_eq!(prizes[0].index, "1:3");
        assert_eq!(prizes[0].payout.multiplier, Fixed::from_int(10));
    }

    #[test]
    fn test_no_bars_is_plain_line_evaluation() {
        let mut def = bar_def();
        def.bars.clear();
        let grid = grid_rows([
            [2, 3, 2, 0, 0],
            [4, 4, 4, 4, 4],
            [5, 5, 5, 5, 5],
        ]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut cache = WildMultiplierCache::new();
        assert!(bar_line_wins(&mut rng, &def, &grid, &[], &mut cache).is_empty());
    }
}
