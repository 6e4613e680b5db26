//! Special/bonus wins
//!
//! Independent of the line/ways families: counts total occurrences of a
//! designated symbol anywhere on the grid and fires the first configured
//! special payout whose required count matches exactly. The result is a
//! stake-multiplier prize plus the feature actions owed to the player.

use crate::definition::{EngineDefinition, Payout, SymbolId};
use crate::gamestate::Prize;

/// The prize and queued actions of the first matching special payout.
pub fn special_wins(
    def: &EngineDefinition,
    grid: &[Vec<SymbolId>],
) -> Option<(Prize, Vec<String>)> {
    for special in &def.special_payouts {
        let mut positions = Vec::new();
        for (reel, column) in grid.iter().enumerate() {
            for (row, &symbol) in column.iter().enumerate() {
                if symbol == special.symbol {
                    positions.push(def.position(reel, row));
                }
            }
        }
        if positions.len() != special.count {
            continue;
        }

        let prize = Prize {
            payout: Payout {
                symbol: special.symbol,
                count: special.count,
                multiplier: special.multiplier,
            },
            index: format!("{}:{}", special.action, special.action_count),
            multiplier: rgs_core::Fixed::ONE,
            symbol_positions: positions,
            win_line: None,
        };
        let actions = vec![special.action.clone(); special.action_count];
        return Some((prize, actions));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::SpecialPayout;
    use rgs_core::Fixed;

    fn special_def() -> EngineDefinition {
        EngineDefinition {
            name: "base".into(),
            reels: vec![vec![0, 1, 2, 8]; 5],
            view_size: vec![3; 5],
            special_payouts: vec![
                SpecialPayout {
                    symbol: 8,
                    count: 3,
                    action: "freespin".into(),
                    action_count: 10,
                    multiplier: Fixed::from_int(2),
                    selection: "freespin10".into(),
                },
                SpecialPayout {
                    symbol: 8,
                    count: 4,
                    action: "freespin".into(),
                    action_count: 20,
                    multiplier: Fixed::from_int(5),
                    selection: "freespin20".into(),
                },
            ],
            ..Default::default()
        }
    }

    fn grid_with_scatters(count: usize) -> Vec<Vec<SymbolId>> {
        let mut grid = vec![vec![0, 1, 2]; 5];
        for reel in 0..count {
            grid[reel][1] = 8;
        }
        grid
    }

    #[test]
    fn test_exact_count_fires() {
        let def = special_def();
        let (prize, actions) = special_wins(&def, &grid_with_scatters(3)).unwrap();
        assert_eq!(prize.index, "freespin:10");
        assert_eq!(prize.payout.multiplier, Fixed::from_int(2));
        assert_eq!(actions, vec!["freespin".to_string(); 10]);
    }

    #[test]
    fn test_count_must_match_exactly() {
        let def = special_def();
        let (prize, actions) = special_wins(&def, &grid_with_scatters(4)).unwrap();
        // Four scatters match the second entry, not the three-of entry.
        assert_eq!(prize.index, "freespin:20");
        assert_eq!(actions.len(), 20);
        assert!(special_wins(&def, &grid_with_scatters(2)).is_none());
        assert!(special_wins(&def, &grid_with_scatters(5)).is_none());
    }

    #[test]
    fn test_positions_reported() {
        let def = special_def();
        let (prize, _) = special_wins(&def, &grid_with_scatters(3)).unwrap();
        assert_eq!(prize.symbol_positions, vec![1, 4, 7]);
    }
}
