//! Win calculators
//!
//! Pure functions from a symbol grid + definition to a set of [`Prize`]s.
//! For the same grid and definition the prizes come back in a stable order
//! (win-line index for the line families, pay-table order for ways);
//! client rendering and certification replays rely on that.

mod bar_lines;
mod blaze;
mod lines;
mod special;
mod ways;

pub use bar_lines::*;
pub use blaze::*;
pub use lines::*;
pub use special::*;
pub use ways::*;

use rand::Rng;

use crate::definition::{EngineDefinition, SymbolId, WinType};
use crate::gamestate::Prize;

/// Evaluate a grid with the definition's win family, sharing one wild
/// multiplier cache for the whole evaluation.
pub fn compute_wins<R: Rng + ?Sized>(
    rng: &mut R,
    def: &EngineDefinition,
    grid: &[Vec<SymbolId>],
    selected_lines: &[usize],
    cache: &mut WildMultiplierCache,
) -> Vec<Prize> {
    match def.win_type() {
        WinType::Lines => line_wins_with_cache(rng, def, grid, selected_lines, cache),
        WinType::Ways => ways_wins(def, grid),
        WinType::BarLines => bar_line_wins(rng, def, grid, selected_lines, cache),
        WinType::BlazeLines => blaze_wins(rng, def, grid, selected_lines, cache),
        WinType::PrimeAndFlop => prime_and_flop_wins(def, grid),
    }
}
