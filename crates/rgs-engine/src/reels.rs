//! Spin and stop selection
//!
//! A stop is drawn uniformly across each reel strip's full length; the
//! displayed window reads `view_size` symbols from the stop onward, wrapping
//! past the physical end of the strip.

use rand::Rng;

use rgs_core::uniform_index;

use crate::definition::SymbolId;
use crate::error::EngineError;

/// The wrapped view of one reel from a stop position.
pub fn window(reel: &[SymbolId], stop: usize, view: usize) -> Vec<SymbolId> {
    (0..view).map(|i| reel[(stop + i) % reel.len()]).collect()
}

/// Draw a stop per reel and return (stops, column-major grid).
pub fn spin<R: Rng + ?Sized>(
    rng: &mut R,
    reels: &[Vec<SymbolId>],
    view_size: &[usize],
) -> (Vec<usize>, Vec<Vec<SymbolId>>) {
    let mut stops = Vec::with_capacity(reels.len());
    let mut grid = Vec::with_capacity(reels.len());
    for (reel, view) in reels.iter().zip(view_size) {
        let stop = uniform_index(rng, reel.len());
        grid.push(window(reel, stop, *view));
        stops.push(stop);
    }
    (stops, grid)
}

/// Build a grid from an explicit stop list, bypassing the RNG entirely.
/// The list must cover every reel.
pub fn spin_forced(
    reels: &[Vec<SymbolId>],
    view_size: &[usize],
    stops: &[usize],
) -> Result<Vec<Vec<SymbolId>>, EngineError> {
    if stops.len() != reels.len() {
        return Err(EngineError::ConfigParse(format!(
            "forced stop list covers {} reels, expected {}",
            stops.len(),
            reels.len()
        )));
    }
    Ok(reels
        .iter()
        .zip(view_size)
        .zip(stops)
        .map(|((reel, view), stop)| window(reel, stop % reel.len(), *view))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_window_wraps() {
        let reel = vec![10, 11, 12, 13];
        assert_eq!(window(&reel, 0, 3), vec![10, 11, 12]);
        assert_eq!(window(&reel, 3, 3), vec![13, 10, 11]);
    }

    #[test]
    fn test_spin_dimensions() {
        let mut rng = StdRng::seed_from_u64(5);
        let reels = vec![vec![0, 1, 2, 3, 4]; 5];
        let view = vec![3; 5];
        let (stops, grid) = spin(&mut rng, &reels, &view);
        assert_eq!(stops.len(), 5);
        assert_eq!(grid.len(), 5);
        for (stop, column) in stops.iter().zip(&grid) {
            assert!(*stop < 5);
            assert_eq!(column.len(), 3);
        }
    }

    #[test]
    fn test_spin_forced_matches_window() {
        let reels = vec![vec![0, 1, 2, 3], vec![4, 5, 6, 7]];
        let grid = spin_forced(&reels, &[3, 3], &[2, 3]).unwrap();
        assert_eq!(grid[0], vec![2, 3, 0]);
        assert_eq!(grid[1], vec![7, 4, 5]);
    }

    #[test]
    fn test_spin_forced_length_check() {
        let reels = vec![vec![0, 1, 2]; 3];
        assert!(spin_forced(&reels, &[3, 3, 3], &[0, 1]).is_err());
    }
}
