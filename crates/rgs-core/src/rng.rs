//! Uniform and weighted index selection
//!
//! Every draw goes through a caller-supplied [`rand::Rng`] source; the
//! engine never owns a process-wide generator. Certification replays depend
//! on the exact number of draws each operation consumes, so the trivial-case
//! rules here (no draw for empty or single-option selections) are part of
//! the contract, not an optimization.

use rand::Rng;

use crate::fixed::Fixed;

/// A uniform index in `[0, n)`. Returns 0 without drawing when `n <= 1`.
pub fn uniform_index<R: Rng + ?Sized>(rng: &mut R, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    rng.random_range(0..n)
}

/// An index chosen with probability proportional to `weights[i]`.
///
/// Draws a value in `[1, sum(weights)]` and walks the running prefix sum;
/// the first index whose cumulative weight reaches the draw wins, so ties
/// resolve to the earliest index. Zero-weight entries are never selected.
/// Returns 0 without drawing when the weights are empty or sum to zero.
pub fn weighted_index<R: Rng + ?Sized>(rng: &mut R, weights: &[u32]) -> usize {
    let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
    if total == 0 {
        if !weights.is_empty() {
            log::warn!("weighted selection over all-zero weights, taking index 0");
        }
        return 0;
    }
    let draw = rng.random_range(1..=total);
    let mut cumulative = 0u64;
    for (i, w) in weights.iter().enumerate() {
        cumulative += u64::from(*w);
        if cumulative >= draw {
            return i;
        }
    }
    weights.len() - 1
}

/// Select one multiplier from a weighted distribution.
///
/// No options yields the neutral multiplier 1; a single option is returned
/// unconditionally and consumes no draw.
pub fn select_weighted<R: Rng + ?Sized>(rng: &mut R, options: &[Fixed], weights: &[u32]) -> Fixed {
    match options.len() {
        0 => Fixed::ONE,
        1 => options[0],
        _ => options[weighted_index(rng, weights)],
    }
}
