//! rgs-core: Shared leaf types for the round-resolution engine
//!
//! Fixed-point decimal arithmetic for all money/multiplier math, and
//! uniform/weighted index selection over a caller-supplied random source.
//! Everything here is dependency-light and usable from any crate in the
//! workspace.

mod fixed;
mod rng;

pub use fixed::*;
pub use rng::*;
