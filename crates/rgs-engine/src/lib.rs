//! # rgs-engine — Round-resolution engine for slot game rounds
//!
//! Given a player's previous round state and a requested action (spin,
//! freespin, cascade, pick, respin, gamble), deterministically produces the
//! next round state — symbol grid, wins, payout, and the queue of actions
//! still owed to the player — from a declarative per-game configuration.
//!
//! ## Architecture
//!
//! ```text
//! EngineConfig (definitions + generator bindings, resolved at load)
//!     │
//!     v
//! play(config, GameParams, PlayContext)
//!     │
//!     ├── reels::spin        (RNG stop selection, wrap-around view)
//!     ├── wins::*            (line / ways / bar / blaze / special prizes)
//!     ├── rounds::*          (base, cascade, respin, shuffle, pick, …)
//!     ├── features::*        (pluggable feature-trigger hooks)
//!     └── actions::finalize  (queue merge, transactions, round linkage)
//!           │
//!           v
//!       Gamestate
//! ```
//!
//! The engine performs no I/O and holds no global state: every call receives
//! its random source through [`play::PlayContext`] and returns a fresh
//! [`gamestate::Gamestate`] the caller owns outright.

pub mod actions;
pub mod config;
pub mod definition;
pub mod error;
pub mod features;
pub mod gamestate;
pub mod play;
pub mod reels;
pub mod rounds;
pub mod wins;

pub use actions::*;
pub use config::*;
pub use definition::*;
pub use error::*;
pub use gamestate::*;
pub use play::*;
