//! Engine definition model
//!
//! One [`EngineDefinition`] per reel-set role (base game, a freespin
//! variant, a pick round, …). Definitions are immutable after the config
//! load resolves inheritance; nothing in the engine mutates them afterwards.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use rgs_core::Fixed;

use crate::error::EngineError;

/// Symbol identifier as it appears on a reel strip.
pub type SymbolId = u32;

/// Which win-calculation family a definition uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WinType {
    Lines,
    Ways,
    BarLines,
    BlazeLines,
    PrimeAndFlop,
}

/// How multipliers from distinct wild symbols in one run combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WildCompounding {
    /// Take the maximum multiplier seen.
    Max,
    /// Multiply the drawn multipliers together.
    Multiply,
}

/// A single pay-table entry: exact run length of a symbol pays a multiple
/// of the stake unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payout {
    pub symbol: SymbolId,
    pub count: usize,
    pub multiplier: Fixed,
}

/// A weighted multiplier distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightedMultipliers {
    pub multipliers: Vec<Fixed>,
    pub weights: Vec<u32>,
}

impl WeightedMultipliers {
    pub fn is_empty(&self) -> bool {
        self.multipliers.is_empty()
    }
}

/// A wild symbol: substitutes for any pay symbol, optionally persists
/// across continuation rounds, optionally carries its own multiplier draw.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Wild {
    pub symbol: SymbolId,
    pub sticky: bool,
    pub multipliers: WeightedMultipliers,
}

impl Default for Wild {
    fn default() -> Self {
        Self {
            symbol: 0,
            sticky: false,
            multipliers: WeightedMultipliers::default(),
        }
    }
}

/// A bar-substitution group: member symbols are remapped to a synthetic
/// payout symbol for the substituted evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarGroup {
    pub symbols: Vec<SymbolId>,
    pub payout_symbol: SymbolId,
}

/// A special/bonus payout: an exact total count of a symbol anywhere on the
/// grid queues feature actions and pays a stake multiplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecialPayout {
    pub symbol: SymbolId,
    pub count: usize,
    /// Action queued for the player, e.g. `"freespin"`.
    pub action: String,
    /// How many times the action is queued.
    pub action_count: usize,
    /// Immediate stake-multiplier payout.
    pub multiplier: Fixed,
    /// Identifier matched against `GameParams::selection` in pick rounds.
    pub selection: String,
}

impl Default for SpecialPayout {
    fn default() -> Self {
        Self {
            symbol: 0,
            count: 0,
            action: String::new(),
            action_count: 0,
            multiplier: Fixed::ZERO,
            selection: String::new(),
        }
    }
}

fn default_advance_actions() -> Vec<String> {
    vec!["cascade".to_string()]
}

fn default_hold_actions() -> Vec<String> {
    vec!["freespin".to_string()]
}

/// Cascade behaviour: the multiplier ladder and which actions advance or
/// hold the ladder position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeSpec {
    pub multiplier_ladder: Vec<Fixed>,
    #[serde(default = "default_advance_actions")]
    pub advance_actions: Vec<String>,
    #[serde(default = "default_hold_actions")]
    pub hold_actions: Vec<String>,
}

/// Random wild injection for dynamic-wild-ways rounds: a weighted count of
/// wilds placed on uniform grid positions before win calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WildInjection {
    pub symbol: SymbolId,
    pub counts: Vec<u32>,
    pub weights: Vec<u32>,
}

/// A feature-trigger hook attached to a definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureSpec {
    pub name: String,
    pub params: HashMap<String, serde_json::Value>,
}

impl Default for FeatureSpec {
    fn default() -> Self {
        Self {
            name: String::new(),
            params: HashMap::new(),
        }
    }
}

/// One fully-resolved per-game-variant configuration.
///
/// Unset fields of non-base definitions inherit from the base definition
/// (index 0) once, at config load; see [`crate::config::EngineConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineDefinition {
    /// Reel-set role name, e.g. `"base"`, `"freespin"`, `"pick"`.
    pub name: String,
    /// Ordered symbol strips, one per displayed column.
    pub reels: Vec<Vec<SymbolId>>,
    /// Visible rows per column. Invariant: same length as `reels`.
    pub view_size: Vec<usize>,
    pub payouts: Vec<Payout>,
    /// Row-index path per win line, one row per reel.
    pub win_lines: Vec<Vec<usize>>,
    pub wilds: Vec<Wild>,
    pub wild_compounding: Option<WildCompounding>,
    pub bars: Vec<BarGroup>,
    /// Round-level weighted multiplier distribution.
    pub multipliers: WeightedMultipliers,
    pub special_payouts: Vec<SpecialPayout>,
    pub win_type: Option<WinType>,
    /// Divides the total stake into the pay-table unit. 0 = unset.
    pub stake_divisor: i64,
    pub features: Vec<FeatureSpec>,
    pub respin_allowed: bool,
    pub cascade: Option<CascadeSpec>,
    pub wild_injection: Option<WildInjection>,
    /// Number of leading "prime" reels for prime-and-flop wins and the
    /// shuffle generator's reel subsets. 0 = unset.
    pub prime_reels: usize,
}

impl EngineDefinition {
    /// Resolved win-calculation family (defaults to line wins).
    pub fn win_type(&self) -> WinType {
        self.win_type.unwrap_or(WinType::Lines)
    }

    /// Resolved wild-multiplier compounding policy.
    pub fn compounding(&self) -> WildCompounding {
        self.wild_compounding.unwrap_or(WildCompounding::Max)
    }

    /// Resolved stake divisor (defaults to 1).
    pub fn stake_divisor(&self) -> i64 {
        if self.stake_divisor > 0 { self.stake_divisor } else { 1 }
    }

    /// Resolved prime-reel count (defaults to 3, clamped to the reel count).
    pub fn prime_reels(&self) -> usize {
        let n = if self.prime_reels > 0 { self.prime_reels } else { 3 };
        n.min(self.reels.len())
    }

    pub fn wild(&self, symbol: SymbolId) -> Option<&Wild> {
        self.wilds.iter().find(|w| w.symbol == symbol)
    }

    pub fn is_wild(&self, symbol: SymbolId) -> bool {
        self.wilds.iter().any(|w| w.symbol == symbol)
    }

    /// Earliest-declared pay-table entry matching (symbol, run length).
    pub fn payout_for(&self, symbol: SymbolId, count: usize) -> Option<&Payout> {
        self.payouts
            .iter()
            .find(|p| p.symbol == symbol && p.count == count)
    }

    /// Total visible cell count across all reels.
    pub fn total_view(&self) -> usize {
        self.view_size.iter().sum()
    }

    /// Column-major flat position of (reel, row).
    pub fn position(&self, reel: usize, row: usize) -> usize {
        self.view_size[..reel].iter().sum::<usize>() + row
    }

    /// Map a flat position back to (reel, row).
    pub fn reel_row(&self, position: usize) -> (usize, usize) {
        let mut offset = 0;
        for (reel, view) in self.view_size.iter().enumerate() {
            if position < offset + view {
                return (reel, position - offset);
            }
            offset += view;
        }
        (self.view_size.len().saturating_sub(1), 0)
    }

    /// Structural validation, run once at config load.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.reels.is_empty() {
            return Err(EngineError::malformed(&self.name, "no reel strips"));
        }
        if self.view_size.len() != self.reels.len() {
            return Err(EngineError::malformed(
                &self.name,
                format!(
                    "view size count {} does not match reel count {}",
                    self.view_size.len(),
                    self.reels.len()
                ),
            ));
        }
        for (i, reel) in self.reels.iter().enumerate() {
            if reel.is_empty() {
                return Err(EngineError::malformed(&self.name, format!("reel {i} is empty")));
            }
        }
        for (i, view) in self.view_size.iter().enumerate() {
            if *view == 0 {
                return Err(EngineError::malformed(&self.name, format!("view size {i} is zero")));
            }
        }
        for (i, line) in self.win_lines.iter().enumerate() {
            if line.len() != self.reels.len() {
                return Err(EngineError::malformed(
                    &self.name,
                    format!("win line {i} spans {} reels, expected {}", line.len(), self.reels.len()),
                ));
            }
            for (reel, row) in line.iter().enumerate() {
                if *row >= self.view_size[reel] {
                    return Err(EngineError::malformed(
                        &self.name,
                        format!("win line {i} row {row} exceeds view of reel {reel}"),
                    ));
                }
            }
        }
        // Overlapping bar groups would make the substituted grid depend on
        // application order; reject them outright.
        let mut barred: HashSet<SymbolId> = HashSet::new();
        for group in &self.bars {
            for sym in &group.symbols {
                if !barred.insert(*sym) {
                    return Err(EngineError::malformed(
                        &self.name,
                        format!("symbol {sym} appears in more than one bar group"),
                    ));
                }
            }
        }
        if !self.multipliers.is_empty()
            && self.multipliers.multipliers.len() != self.multipliers.weights.len()
        {
            return Err(EngineError::malformed(
                &self.name,
                "round multiplier options and weights differ in length",
            ));
        }
        for wild in &self.wilds {
            if !wild.multipliers.is_empty()
                && wild.multipliers.multipliers.len() != wild.multipliers.weights.len()
            {
                return Err(EngineError::malformed(
                    &self.name,
                    format!("wild {} multiplier options and weights differ in length", wild.symbol),
                ));
            }
        }
        if let Some(cascade) = &self.cascade {
            if cascade.multiplier_ladder.is_empty() {
                return Err(EngineError::malformed(&self.name, "cascade multiplier ladder is empty"));
            }
        }
        if let Some(inj) = &self.wild_injection {
            if inj.counts.is_empty() || inj.counts.len() != inj.weights.len() {
                return Err(EngineError::malformed(
                    &self.name,
                    "wild injection counts and weights must be non-empty and equal length",
                ));
            }
        }
        Ok(())
    }
}
