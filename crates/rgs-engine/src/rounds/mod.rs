//! Round generators
//!
//! One generator per feature shape. Each receives the resolved definition
//! and request and returns a [`RoundDraft`] — grid, stops, prizes, proposed
//! next actions — which [`crate::actions::finalize`] turns into the final
//! [`crate::gamestate::Gamestate`].

mod base;
mod cascade;
mod feature;
mod gamble;
mod pick;
mod respin;

pub use base::*;
pub use cascade::*;
pub use feature::*;
pub use gamble::*;
pub use pick::*;
pub use respin::*;

use rgs_core::Fixed;

use crate::config::{EngineConfig, RoundKind};
use crate::definition::{EngineDefinition, SymbolId};
use crate::error::EngineError;
use crate::gamestate::{FeatureState, GameParams, Prize};
use crate::play::PlayContext;

/// Everything a generator needs to resolve one round step.
pub struct RoundInput<'a> {
    pub config: &'a EngineConfig,
    pub def: &'a EngineDefinition,
    pub params: &'a GameParams,
    /// The resolved action — the queue head on continuations, regardless of
    /// what the client sent.
    pub action: &'a str,
}

/// A generator's proposed round outcome, before queue merging and
/// transaction synthesis.
#[derive(Debug, Clone, Default)]
pub struct RoundDraft {
    pub symbol_grid: Vec<Vec<SymbolId>>,
    pub stop_list: Vec<usize>,
    pub prizes: Vec<Prize>,
    /// Win total in pay-table units.
    pub relative_payout: Fixed,
    /// Round multiplier.
    pub multiplier: Fixed,
    /// Generator-proposed next actions; queue directives allowed.
    pub next_actions: Vec<String>,
    pub features: Vec<String>,
    pub feature_view: Option<FeatureState>,
    /// Bespoke wager amount (respin price, gamble risk, free shuffle).
    pub wager_override: Option<Fixed>,
    /// Bespoke money payout (gamble resolution).
    pub payout_override: Option<Fixed>,
}

impl RoundDraft {
    /// Re-derive the relative payout from the prize list.
    pub fn sum_prizes(&mut self) {
        self.relative_payout = self.prizes.iter().map(Prize::relative_payout).sum();
    }
}

/// Dispatch a resolved binding kind to its generator.
pub fn generate(
    kind: RoundKind,
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
) -> Result<RoundDraft, EngineError> {
    match kind {
        RoundKind::Base => base_round(input, ctx, BaseMode::Standard),
        RoundKind::MaxWild => base_round(input, ctx, BaseMode::MaxWild),
        RoundKind::DynamicWildWays => base_round(input, ctx, BaseMode::DynamicWilds),
        RoundKind::Cascade => cascade_round(input, ctx, false),
        RoundKind::CascadeMultiply => cascade_round(input, ctx, true),
        RoundKind::Respin => respin_round(input, ctx),
        RoundKind::Shuffle => shuffle_round(input, ctx),
        RoundKind::PrizeSelect => prize_select_round(input),
        RoundKind::Gamble => gamble_round(input, ctx),
        RoundKind::FeatureRound => feature_round(input, ctx, FeatureShape::Round),
        RoundKind::FeatureCascade => feature_round(input, ctx, FeatureShape::Cascade),
        RoundKind::FeatureCascadeMultiply => feature_round(input, ctx, FeatureShape::CascadeMultiply),
    }
}

/// The reel strips a continuation should read from: a feature trigger may
/// have replaced the definition's strips for the rest of the round.
pub(crate) fn active_reels<'a>(
    config: &'a EngineConfig,
    def: &'a EngineDefinition,
    prev: Option<&crate::gamestate::Gamestate>,
) -> &'a Vec<Vec<SymbolId>> {
    if let Some(state) = prev.and_then(|p| p.feature_view.as_ref()) {
        if !state.reel_set.is_empty() {
            if let Some(alternate) = config.definition(&state.reel_set) {
                return &alternate.reels;
            }
        }
    }
    &def.reels
}
