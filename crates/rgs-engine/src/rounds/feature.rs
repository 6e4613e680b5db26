//! Feature-bearing round generators
//!
//! Identical control flow to the base/cascade generators, plus the
//! feature-trigger hook: after win calculation the definition's triggers
//! run over the grid and stop list (stateful triggers also see the prior
//! round's feature state), and their wins, queued actions, and reel-set
//! replacements merge into the draft.

use log::debug;

use crate::error::EngineError;
use crate::features::{FeatureContext, FeatureSet};
use crate::play::PlayContext;

use super::base::{BaseMode, base_round};
use super::cascade::cascade_round;
use super::{RoundDraft, RoundInput};

/// Which underlying round shape a feature generator wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureShape {
    Round,
    Cascade,
    CascadeMultiply,
}

pub fn feature_round(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
    shape: FeatureShape,
) -> Result<RoundDraft, EngineError> {
    // Instantiate triggers before any draw so bad specs fail cleanly.
    let features = FeatureSet::from_specs(&input.def.features)?;

    let mut draft = match shape {
        FeatureShape::Round => base_round(input, ctx, BaseMode::Standard)?,
        FeatureShape::Cascade => cascade_round(input, ctx, false)?,
        FeatureShape::CascadeMultiply => cascade_round(input, ctx, true)?,
    };
    if features.is_empty() {
        return Ok(draft);
    }

    let previous_state = input
        .params
        .previous()
        .filter(|p| !p.round_closed())
        .and_then(|p| p.feature_view.as_ref());

    let feature_ctx = FeatureContext {
        config: input.config,
        definition: input.def,
        action: input.action,
        stake: input.params.stake,
        grid: &draft.symbol_grid,
        stop_list: &draft.stop_list,
        previous: previous_state,
    };
    let resolution = features.evaluate_all(&feature_ctx, ctx.rng)?;
    if let Some(reels) = &resolution.reels {
        debug!(
            "feature trigger replaced the active reel set ({} strips) for the rest of the round",
            reels.len()
        );
    }

    draft.prizes.extend(resolution.prizes);
    draft.next_actions.extend(resolution.next_actions);
    draft.features = features.names();
    if resolution.state.is_some() {
        draft.feature_view = resolution.state;
    } else if let Some(prev) = previous_state {
        // Keep carrying state a trigger set earlier in the round.
        draft.feature_view = Some(prev.clone());
    }
    draft.sum_prizes();
    Ok(draft)
}
