//! Feature-trigger hooks
//!
//! Feature-bearing round generators invoke a capability-polymorphic
//! [`FeatureTrigger`] before assembling the round, so feature logic —
//! scatter triggers, stateful bonus reels — can be swapped per game family
//! without changing generator code. A trigger sees the grid, stop list and
//! (for stateful triggers) the prior round's feature state, and may replace
//! the active reel strips for the remainder of the round.

mod bonus_reels;
mod scatter;

pub use bonus_reels::*;
pub use scatter::*;

use rand::RngCore;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use rgs_core::Fixed;

use crate::config::EngineConfig;
use crate::definition::{EngineDefinition, FeatureSpec, SymbolId};
use crate::error::EngineError;
use crate::gamestate::{FeatureState, Prize};

/// Everything a trigger may inspect while evaluating a round.
pub struct FeatureContext<'a> {
    pub config: &'a EngineConfig,
    pub definition: &'a EngineDefinition,
    pub action: &'a str,
    pub stake: Fixed,
    pub grid: &'a [Vec<SymbolId>],
    pub stop_list: &'a [usize],
    /// Feature state persisted by the previous round, if any.
    pub previous: Option<&'a FeatureState>,
}

impl FeatureContext<'_> {
    /// The previous state payload a named trigger stored, if any.
    pub fn previous_data(&self, trigger: &str) -> Option<&Value> {
        self.previous.and_then(|s| s.data.get(trigger))
    }
}

/// What one trigger contributes to the round.
#[derive(Debug, Default)]
pub struct FeatureOutcome {
    pub prizes: Vec<Prize>,
    pub next_actions: Vec<String>,
    /// Replacement reel strips for the remainder of the round.
    pub reels: Option<Vec<Vec<SymbolId>>>,
    /// Identifier of the replacement reel set.
    pub reel_set: Option<String>,
    /// Trigger-owned state to persist into the next gamestate.
    pub state: Option<Value>,
}

impl FeatureOutcome {
    pub fn none() -> Self {
        Self::default()
    }
}

/// A pluggable feature hook.
pub trait FeatureTrigger: Send + Sync {
    fn name(&self) -> &str;

    /// Stateful triggers receive the prior round's feature state.
    fn stateful(&self) -> bool {
        false
    }

    fn evaluate(
        &self,
        ctx: &FeatureContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FeatureOutcome, EngineError>;
}

/// Merged result of every trigger attached to a definition.
#[derive(Debug, Default)]
pub struct FeatureResolution {
    pub prizes: Vec<Prize>,
    pub next_actions: Vec<String>,
    pub reels: Option<Vec<Vec<SymbolId>>>,
    pub state: Option<FeatureState>,
}

/// The triggers attached to one definition, built from its feature specs.
pub struct FeatureSet {
    triggers: Vec<Box<dyn FeatureTrigger>>,
}

impl FeatureSet {
    /// Instantiate the built-in triggers named by the specs.
    pub fn from_specs(specs: &[FeatureSpec]) -> Result<Self, EngineError> {
        let mut triggers: Vec<Box<dyn FeatureTrigger>> = Vec::with_capacity(specs.len());
        for spec in specs {
            match spec.name.as_str() {
                "scatterFreespins" => triggers.push(Box::new(ScatterTrigger::from_spec(spec)?)),
                "bonusReels" => triggers.push(Box::new(BonusReelsTrigger::from_spec(spec)?)),
                other => {
                    return Err(EngineError::ConfigParse(format!(
                        "unknown feature trigger: {other}"
                    )));
                }
            }
        }
        Ok(Self { triggers })
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.triggers.iter().map(|t| t.name().to_string()).collect()
    }

    /// Run every trigger and merge their outcomes. Later triggers win on
    /// reel replacement; state payloads are kept per trigger name.
    pub fn evaluate_all(
        &self,
        ctx: &FeatureContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<FeatureResolution, EngineError> {
        let mut resolution = FeatureResolution::default();
        let mut data = Map::new();
        let mut reel_set = String::new();

        for trigger in &self.triggers {
            let outcome = trigger.evaluate(ctx, rng)?;
            resolution.prizes.extend(outcome.prizes);
            resolution.next_actions.extend(outcome.next_actions);
            if let Some(reels) = outcome.reels {
                resolution.reels = Some(reels);
                reel_set = outcome.reel_set.unwrap_or_default();
            }
            if let Some(state) = outcome.state {
                data.insert(trigger.name().to_string(), state);
            }
        }

        if !data.is_empty() || !reel_set.is_empty() {
            resolution.state = Some(FeatureState {
                reel_set,
                data: Value::Object(data),
            });
        }
        Ok(resolution)
    }
}

/// Deserialize a trigger's parameter map into its typed config.
pub(crate) fn parse_params<T: DeserializeOwned>(spec: &FeatureSpec) -> Result<T, EngineError> {
    let value = Value::Object(spec.params.clone().into_iter().collect());
    serde_json::from_value(value).map_err(|e| {
        EngineError::ConfigParse(format!("feature {} params: {e}", spec.name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_trigger_rejected() {
        let spec = FeatureSpec {
            name: "noSuchTrigger".into(),
            params: Default::default(),
        };
        assert!(FeatureSet::from_specs(&[spec]).is_err());
    }

    #[test]
    fn test_empty_set() {
        let set = FeatureSet::from_specs(&[]).unwrap();
        assert!(set.is_empty());
    }
}
