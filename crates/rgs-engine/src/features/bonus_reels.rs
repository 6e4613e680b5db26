//! Bonus-reels feature trigger (stateful)
//!
//! Accumulates a charge counter across the rounds of a feature; once the
//! counter reaches its threshold the trigger swaps the active reel strips
//! for a named alternate reel set for the remainder of the round.

use rand::RngCore;
use serde::Deserialize;

use crate::definition::{FeatureSpec, SymbolId};
use crate::error::EngineError;

use super::{FeatureContext, FeatureOutcome, FeatureTrigger, parse_params};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BonusReelsParams {
    /// Symbol that charges the meter.
    symbol: SymbolId,
    /// Charges needed to switch reel sets.
    charges: u64,
    /// Name of the definition whose reels take over once charged.
    reel_set: String,
}

/// Stateful reel-set switch driven by a charge meter.
pub struct BonusReelsTrigger {
    params: BonusReelsParams,
}

impl BonusReelsTrigger {
    pub fn from_spec(spec: &FeatureSpec) -> Result<Self, EngineError> {
        Ok(Self {
            params: parse_params(spec)?,
        })
    }
}

impl FeatureTrigger for BonusReelsTrigger {
    fn name(&self) -> &str {
        "bonusReels"
    }

    fn stateful(&self) -> bool {
        true
    }

    fn evaluate(
        &self,
        ctx: &FeatureContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<FeatureOutcome, EngineError> {
        let carried = ctx
            .previous_data(self.name())
            .and_then(|v| v.get("charge"))
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        let landed = ctx
            .grid
            .iter()
            .flat_map(|column| column.iter())
            .filter(|&&symbol| symbol == self.params.symbol)
            .count() as u64;

        let charge = carried + landed;
        if charge < self.params.charges {
            return Ok(FeatureOutcome {
                state: Some(serde_json::json!({ "charge": charge })),
                ..FeatureOutcome::none()
            });
        }

        let alternate = ctx.config.definition(&self.params.reel_set).ok_or_else(|| {
            EngineError::malformed(
                &ctx.definition.name,
                format!("bonus reel set {} is not a known definition", self.params.reel_set),
            )
        })?;

        Ok(FeatureOutcome {
            reels: Some(alternate.reels.clone()),
            reel_set: Some(self.params.reel_set.clone()),
            state: Some(serde_json::json!({ "charge": 0 })),
            ..FeatureOutcome::none()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::definition::EngineDefinition;
    use crate::gamestate::FeatureState;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rgs_core::Fixed;

    fn spec() -> FeatureSpec {
        let mut params = std::collections::HashMap::new();
        params.insert("symbol".into(), serde_json::json!(8));
        params.insert("charges".into(), serde_json::json!(4));
        params.insert("reelSet".into(), serde_json::json!("bonus"));
        FeatureSpec {
            name: "bonusReels".into(),
            params,
        }
    }

    fn config_with_bonus() -> EngineConfig {
        EngineConfig {
            definitions: vec![
                EngineDefinition {
                    name: "base".into(),
                    reels: vec![vec![0, 1, 2]; 3],
                    view_size: vec![3; 3],
                    ..Default::default()
                },
                EngineDefinition {
                    name: "bonus".into(),
                    reels: vec![vec![8, 8, 1]; 3],
                    view_size: vec![3; 3],
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_charge_accumulates_in_state() {
        let trigger = BonusReelsTrigger::from_spec(&spec()).unwrap();
        let config = config_with_bonus();
        let def = config.definitions[0].clone();
        let grid = vec![vec![8, 0, 0], vec![8, 0, 0], vec![0, 0, 0]];
        let stops = vec![0; 3];
        let prev = FeatureState {
            reel_set: String::new(),
            data: serde_json::json!({ "bonusReels": { "charge": 1 } }),
        };
        let ctx = FeatureContext {
            config: &config,
            definition: &def,
            action: "freespin",
            stake: Fixed::from_int(1),
            grid: &grid,
            stop_list: &stops,
            previous: Some(&prev),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = trigger.evaluate(&ctx, &mut rng).unwrap();
        assert!(outcome.reels.is_none());
        assert_eq!(outcome.state.unwrap()["charge"], 3);
    }

    #[test]
    fn test_full_charge_switches_reels() {
        let trigger = BonusReelsTrigger::from_spec(&spec()).unwrap();
        let config = config_with_bonus();
        let def = config.definitions[0].clone();
        let grid = vec![vec![8, 8, 0], vec![8, 8, 0], vec![0, 0, 0]];
        let stops = vec![0; 3];
        let ctx = FeatureContext {
            config: &config,
            definition: &def,
            action: "freespin",
            stake: Fixed::from_int(1),
            grid: &grid,
            stop_list: &stops,
            previous: None,
        };
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = trigger.evaluate(&ctx, &mut rng).unwrap();
        assert_eq!(outcome.reel_set.as_deref(), Some("bonus"));
        assert_eq!(outcome.reels.unwrap()[0], vec![8, 8, 1]);
        assert_eq!(outcome.state.unwrap()["charge"], 0);
    }
}
