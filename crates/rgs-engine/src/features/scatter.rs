//! Scatter feature trigger
//!
//! Counts a trigger symbol anywhere on the grid; reaching the threshold
//! queues feature actions and pays an immediate stake-multiplier prize.

use rand::RngCore;
use serde::Deserialize;

use rgs_core::Fixed;

use crate::definition::{FeatureSpec, Payout, SymbolId};
use crate::error::EngineError;
use crate::gamestate::Prize;

use super::{FeatureContext, FeatureOutcome, FeatureTrigger, parse_params};

fn default_action() -> String {
    "freespin".to_string()
}

fn default_action_count() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScatterParams {
    symbol: SymbolId,
    min_count: usize,
    #[serde(default = "default_action")]
    action: String,
    #[serde(default = "default_action_count")]
    action_count: usize,
    #[serde(default)]
    multiplier: Fixed,
}

/// Queues feature rounds when enough scatter symbols land anywhere.
pub struct ScatterTrigger {
    params: ScatterParams,
}

impl ScatterTrigger {
    pub fn from_spec(spec: &FeatureSpec) -> Result<Self, EngineError> {
        Ok(Self {
            params: parse_params(spec)?,
        })
    }
}

impl FeatureTrigger for ScatterTrigger {
    fn name(&self) -> &str {
        "scatterFreespins"
    }

    fn evaluate(
        &self,
        ctx: &FeatureContext<'_>,
        _rng: &mut dyn RngCore,
    ) -> Result<FeatureOutcome, EngineError> {
        let mut positions = Vec::new();
        for (reel, column) in ctx.grid.iter().enumerate() {
            for (row, &symbol) in column.iter().enumerate() {
                if symbol == self.params.symbol {
                    positions.push(ctx.definition.position(reel, row));
                }
            }
        }
        if positions.len() < self.params.min_count {
            return Ok(FeatureOutcome::none());
        }

        let count = positions.len();
        Ok(FeatureOutcome {
            prizes: vec![Prize {
                payout: Payout {
                    symbol: self.params.symbol,
                    count,
                    multiplier: self.params.multiplier,
                },
                index: format!("{}:{}", self.params.action, self.params.action_count),
                multiplier: Fixed::ONE,
                symbol_positions: positions,
                win_line: None,
            }],
            next_actions: vec![self.params.action.clone(); self.params.action_count],
            ..FeatureOutcome::none()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::definition::EngineDefinition;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn spec() -> FeatureSpec {
        let mut params = std::collections::HashMap::new();
        params.insert("symbol".into(), serde_json::json!(8));
        params.insert("minCount".into(), serde_json::json!(3));
        params.insert("actionCount".into(), serde_json::json!(5));
        FeatureSpec {
            name: "scatterFreespins".into(),
            params,
        }
    }

    fn context<'a>(
        config: &'a EngineConfig,
        def: &'a EngineDefinition,
        grid: &'a [Vec<SymbolId>],
        stops: &'a [usize],
    ) -> FeatureContext<'a> {
        FeatureContext {
            config,
            definition: def,
            action: "freespin",
            stake: Fixed::from_int(1),
            grid,
            stop_list: stops,
            previous: None,
        }
    }

    #[test]
    fn test_threshold_queues_actions() {
        let trigger = ScatterTrigger::from_spec(&spec()).unwrap();
        let config = EngineConfig::default();
        let def = EngineDefinition {
            view_size: vec![3; 5],
            ..Default::default()
        };
        let grid = vec![
            vec![8, 0, 0],
            vec![0, 8, 0],
            vec![0, 0, 8],
            vec![0, 0, 0],
            vec![0, 0, 0],
        ];
        let stops = vec![0; 5];
        let ctx = context(&config, &def, &grid, &stops);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = trigger.evaluate(&ctx, &mut rng).unwrap();
        assert_eq!(outcome.next_actions, vec!["freespin".to_string(); 5]);
        assert_eq!(outcome.prizes.len(), 1);
        assert_eq!(outcome.prizes[0].index, "freespin:5");
    }

    #[test]
    fn test_below_threshold_is_noop() {
        let trigger = ScatterTrigger::from_spec(&spec()).unwrap();
        let config = EngineConfig::default();
        let def = EngineDefinition {
            view_size: vec![3; 5],
            ..Default::default()
        };
        let grid = vec![vec![8, 0, 0], vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 0], vec![0, 0, 0]];
        let stops = vec![0; 5];
        let ctx = context(&config, &def, &grid, &stops);
        let mut rng = StdRng::seed_from_u64(2);
        let outcome = trigger.evaluate(&ctx, &mut rng).unwrap();
        assert!(outcome.prizes.is_empty());
        assert!(outcome.next_actions.is_empty());
    }
}
