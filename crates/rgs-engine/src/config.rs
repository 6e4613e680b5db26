//! Engine configuration — definitions, generator bindings, inheritance
//!
//! An [`EngineConfig`] is built once per game slug and is read-only for the
//! duration of every round resolution. Loading resolves two things eagerly
//! so play-time never guesses: field-level inheritance from the base
//! definition, and the action-name → generator dispatch table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use log::debug;
use rgs_core::Fixed;

use crate::definition::EngineDefinition;
use crate::error::EngineError;

/// The generator families a binding can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundKind {
    Base,
    Cascade,
    CascadeMultiply,
    Respin,
    Shuffle,
    PrizeSelect,
    MaxWild,
    DynamicWildWays,
    FeatureRound,
    FeatureCascade,
    FeatureCascadeMultiply,
    Gamble,
}

fn default_weight() -> u32 {
    1
}

/// Binds an action name to a generator kind over a named definition.
///
/// Several bindings may share an action name; the orchestrator then selects
/// among them by weight. Resolved at config load — an unknown action at
/// play time is a typed error, never a panic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorBinding {
    pub action: String,
    pub kind: RoundKind,
    pub definition: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// The complete, resolved per-game configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub game: String,
    pub rtp: Fixed,
    pub volatility: Fixed,
    pub definitions: Vec<EngineDefinition>,
    pub bindings: Vec<GeneratorBinding>,
    /// Action name → indices into `bindings`, built by [`EngineConfig::resolve`].
    #[serde(skip)]
    pub(crate) dispatch: HashMap<String, Vec<usize>>,
}

impl EngineConfig {
    /// Build and resolve a config in one step.
    pub fn new(
        game: impl Into<String>,
        definitions: Vec<EngineDefinition>,
        bindings: Vec<GeneratorBinding>,
    ) -> Result<Self, EngineError> {
        EngineConfig {
            game: game.into(),
            definitions,
            bindings,
            ..Default::default()
        }
        .resolve()
    }

    /// Resolve inheritance, validate every definition and binding, and
    /// build the dispatch table. Must run once before the config is played.
    pub fn resolve(mut self) -> Result<Self, EngineError> {
        if self.definitions.is_empty() {
            return Err(EngineError::malformed(&self.game, "config has no definitions"));
        }

        let base = self.definitions[0].clone();
        for def in self.definitions.iter_mut().skip(1) {
            inherit(def, &base);
        }

        for def in &self.definitions {
            def.validate()?;
        }

        self.dispatch.clear();
        for (i, binding) in self.bindings.iter().enumerate() {
            if self.definitions.iter().all(|d| d.name != binding.definition) {
                return Err(EngineError::malformed(
                    &self.game,
                    format!(
                        "binding for action {} references unknown definition {}",
                        binding.action, binding.definition
                    ),
                ));
            }
            let def = self
                .definitions
                .iter()
                .find(|d| d.name == binding.definition)
                .unwrap_or(&self.definitions[0]);
            match binding.kind {
                RoundKind::CascadeMultiply | RoundKind::FeatureCascadeMultiply => {
                    if def.cascade.is_none() {
                        return Err(EngineError::malformed(
                            &def.name,
                            "cascade-multiply binding requires a multiplier ladder",
                        ));
                    }
                }
                RoundKind::DynamicWildWays => {
                    if def.wild_injection.is_none() {
                        return Err(EngineError::malformed(
                            &def.name,
                            "dynamic-wild-ways binding requires a wild injection table",
                        ));
                    }
                }
                _ => {}
            }
            self.dispatch
                .entry(binding.action.clone())
                .or_default()
                .push(i);
        }

        debug!(
            "resolved config {}: {} definitions, {} actions",
            self.game,
            self.definitions.len(),
            self.dispatch.len()
        );
        Ok(self)
    }

    /// Look up a definition by role name.
    pub fn definition(&self, name: &str) -> Option<&EngineDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    /// Look up a definition by index.
    pub fn definition_at(&self, index: usize) -> Option<&EngineDefinition> {
        self.definitions.get(index)
    }

    /// All bindings registered for an action name, in declaration order.
    pub fn bindings_for(&self, action: &str) -> Vec<&GeneratorBinding> {
        self.dispatch
            .get(action)
            .map(|idx| idx.iter().map(|i| &self.bindings[*i]).collect())
            .unwrap_or_default()
    }
}

/// Copy unset fields of `def` from the base definition. A field counts as
/// set when it is non-zero / non-empty.
fn inherit(def: &mut EngineDefinition, base: &EngineDefinition) {
    if def.reels.is_empty() {
        def.reels = base.reels.clone();
    }
    if def.view_size.is_empty() {
        def.view_size = base.view_size.clone();
    }
    if def.payouts.is_empty() {
        def.payouts = base.payouts.clone();
    }
    if def.win_lines.is_empty() {
        def.win_lines = base.win_lines.clone();
    }
    if def.wilds.is_empty() {
        def.wilds = base.wilds.clone();
    }
    if def.wild_compounding.is_none() {
        def.wild_compounding = base.wild_compounding;
    }
    if def.bars.is_empty() {
        def.bars = base.bars.clone();
    }
    if def.multipliers.is_empty() {
        def.multipliers = base.multipliers.clone();
    }
    if def.special_payouts.is_empty() {
        def.special_payouts = base.special_payouts.clone();
    }
    if def.win_type.is_none() {
        def.win_type = base.win_type;
    }
    if def.stake_divisor == 0 {
        def.stake_divisor = base.stake_divisor;
    }
    if def.features.is_empty() {
        def.features = base.features.clone();
    }
    if !def.respin_allowed {
        def.respin_allowed = base.respin_allowed;
    }
    if def.cascade.is_none() {
        def.cascade = base.cascade.clone();
    }
    if def.wild_injection.is_none() {
        def.wild_injection = base.wild_injection.clone();
    }
    if def.prime_reels == 0 {
        def.prime_reels = base.prime_reels;
    }
}

/// Parsing limits for game-config documents.
#[derive(Debug, Clone)]
pub struct ParseLimits {
    pub max_definitions: usize,
    pub max_reels: usize,
    pub max_rows: usize,
    pub max_strip_length: usize,
    pub max_win_lines: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_definitions: 16,
            max_reels: 10,
            max_rows: 10,
            max_strip_length: 512,
            max_win_lines: 100,
        }
    }
}

/// Parses declarative YAML game documents into a resolved [`EngineConfig`].
pub struct ConfigParser {
    pub limits: ParseLimits,
}

impl ConfigParser {
    pub fn new() -> Self {
        Self {
            limits: ParseLimits::default(),
        }
    }

    pub fn with_limits(limits: ParseLimits) -> Self {
        Self { limits }
    }

    /// Parse a YAML document, validate limits, resolve inheritance.
    pub fn parse_yaml(&self, yaml: &str) -> Result<EngineConfig, EngineError> {
        let config: EngineConfig =
            serde_yml::from_str(yaml).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        self.check_limits(&config)?;
        config.resolve()
    }

    fn check_limits(&self, config: &EngineConfig) -> Result<(), EngineError> {
        if config.definitions.len() > self.limits.max_definitions {
            return Err(EngineError::ConfigParse(format!(
                "too many definitions: {} > {}",
                config.definitions.len(),
                self.limits.max_definitions
            )));
        }
        for def in &config.definitions {
            if def.reels.len() > self.limits.max_reels {
                return Err(EngineError::ConfigParse(format!(
                    "{}: too many reels: {} > {}",
                    def.name,
                    def.reels.len(),
                    self.limits.max_reels
                )));
            }
            for strip in &def.reels {
                if strip.len() > self.limits.max_strip_length {
                    return Err(EngineError::ConfigParse(format!(
                        "{}: reel strip longer than {}",
                        def.name, self.limits.max_strip_length
                    )));
                }
            }
            if def.view_size.iter().any(|v| *v > self.limits.max_rows) {
                return Err(EngineError::ConfigParse(format!(
                    "{}: view taller than {} rows",
                    def.name, self.limits.max_rows
                )));
            }
            if def.win_lines.len() > self.limits.max_win_lines {
                return Err(EngineError::ConfigParse(format!(
                    "{}: too many win lines: {} > {}",
                    def.name,
                    def.win_lines.len(),
                    self.limits.max_win_lines
                )));
            }
        }
        Ok(())
    }
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}
