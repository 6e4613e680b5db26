//! Engine errors
//!
//! Every variant is a local validation failure detectable before any RNG
//! draw or state mutation; callers receive them without partial state
//! changes. Arithmetic edge cases (zero divisors, ladder overflows) indicate
//! configuration bugs and surface as [`EngineError::MalformedDefinition`].

/// Typed, recoverable errors surfaced by the round-resolution engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no generator bound to action: {0}")]
    UnknownAction(String),

    #[error("invalid respin request: {0}")]
    InvalidRespin(String),

    #[error("invalid gamble request: {0}")]
    InvalidGamble(String),

    #[error("no special payout matches selection: {0}")]
    InvalidSelection(String),

    #[error("malformed engine definition {name}: {reason}")]
    MalformedDefinition { name: String, reason: String },

    #[error("invalid stake: {0}")]
    InvalidStake(String),

    #[error("continuation action {0} requires a previous gamestate")]
    InvalidContinuation(String),

    #[error("forced outcome not found within {0} attempts")]
    ForceExhausted(u32),

    #[error("config parse error: {0}")]
    ConfigParse(String),
}

impl EngineError {
    /// Shorthand for definition-validation failures.
    pub fn malformed(name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
