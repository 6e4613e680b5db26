//! Play orchestrator and force harness
//!
//! [`play`] is the single entry point: it decides fresh-vs-continuation,
//! validates the special-cased actions (respin, gamble), dispatches the
//! action name through the config's generator bindings (weighted when an
//! engine has several variants sharing an action id), and runs the queue
//! and transaction post-processing.
//!
//! Everything the engine may randomize or be forced into travels through an
//! explicit [`PlayContext`] — the engine holds no process-wide state.

use log::{debug, warn};
use rand::RngCore;

use rgs_core::weighted_index;

use crate::actions::{FINISH, finalize};
use crate::config::{EngineConfig, GeneratorBinding, RoundKind};
use crate::error::EngineError;
use crate::gamestate::{GameParams, Gamestate};
use crate::rounds::{RoundInput, generate};

/// Per-call context: the RNG source and the developer force overrides.
pub struct PlayContext<'r> {
    pub rng: &'r mut dyn RngCore,
    /// Explicit stop list replacing the drawn stops, one entry per reel.
    pub forced_stops: Option<Vec<usize>>,
    /// Action override applied to fresh rounds.
    pub forced_action: Option<String>,
}

impl<'r> PlayContext<'r> {
    pub fn new(rng: &'r mut dyn RngCore) -> Self {
        Self {
            rng,
            forced_stops: None,
            forced_action: None,
        }
    }

    pub fn with_forced_stops(mut self, stops: Vec<usize>) -> Self {
        self.forced_stops = Some(stops);
        self
    }
}

/// Bounded filtered-force search: replay the round until the predicate
/// accepts the outcome or the attempt budget runs out. The engine never
/// races a wall clock.
pub struct ForceFilter<'f> {
    pub max_attempts: u32,
    pub predicate: &'f dyn Fn(&Gamestate) -> bool,
}

/// Resolve one action into the next gamestate.
pub fn play(
    config: &EngineConfig,
    params: &GameParams,
    ctx: &mut PlayContext<'_>,
) -> Result<Gamestate, EngineError> {
    let prev = params.previous();
    let fresh = prev.map(|p| p.round_closed()).unwrap_or(true);

    // Continuations force the queue head regardless of client input.
    let action = if fresh {
        ctx.forced_action
            .clone()
            .unwrap_or_else(|| params.action.clone())
    } else {
        let head = prev
            .and_then(|p| p.queued_action())
            .unwrap_or(FINISH)
            .to_string();
        if head != params.action {
            warn!(
                "client requested {} but queue head is {head}; using the queue",
                params.action
            );
        }
        head
    };

    let bindings = config.bindings_for(&action);
    if bindings.is_empty() {
        return Err(EngineError::UnknownAction(action));
    }

    // All validation below happens before any draw.
    if bindings.iter().any(|b| b.kind == RoundKind::Gamble) {
        validate_gamble(prev)?;
    }
    if bindings.iter().any(|b| b.kind == RoundKind::Respin) {
        if prev.is_none() {
            return Err(EngineError::InvalidRespin("no previous round".into()));
        }
        if params.respin_reel.is_none() {
            return Err(EngineError::InvalidRespin("reel index missing".into()));
        }
    }
    let charges_stake = fresh
        && bindings
            .iter()
            .all(|b| !matches!(b.kind, RoundKind::Gamble | RoundKind::Shuffle));
    if charges_stake && (params.stake.is_zero() || params.stake < rgs_core::Fixed::ZERO) {
        return Err(EngineError::InvalidStake(params.stake.to_string()));
    }

    let binding = select_binding(&bindings, ctx.rng);
    let def = config
        .definition(&binding.definition)
        .ok_or_else(|| EngineError::malformed(&binding.definition, "definition disappeared"))?;
    debug!(
        "playing {action} via {:?} generator on definition {}",
        binding.kind, def.name
    );

    // Continuations reuse the previous round's bet and line selection.
    let mut effective = params.clone();
    if !fresh {
        if let Some(p) = prev {
            effective.stake = p
                .bet_per_line
                .mul(rgs_core::Fixed::from_int(def.stake_divisor()));
            effective.selected_win_lines = p.selected_win_lines.clone();
        }
    }

    let input = RoundInput {
        config,
        def,
        params: &effective,
        action: &action,
    };
    let draft = generate(binding.kind, &input, ctx)?;
    finalize(def, draft, &effective, &action)
}

/// As [`play`], retrying until the filter accepts the outcome. Each attempt
/// replays the same request with fresh draws.
pub fn play_filtered(
    config: &EngineConfig,
    params: &GameParams,
    ctx: &mut PlayContext<'_>,
    filter: &ForceFilter<'_>,
) -> Result<Gamestate, EngineError> {
    for attempt in 0..filter.max_attempts {
        let gamestate = play(config, params, ctx)?;
        if (filter.predicate)(&gamestate) {
            debug!("force filter satisfied on attempt {}", attempt + 1);
            return Ok(gamestate);
        }
    }
    Err(EngineError::ForceExhausted(filter.max_attempts))
}

/// Gamble is valid only directly after a freespin round closed with nothing
/// but `finish` pending.
fn validate_gamble(prev: Option<&Gamestate>) -> Result<(), EngineError> {
    let prev = prev.ok_or_else(|| EngineError::InvalidGamble("no previous round".into()))?;
    if prev.action != "freespin" {
        return Err(EngineError::InvalidGamble(format!(
            "previous action was {}, not freespin",
            prev.action
        )));
    }
    if !prev.round_closed() {
        return Err(EngineError::InvalidGamble("previous round still open".into()));
    }
    Ok(())
}

/// Weighted pick among same-named bindings; a single binding consumes no
/// draw.
fn select_binding<'a>(
    bindings: &[&'a GeneratorBinding],
    rng: &mut dyn RngCore,
) -> &'a GeneratorBinding {
    if bindings.len() == 1 {
        return bindings[0];
    }
    let weights: Vec<u32> = bindings.iter().map(|b| b.weight).collect();
    bindings[weighted_index(rng, &weights)]
}
