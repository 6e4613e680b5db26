//! rgs-sim — Batch spin simulator for RTP validation
//!
//! Drives full rounds (fresh action plus every queued continuation) against
//! a resolved [`EngineConfig`] across a rayon worker pool. Each worker
//! chunk owns a `ChaCha8Rng` seeded from the base seed and its chunk index,
//! so a run is reproducible regardless of thread scheduling.

mod stats;

pub use stats::*;

use log::{debug, info};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use rayon::prelude::*;

use rgs_core::Fixed;
use rgs_engine::{EngineConfig, EngineError, GameParams, PlayContext, play};

/// Hard cap on continuation steps per round; a round running this long
/// indicates a queue bug, not a long bonus.
const MAX_STEPS_PER_ROUND: u32 = 10_000;

/// Simulation failures.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("round exceeded {0} resolution steps")]
    RunawayRound(u32),
}

/// Batch simulation parameters.
#[derive(Debug, Clone)]
pub struct SimOptions {
    pub rounds: u64,
    pub stake: Fixed,
    /// The fresh-round action to drive, e.g. `"base"`.
    pub action: String,
    pub seed: u64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            rounds: 10_000,
            stake: Fixed::from_int(1),
            action: "base".to_string(),
            seed: 0,
        }
    }
}

/// Run the batch and aggregate session statistics.
pub fn simulate(config: &EngineConfig, opts: &SimOptions) -> Result<SessionStats, SimError> {
    let workers = num_cpus::get() as u64;
    let chunk_size = opts.rounds.div_ceil(workers.max(1));
    let chunks: Vec<u64> = (0..workers)
        .filter(|i| i * chunk_size < opts.rounds)
        .collect();
    info!(
        "simulating {} rounds of {} across {} workers",
        opts.rounds,
        config.game,
        chunks.len()
    );

    let results: Result<Vec<SessionStats>, SimError> = chunks
        .par_iter()
        .map(|chunk| {
            let start = chunk * chunk_size;
            let rounds = chunk_size.min(opts.rounds - start);
            simulate_chunk(config, opts, *chunk, rounds)
        })
        .collect();

    let mut merged = SessionStats::default();
    for stats in results? {
        merged.merge(&stats);
    }
    debug!("rtp {:.3}% hit rate {:.3}%", merged.rtp(), merged.hit_rate());
    Ok(merged)
}

fn simulate_chunk(
    config: &EngineConfig,
    opts: &SimOptions,
    chunk: u64,
    rounds: u64,
) -> Result<SessionStats, SimError> {
    let mut rng = ChaCha8Rng::seed_from_u64(opts.seed.wrapping_add(chunk.wrapping_mul(0x9E37_79B9)));
    let mut stats = SessionStats::default();

    for _ in 0..rounds {
        let mut params = GameParams {
            action: opts.action.clone(),
            stake: opts.stake,
            ..Default::default()
        };
        let mut round_win = Fixed::ZERO;
        let mut had_feature = false;

        for step in 0.. {
            if step >= MAX_STEPS_PER_ROUND {
                return Err(SimError::RunawayRound(MAX_STEPS_PER_ROUND));
            }
            let mut ctx = PlayContext::new(&mut rng);
            let gamestate = play(config, &params, &mut ctx)?;

            stats.steps += 1;
            stats.total_wager += wagered(&gamestate);
            round_win += gamestate.spin_win;
            if gamestate.action == "cascade" {
                stats.cascade_steps += 1;
            }
            if gamestate.next_actions.len() > 1 {
                had_feature = true;
            }

            let closed = gamestate.round_closed();
            params.action = gamestate.queued_action().unwrap_or_default().to_string();
            params.previous_gamestate = Some(Box::new(gamestate));
            if closed {
                break;
            }
        }

        stats.rounds += 1;
        stats.total_win += round_win;
        if !round_win.is_zero() {
            stats.winning_rounds += 1;
        }
        if had_feature {
            stats.feature_rounds += 1;
        }
        stats.max_round_win = stats.max_round_win.max(round_win);
    }
    Ok(stats)
}

fn wagered(gamestate: &rgs_engine::Gamestate) -> Fixed {
    gamestate
        .transactions
        .iter()
        .filter(|t| t.kind == rgs_engine::TransactionKind::Wager)
        .map(|t| t.amount)
        .sum()
}
