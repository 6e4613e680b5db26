//! Gamble generator
//!
//! Double-or-nothing resolution of an eligible finished freespin round. The
//! wager is the amount risked — the previous round's win — and the payout
//! is twice the risk or nothing, on an even-odds draw. Eligibility is
//! validated by the orchestrator before any draw.

use log::debug;

use rgs_core::{Fixed, uniform_index};

use crate::definition::Payout;
use crate::error::EngineError;
use crate::gamestate::Prize;
use crate::play::PlayContext;

use super::{RoundDraft, RoundInput};

pub fn gamble_round(
    input: &RoundInput<'_>,
    ctx: &mut PlayContext<'_>,
) -> Result<RoundDraft, EngineError> {
    let prev = input
        .params
        .previous()
        .ok_or_else(|| EngineError::InvalidGamble("no previous round".into()))?;
    let risk = prev.cumulative_win;
    if risk.is_zero() {
        return Err(EngineError::InvalidGamble("nothing to gamble".into()));
    }

    let won = uniform_index(&mut *ctx.rng, 2) == 0;
    debug!("gamble of {risk}: {}", if won { "won" } else { "lost" });

    let payout = if won { risk + risk } else { Fixed::ZERO };
    let prize = Prize {
        payout: Payout {
            symbol: 0,
            count: 0,
            multiplier: if won { Fixed::from_int(2) } else { Fixed::ZERO },
        },
        index: if won { "gamble:win".into() } else { "gamble:lose".into() },
        multiplier: Fixed::ONE,
        symbol_positions: Vec::new(),
        win_line: None,
    };

    Ok(RoundDraft {
        symbol_grid: prev.symbol_grid.clone(),
        stop_list: prev.stop_list.clone(),
        prizes: vec![prize],
        relative_payout: Fixed::ZERO,
        multiplier: Fixed::ONE,
        wager_override: Some(risk),
        payout_override: Some(payout),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::gamestate::{GameParams, Gamestate};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn gamble_params(win: Fixed) -> GameParams {
        GameParams {
            action: "gamble".into(),
            previous_gamestate: Some(Box::new(Gamestate {
                action: "freespin".into(),
                cumulative_win: win,
                next_actions: vec!["finish".into()],
                ..Default::default()
            })),
            ..Default::default()
        }
    }

    #[test]
    fn test_gamble_resolves_double_or_nothing() {
        let config = EngineConfig::default();
        let def = crate::definition::EngineDefinition::default();
        let params = gamble_params(Fixed::from_int(10));
        let input = RoundInput {
            config: &config,
            def: &def,
            params: &params,
            action: "gamble",
        };
        let mut rng = StdRng::seed_from_u64(77);
        let mut ctx = PlayContext::new(&mut rng);
        let draft = gamble_round(&input, &mut ctx).unwrap();
        assert_eq!(draft.wager_override, Some(Fixed::from_int(10)));
        let payout = draft.payout_override.unwrap();
        assert!(payout == Fixed::ZERO || payout == Fixed::from_int(20));
    }

    #[test]
    fn test_gamble_requires_winnings() {
        let config = EngineConfig::default();
        let def = crate::definition::EngineDefinition::default();
        let params = gamble_params(Fixed::ZERO);
        let input = RoundInput {
            config: &config,
            def: &def,
            params: &params,
            action: "gamble",
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut ctx = PlayContext::new(&mut rng);
        assert!(matches!(
            gamble_round(&input, &mut ctx),
            Err(EngineError::InvalidGamble(_))
        ));
    }
}
