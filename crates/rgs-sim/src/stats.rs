//! Session statistics

use serde::{Deserialize, Serialize};

use rgs_core::Fixed;

/// Aggregated results of a batch of simulated rounds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub rounds: u64,
    /// Individual resolution steps, continuations included.
    pub steps: u64,
    pub total_wager: Fixed,
    pub total_win: Fixed,
    /// Rounds that paid anything.
    pub winning_rounds: u64,
    /// Rounds that queued feature actions beyond the base step.
    pub feature_rounds: u64,
    pub cascade_steps: u64,
    pub max_round_win: Fixed,
}

impl SessionStats {
    /// Return-to-player percentage. Display only.
    pub fn rtp(&self) -> f64 {
        if self.total_wager.is_zero() {
            0.0
        } else {
            self.total_win.to_f64() / self.total_wager.to_f64() * 100.0
        }
    }

    /// Share of rounds that won anything. Display only.
    pub fn hit_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.winning_rounds as f64 / self.rounds as f64 * 100.0
        }
    }

    /// Fold another batch into this one.
    pub fn merge(&mut self, other: &SessionStats) {
        self.rounds += other.rounds;
        self.steps += other.steps;
        self.total_wager += other.total_wager;
        self.total_win += other.total_win;
        self.winning_rounds += other.winning_rounds;
        self.feature_rounds += other.feature_rounds;
        self.cascade_steps += other.cascade_steps;
        self.max_round_win = self.max_round_win.max(other.max_round_win);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rtp_and_hit_rate() {
        let stats = SessionStats {
            rounds: 100,
            total_wager: Fixed::from_int(100),
            total_win: Fixed::from_int(96),
            winning_rounds: 30,
            ..Default::default()
        };
        assert!((stats.rtp() - 96.0).abs() < 1e-9);
        assert!((stats.hit_rate() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge() {
        let mut a = SessionStats {
            rounds: 10,
            total_wager: Fixed::from_int(10),
            max_round_win: Fixed::from_int(4),
            ..Default::default()
        };
        let b = SessionStats {
            rounds: 5,
            total_wager: Fixed::from_int(5),
            max_round_win: Fixed::from_int(9),
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.rounds, 15);
        assert_eq!(a.total_wager, Fixed::from_int(15));
        assert_eq!(a.max_round_win, Fixed::from_int(9));
    }
}
