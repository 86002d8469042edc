//! Kelly criterion: optimal fraction of wealth to stake on a favourable bet.
//!
//! With win probability `p` and net odds `b` (a win pays `b` per unit
//! staked), the growth-optimal fraction is
//!
//! ```text
//! f* = p - (1 - p) / b
//! ```
//!
//! Betting more than `f*` lowers the long-run geometric growth rate; betting
//! more than `2 f*` makes it negative even though every bet has positive
//! expected value.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, Result};
use crate::process::{ProcessParameters, RuinPolicy, TransitionRule};
use crate::rng::UniformSource;
use crate::stats::median;

/// Below this bankroll a player is considered bankrupt and stops betting.
pub const BANKRUPT_BELOW: f64 = 1.0;

/// Growth-optimal stake fraction, never negative.
pub fn kelly_fraction(p: f64, b: f64) -> f64 {
    (p - (1.0 - p) / b).max(0.0)
}

/// Expected profit per unit staked.
pub fn expected_value(p: f64, b: f64) -> f64 {
    p * b - (1.0 - p)
}

/// Expected log-growth per bet when staking fraction `f`.
pub fn geometric_growth(p: f64, b: f64, f: f64) -> f64 {
    if f <= 0.0 {
        return 0.0;
    }
    if f >= 1.0 {
        return f64::NEG_INFINITY;
    }
    p * (1.0 + f * b).ln() + (1.0 - p) * (1.0 - f).ln()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KellyBet {
    pub initial_money: f64,
    pub win_probability: f64,
    pub odds: f64,
    pub fraction: f64,
    pub rounds: usize,
}

impl Default for KellyBet {
    fn default() -> Self {
        Self {
            initial_money: 10_000.0,
            win_probability: 0.51,
            odds: 1.0,
            fraction: 0.02,
            rounds: 500,
        }
    }
}

impl KellyBet {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("initial_money", self.initial_money)?;
        check_probability("win_probability", self.win_probability)?;
        check_non_negative("odds", self.odds)?;
        check_probability("fraction", self.fraction)?;
        Ok(())
    }

    /// The same bet as a generic multiplicative process.
    pub fn process(&self) -> ProcessParameters {
        ProcessParameters {
            trial_count: self.rounds,
            win_probability: self.win_probability,
            payoff_multiplier: self.odds,
            starting_state: self.initial_money,
            rule: TransitionRule::Multiplicative {
                fraction: self.fraction,
                floor: BANKRUPT_BELOW,
            },
            ruin: RuinPolicy::Halt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KellyOutcome {
    pub money: f64,
    pub wins: usize,
    pub rounds: usize,
}

/// Plays `bet.rounds` rounds, stopping early once the bankroll drops below 1.
pub fn simulate(bet: &KellyBet, rng: &mut impl UniformSource) -> Result<KellyOutcome> {
    bet.validate()?;
    let mut money = bet.initial_money;
    let mut wins = 0;

    for _ in 0..bet.rounds {
        if money < BANKRUPT_BELOW {
            break;
        }
        let stake = money * bet.fraction;
        if rng.next_uniform() < bet.win_probability {
            money += stake * bet.odds;
            wins += 1;
        } else {
            money -= stake;
        }
    }

    Ok(KellyOutcome {
        money,
        wins,
        rounds: bet.rounds,
    })
}

/// Replays a fixed win/loss sequence, so strategies can be compared on
/// identical luck.
pub fn simulate_with_sequence(initial: f64, odds: f64, fraction: f64, outcomes: &[bool]) -> f64 {
    let mut money = initial;
    for &win in outcomes {
        if money < BANKRUPT_BELOW {
            break;
        }
        let stake = money * fraction;
        money = if win { money + stake * odds } else { money - stake };
    }
    money
}

/// Final bankrolls of `players` independent players.
pub fn simulate_players(
    bet: &KellyBet,
    players: usize,
    rng: &mut impl UniformSource,
) -> Result<Vec<f64>> {
    (0..players)
        .map(|_| simulate(bet, rng).map(|outcome| outcome.money))
        .collect()
}

/// Summary of a batch of players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub mean: f64,
    pub median: f64,
    pub bankrupt: usize,
    pub min: f64,
    pub max: f64,
}

pub fn summarize(finals: &[f64]) -> Result<PlayerSummary> {
    let stats = crate::stats::aggregate(finals)?;
    Ok(PlayerSummary {
        mean: stats.mean,
        median: median(finals)?,
        bankrupt: finals.iter().filter(|&&m| m < BANKRUPT_BELOW).count(),
        min: stats.min,
        max: stats.max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedSource, SimRng};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_kelly_fraction() {
        assert_abs_diff_eq!(kelly_fraction(0.51, 1.0), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(0.6, 1.0), 0.20, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(0.4, 2.0), 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(0.5, 2.0), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(0.4, 3.0), 0.20, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(0.7, 0.5), 0.10, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(1.0, 1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(kelly_fraction(0.5, 100.0), 0.495, epsilon = 1e-12);
    }

    #[test]
    fn test_kelly_never_negative() {
        assert_eq!(kelly_fraction(0.5, 1.0), 0.0);
        assert_eq!(kelly_fraction(0.3, 1.0), 0.0);
        assert_eq!(kelly_fraction(0.0, 1.0), 0.0);
        // b = 0: nothing to win
        assert_eq!(kelly_fraction(0.5, 0.0), 0.0);
    }

    #[test]
    fn test_kelly_equivalent_forms() {
        let (p, b) = (0.55, 1.5);
        let f = kelly_fraction(p, b);
        assert_abs_diff_eq!(f, (p * (b + 1.0) - 1.0) / b, epsilon = 1e-12);
        assert_abs_diff_eq!(f, (p * b - (1.0 - p)) / b, epsilon = 1e-12);
    }

    #[test]
    fn test_expected_value() {
        assert_abs_diff_eq!(expected_value(0.51, 1.0), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(expected_value(0.5, 1.0), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(expected_value(0.49, 1.0), -0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_kelly_maximizes_growth() {
        let (p, b) = (0.51, 1.0);
        let f = kelly_fraction(p, b);
        let g = geometric_growth(p, b, f);

        assert!(g > geometric_growth(p, b, f / 2.0));
        assert!(g > geometric_growth(p, b, f * 2.0));
        assert!(geometric_growth(p, b, f * 3.0) < 0.0);
        assert_eq!(geometric_growth(p, b, 0.0), 0.0);
        assert_eq!(geometric_growth(p, b, 1.0), f64::NEG_INFINITY);
    }

    #[test]
    fn test_zero_fraction_keeps_money() {
        let bet = KellyBet {
            fraction: 0.0,
            rounds: 100,
            ..KellyBet::default()
        };
        let outcome = simulate(&bet, &mut SimRng::from_seed(1)).unwrap();
        assert_eq!(outcome.money, 10_000.0);
        assert!(outcome.wins <= 100);
    }

    #[test]
    fn test_bankrupt_player_stops() {
        let bet = KellyBet {
            initial_money: 8.0,
            fraction: 0.5,
            rounds: 10,
            ..KellyBet::default()
        };
        let mut rng = ScriptedSource::constant(0.9);
        let outcome = simulate(&bet, &mut rng).unwrap();
        // 8 -> 4 -> 2 -> 1 -> 0.5, then no more bets
        assert_eq!(outcome.money, 0.5);
        assert_eq!(outcome.wins, 0);
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_rejects_invalid_bet() {
        let bet = KellyBet {
            win_probability: 1.2,
            ..KellyBet::default()
        };
        assert!(simulate(&bet, &mut SimRng::from_seed(1)).is_err());
    }

    #[test]
    fn test_sequence_comparison() {
        let mut rng = SimRng::from_seed(7);
        let outcomes: Vec<bool> = (0..1000).map(|_| rng.next_uniform() < 0.51).collect();
        let kelly = simulate_with_sequence(10_000.0, 1.0, 0.02, &outcomes);
        assert!(kelly > 0.0);

        let alternating = [true, false, true, false];
        let money = simulate_with_sequence(10_000.0, 1.0, 0.5, &alternating);
        assert_abs_diff_eq!(money, 10_000.0 * 0.75 * 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_overbetting_goes_bankrupt_more() {
        let mut rng = SimRng::from_seed(42);
        let kelly = KellyBet::default();
        let reckless = KellyBet {
            fraction: 0.10,
            ..kelly
        };

        let kelly_summary = summarize(&simulate_players(&kelly, 500, &mut rng).unwrap()).unwrap();
        let reckless_summary =
            summarize(&simulate_players(&reckless, 500, &mut rng).unwrap()).unwrap();

        assert!(kelly_summary.bankrupt < 25);
        assert!(reckless_summary.bankrupt >= kelly_summary.bankrupt);
        assert!(kelly_summary.median > reckless_summary.median);
    }

    #[test]
    fn test_median_grows_over_long_run() {
        let bet = KellyBet {
            rounds: 1000,
            ..KellyBet::default()
        };
        let finals = simulate_players(&bet, 300, &mut SimRng::from_seed(3)).unwrap();
        assert!(summarize(&finals).unwrap().median > 10_000.0);
    }

    #[test]
    fn test_process_mapping() {
        let params = KellyBet::default().process();
        assert_eq!(params.trial_count, 500);
        assert_eq!(params.ruin, RuinPolicy::Halt);
        assert!(matches!(
            params.rule,
            TransitionRule::Multiplicative { fraction, floor } if fraction == 0.02 && floor == 1.0
        ));
    }
}
