//! Money box that multiplies or empties the stake on a fair coin.
//!
//! Each round the player puts a fraction `f` of their money in the box. On
//! heads the box pays `multiplier` times the stake, on tails the stake is
//! lost. Per-round growth over a win/loss pair is the geometric mean
//! `sqrt((1 + f (m - 1)) (1 - f))`, maximised at the Kelly fraction for
//! `p = 0.5, b = m - 1`.
//!
//! Money that falls below [`DUST`] after a round is zeroed on the spot and
//! the player sits out every remaining round.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, Result, SimError};
use crate::process::{ProcessParameters, RuinPolicy, TransitionRule};
use crate::rng::UniformSource;

/// Money below this is treated as gone.
pub const DUST: f64 = 0.01;

pub fn geometric_mean_return(fraction: f64, multiplier: f64) -> f64 {
    let win = 1.0 + fraction * (multiplier - 1.0);
    let lose = 1.0 - fraction;
    if lose <= 0.0 {
        return 0.0;
    }
    (win * lose).sqrt()
}

fn check_box(initial: f64, fraction: f64, multiplier: f64) -> Result<()> {
    check_non_negative("initial", initial)?;
    check_probability("fraction", fraction)?;
    if !multiplier.is_finite() || multiplier < 1.0 {
        return Err(SimError::invalid(
            "multiplier",
            format!("{multiplier} must be finite and at least 1"),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxOutcome {
    pub final_money: f64,
    pub wins: usize,
}

/// Plays `rounds` fair-coin rounds. No coin is drawn once the money is gone.
pub fn simulate_rounds(
    initial: f64,
    fraction: f64,
    multiplier: f64,
    rounds: usize,
    rng: &mut impl UniformSource,
) -> Result<BoxOutcome> {
    check_box(initial, fraction, multiplier)?;

    let mut money = if initial < DUST { 0.0 } else { initial };
    let mut wins = 0;
    for _ in 0..rounds {
        if money == 0.0 {
            break;
        }
        let stake = money * fraction;
        if rng.next_uniform() < 0.5 {
            money = money - stake + stake * multiplier;
            wins += 1;
        } else {
            money -= stake;
        }
        if money < DUST {
            money = 0.0;
        }
    }

    Ok(BoxOutcome {
        final_money: money,
        wins,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoublingBoxParams {
    pub initial_money: f64,
    pub fraction: f64,
    pub multiplier: f64,
    pub rounds: usize,
}

impl Default for DoublingBoxParams {
    fn default() -> Self {
        Self {
            initial_money: 1_000.0,
            fraction: 0.1,
            multiplier: 3.0,
            rounds: 20,
        }
    }
}

impl DoublingBoxParams {
    pub fn validate(&self) -> Result<()> {
        check_box(self.initial_money, self.fraction, self.multiplier)
    }

    pub fn simulate(&self, rng: &mut impl UniformSource) -> Result<BoxOutcome> {
        simulate_rounds(
            self.initial_money,
            self.fraction,
            self.multiplier,
            self.rounds,
            rng,
        )
    }

    /// The box as a generic process: win factor `1 + f (m - 1)`, zeroed
    /// below [`DUST`].
    pub fn process(&self) -> ProcessParameters {
        ProcessParameters {
            trial_count: self.rounds,
            win_probability: 0.5,
            payoff_multiplier: self.multiplier - 1.0,
            starting_state: self.initial_money,
            rule: TransitionRule::Multiplicative {
                fraction: self.fraction,
                floor: DUST,
            },
            ruin: RuinPolicy::ZeroOut,
        }
    }
}
