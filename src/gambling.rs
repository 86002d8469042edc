//! Even-money betting against a house that rakes the winner.
//!
//! A win pays `bet * (1 - rake)`, a loss costs the full `bet`, so even a fair
//! coin has expectation `-bet * rake / 2` per round and the gambler drifts
//! toward ruin.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, Result, SimError};
use crate::process::{ProcessParameters, RuinPolicy, TransitionRule};
use crate::rng::UniformSource;

/// Money after one bet. A player who cannot cover `bet` does not play.
pub fn place_bet(money: f64, bet: f64, rake: f64, win: bool) -> f64 {
    if money < bet {
        return money;
    }
    if win {
        money + bet * (1.0 - rake)
    } else {
        money - bet
    }
}

/// Expected profit of one bet.
pub fn expected_value(bet: f64, rake: f64, win_probability: f64) -> f64 {
    win_probability * bet * (1.0 - rake) - (1.0 - win_probability) * bet
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamblingParams {
    pub initial_money: f64,
    pub bet: f64,
    pub rake: f64,
    pub rounds: usize,
    pub win_probability: f64,
}

impl Default for GamblingParams {
    fn default() -> Self {
        Self {
            initial_money: 1_000.0,
            bet: 100.0,
            rake: 0.05,
            rounds: 50,
            win_probability: 0.5,
        }
    }
}

impl GamblingParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("initial_money", self.initial_money)?;
        if !self.bet.is_finite() || self.bet <= 0.0 {
            return Err(SimError::invalid("bet", format!("{} must be positive", self.bet)));
        }
        check_probability("rake", self.rake)?;
        check_probability("win_probability", self.win_probability)?;
        Ok(())
    }

    pub fn process(&self) -> ProcessParameters {
        ProcessParameters {
            trial_count: self.rounds,
            win_probability: self.win_probability,
            payoff_multiplier: 1.0 - self.rake,
            starting_state: self.initial_money,
            rule: TransitionRule::Additive { stake: self.bet },
            ruin: RuinPolicy::Halt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub final_money: f64,
    pub rounds_played: usize,
    /// Money before the first round and after every round played.
    pub history: Vec<f64>,
}

/// Plays up to `params.rounds` rounds, stopping when the player can no
/// longer cover the bet.
pub fn play_rounds(params: &GamblingParams, rng: &mut impl UniformSource) -> Result<Session> {
    params.validate()?;
    let mut money = params.initial_money;
    let mut history = vec![money];

    for _ in 0..params.rounds {
        if money < params.bet {
            break;
        }
        let win = rng.next_uniform() < params.win_probability;
        money = place_bet(money, params.bet, params.rake, win);
        history.push(money);
    }

    Ok(Session {
        final_money: money,
        rounds_played: history.len() - 1,
        history,
    })
}
