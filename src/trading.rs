//! Why trading is hard: compounding, drawdowns, and the gap between a
//! rational plan and its emotional execution.
//!
//! Every account starts at [`STARTING_CAPITAL`] and bets a fixed fraction of
//! current capital per trade.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, Result, SimError};
use crate::rng::UniformSource;

pub const STARTING_CAPITAL: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeParams {
    pub win_rate: f64,
    /// Gain per unit risked on a winning trade.
    pub profit_loss_ratio: f64,
    /// Fraction of capital risked per trade.
    pub bet_size: f64,
    pub trades: usize,
}

impl TradeParams {
    fn validate(&self) -> Result<()> {
        check_probability("win_rate", self.win_rate)?;
        check_non_negative("profit_loss_ratio", self.profit_loss_ratio)?;
        check_probability("bet_size", self.bet_size)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeOutcome {
    pub final_capital: f64,
    pub equity: Vec<f64>,
    pub wins: usize,
    pub win_rate: f64,
    /// Largest peak-to-trough fall, in percent of the peak.
    pub max_drawdown: f64,
    /// Return over the starting capital, in percent.
    pub final_return: f64,
}

pub fn simulate_trades(params: &TradeParams, rng: &mut impl UniformSource) -> Result<TradeOutcome> {
    params.validate()?;

    let mut capital = STARTING_CAPITAL;
    let mut equity = Vec::with_capacity(params.trades + 1);
    equity.push(capital);
    let mut wins = 0;
    let mut peak = capital;
    let mut max_drawdown: f64 = 0.0;

    for _ in 0..params.trades {
        if rng.next_uniform() < params.win_rate {
            capital += capital * params.bet_size * params.profit_loss_ratio;
            wins += 1;
        } else {
            capital -= capital * params.bet_size;
        }
        equity.push(capital);

        peak = peak.max(capital);
        if peak > 0.0 {
            max_drawdown = max_drawdown.max((peak - capital) / peak * 100.0);
        }
    }

    Ok(TradeOutcome {
        final_capital: capital,
        equity,
        wins,
        win_rate: if params.trades == 0 {
            0.0
        } else {
            wins as f64 / params.trades as f64
        },
        max_drawdown,
        final_return: (capital - STARTING_CAPITAL) / STARTING_CAPITAL * 100.0,
    })
}

/// Expected profit per unit risked.
pub fn expected_value(win_rate: f64, profit_loss_ratio: f64) -> f64 {
    win_rate * profit_loss_ratio - (1.0 - win_rate)
}

pub fn consecutive_loss_probability(win_rate: f64, losses: u32) -> f64 {
    (1.0 - win_rate).powi(losses as i32)
}

/// Kelly position size `(b p - q) / b`, never negative.
pub fn kelly_size(win_rate: f64, profit_loss_ratio: f64) -> f64 {
    crate::kelly::kelly_fraction(win_rate, profit_loss_ratio)
}

const PLAN_WIN_RATE: f64 = 0.55;
const PLAN_BET_SIZE: f64 = 0.15;
/// Loss multiplier when a stop-loss is ignored.
const MISSED_STOP_PENALTY: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PsychologyOutcome {
    pub rational_capital: f64,
    pub actual_capital: f64,
    pub rational_return: f64,
    pub actual_return: f64,
    /// Return given up to psychology, in percentage points.
    pub psych_cost: f64,
}

/// Runs the same trades twice: once to plan, once as executed by a trader
/// who sizes up after a loss (`emotion`) and sometimes ignores stop-losses
/// (`discipline` is the probability of honouring one).
pub fn simulate_with_psychology(
    discipline: f64,
    emotion: f64,
    trades: usize,
    rng: &mut impl UniformSource,
) -> Result<PsychologyOutcome> {
    check_probability("discipline", discipline)?;
    check_non_negative("emotion", emotion)?;

    let mut rational = STARTING_CAPITAL;
    let mut actual = STARTING_CAPITAL;
    let mut last_was_loss = false;

    for _ in 0..trades {
        let win = rng.next_uniform() < PLAN_WIN_RATE;
        rational *= if win { 1.0 + PLAN_BET_SIZE } else { 1.0 - PLAN_BET_SIZE };

        let mut bet = PLAN_BET_SIZE;
        if last_was_loss {
            bet *= 1.0 + emotion;
        }
        let before = actual;
        if win {
            actual *= 1.0 + bet;
        } else if rng.next_uniform() > discipline {
            actual *= (1.0 - bet * MISSED_STOP_PENALTY).max(0.0);
        } else {
            actual *= 1.0 - bet;
        }
        last_was_loss = actual < before;
    }

    let to_return = |capital: f64| (capital - STARTING_CAPITAL) / STARTING_CAPITAL * 100.0;
    Ok(PsychologyOutcome {
        rational_capital: rational,
        actual_capital: actual,
        rational_return: to_return(rational),
        actual_return: to_return(actual),
        psych_cost: (rational - actual) / STARTING_CAPITAL * 100.0,
    })
}

/// Every reachable final capital after `trades` trades at even payoff:
/// `(wins, 100 (1 + b)^w (1 - b)^(n - w))`.
pub fn outcome_lattice(bet_size: f64, trades: usize) -> Vec<(usize, f64)> {
    (0..=trades)
        .map(|w| {
            let capital = STARTING_CAPITAL
                * (1.0 + bet_size).powi(w as i32)
                * (1.0 - bet_size).powi((trades - w) as i32);
            (w, capital)
        })
        .collect()
}

const LOSS_EDGES: [f64; 4] = [25.0, 50.0, 75.0, 100.0];
const GAIN_EDGES: [f64; 5] = [150.0, 250.0, 500.0, 1000.0, 5000.0];

/// Histogram edges adapted to the observed range: finer below the starting
/// capital, coarser above it. The last edge is one past the ceiling of the
/// maximum so every value falls in some bucket.
pub fn build_bins(results: &[f64]) -> Result<Vec<f64>> {
    if results.is_empty() {
        return Err(SimError::EmptyInput);
    }
    let min = results.iter().cloned().fold(f64::INFINITY, f64::min).floor();
    let max = results.iter().cloned().fold(f64::NEG_INFINITY, f64::max).ceil();

    let mut bins = vec![min];
    if min < STARTING_CAPITAL {
        bins.extend(LOSS_EDGES.iter().filter(|&&edge| edge > min));
    }
    bins.push(STARTING_CAPITAL);
    bins.extend(GAIN_EDGES.iter().filter(|&&edge| edge < max));
    bins.push(max + 1.0);

    bins.sort_by(f64::total_cmp);
    bins.dedup();
    Ok(bins)
}

/// Counts per bucket `[bins[i], bins[i + 1])`.
pub fn distribute(results: &[f64], bins: &[f64]) -> Vec<usize> {
    let mut counts = vec![0; bins.len().saturating_sub(1)];
    for &value in results {
        if let Some(i) = bins.windows(2).position(|w| value >= w[0] && value < w[1]) {
            counts[i] += 1;
        }
    }
    counts
}
