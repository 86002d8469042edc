//! Lottery winner wealth decay.
//!
//! A winner invests the prize and spends a monthly budget that inflates
//! along a logistic curve toward `base_expense * expense_multiplier`.
//! Returns may be noisy and large one-off expenses may hit at random.

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, Result};
use crate::rng::UniformSource;

/// Share of the prize that can be withdrawn yearly indefinitely.
pub const SAFE_WITHDRAWAL_RATE: f64 = 0.04;

/// Monthly probability of a one-off expense shock.
pub const SHOCK_PROBABILITY: f64 = 0.02;

/// Annualised volatility of noisy returns.
pub const RETURN_VOLATILITY: f64 = 0.15;

/// Ramp speed used when none is given.
pub const DEFAULT_RAMP_SPEED: f64 = 0.15;

/// Month around which the spending ramp is centred.
const RAMP_MIDPOINT: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WealthParams {
    pub prize: f64,
    pub base_expense: f64,
    pub expense_multiplier: f64,
    pub annual_return: f64,
    pub months: usize,
    /// Steepness of the spending ramp. Zero means [`DEFAULT_RAMP_SPEED`].
    pub ramp_speed: f64,
    pub random_return: bool,
    pub random_shocks: bool,
}

impl Default for WealthParams {
    fn default() -> Self {
        Self {
            prize: 1000.0,
            base_expense: 1.0,
            expense_multiplier: 5.0,
            annual_return: 0.05,
            months: 120,
            ramp_speed: DEFAULT_RAMP_SPEED,
            random_return: false,
            random_shocks: false,
        }
    }
}

impl WealthParams {
    fn validate(&self) -> Result<()> {
        check_non_negative("prize", self.prize)?;
        check_non_negative("base_expense", self.base_expense)?;
        check_non_negative("expense_multiplier", self.expense_multiplier)?;
        check_non_negative("ramp_speed", self.ramp_speed)?;
        if !self.annual_return.is_finite() {
            return Err(crate::error::SimError::invalid(
                "annual_return",
                format!("{} must be finite", self.annual_return),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WealthPath {
    /// Wealth at month 0 and at the end of every month, never negative.
    pub history: Vec<f64>,
    pub total_spent: f64,
    pub total_earned: f64,
    /// First month wealth hit zero.
    pub bankrupt_month: Option<usize>,
    pub peak_wealth: f64,
    pub final_wealth: f64,
}

/// Spending inflation factor at `month`: logistic from ~1 up to `multiplier`.
pub fn spending_factor(multiplier: f64, ramp_speed: f64, month: usize) -> f64 {
    1.0 + (multiplier - 1.0) / (1.0 + (-ramp_speed * (month as f64 - RAMP_MIDPOINT)).exp())
}

pub fn simulate_wealth(params: &WealthParams, rng: &mut impl UniformSource) -> Result<WealthPath> {
    params.validate()?;

    let monthly_return = params.annual_return / 12.0;
    let ramp_speed = if params.ramp_speed > 0.0 {
        params.ramp_speed
    } else {
        DEFAULT_RAMP_SPEED
    };
    let mut wealth = params.prize;
    let mut history = Vec::with_capacity(params.months + 1);
    history.push(wealth);
    let mut total_spent = 0.0;
    let mut total_earned = 0.0;
    let mut bankrupt_month = None;
    let mut peak_wealth = params.prize;

    for month in 1..=params.months {
        if wealth <= 0.0 {
            history.push(0.0);
            continue;
        }

        let rate = if params.random_return {
            monthly_return + rng.next_normal() * RETURN_VOLATILITY / 12f64.sqrt()
        } else {
            monthly_return
        };
        let earnings = wealth * rate;
        total_earned += earnings.max(0.0);

        let ramp = spending_factor(params.expense_multiplier, ramp_speed, month);
        let mut expense = params.base_expense * ramp;
        if params.random_shocks && rng.next_uniform() < SHOCK_PROBABILITY {
            expense += params.prize * (0.03 + rng.next_uniform() * 0.07);
        }
        total_spent += expense;

        wealth += earnings - expense;
        peak_wealth = peak_wealth.max(wealth);
        if wealth <= 0.0 {
            bankrupt_month.get_or_insert(month);
            wealth = 0.0;
        }
        history.push(wealth);
    }

    Ok(WealthPath {
        history,
        total_spent,
        total_earned,
        bankrupt_month,
        peak_wealth,
        final_wealth: wealth,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SafeWithdrawal {
    pub monthly: f64,
    pub yearly: f64,
    /// Whether the return covers the withdrawal rate.
    pub sustainable: bool,
}

/// The 4% rule.
pub fn safe_withdrawal(prize: f64, annual_return: f64) -> SafeWithdrawal {
    let yearly = prize * SAFE_WITHDRAWAL_RATE;
    SafeWithdrawal {
        monthly: yearly / 12.0,
        yearly,
        sustainable: annual_return >= SAFE_WITHDRAWAL_RATE,
    }
}

/// Months until the prize is gone if returns on the initial prize are the
/// only income. `None` when returns cover spending.
pub fn months_to_bankruptcy(prize: f64, monthly_expense: f64, annual_return: f64) -> Option<f64> {
    let net_burn = monthly_expense - prize * annual_return / 12.0;
    if net_burn <= 0.0 {
        None
    } else {
        Some(prize / net_burn)
    }
}
