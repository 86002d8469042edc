//! Two-outcome stochastic process: simulator and theoretical value.
//!
//! A process starts from `starting_state` and runs `trial_count` steps. At
//! each step one uniform draw is compared against `win_probability` and the
//! [`TransitionRule`] is applied. Once the state enters its absorbing region
//! the [`RuinPolicy`] decides what the rest of the trajectory looks like.
//!
//! ## Theoretical value
//!
//! Both rules are path-independent: the state after `w` wins and `l`
//! losses only depends on `(w, l)`. The expected terminal value is therefore
//! computed by sweeping probability mass over the `(w, l)` lattice,
//! applying the same absorption test as the simulator. Tails whose share of
//! the expectation is below `1e-18` are dropped. When absorption
//! cannot happen within `trial_count` steps the sweep collapses to a closed
//! form:
//!
//! - Additive: `E[S_n] = S_0 + n * (p * stake * b - (1 - p) * stake)`
//! - Multiplicative: `E[S_n] = S_0 * (p * (1 + f b) + (1 - p) * (1 - f))^n`

use serde::{Deserialize, Serialize};

use crate::error::{check_non_negative, check_probability, Result, SimError};
use crate::rng::UniformSource;

/// Lattice cells weighing less than this share of the heaviest cell in
/// their row are dropped from the expectation sweep.
const NEGLIGIBLE_WEIGHT: f64 = 1e-18;

/// Per-step state transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionRule {
    /// Fixed stake: win adds `stake * b`, loss subtracts `stake`.
    /// Absorbing once the state can no longer cover the stake.
    Additive { stake: f64 },
    /// Bet a fraction of the current state: win multiplies by `1 + f b`,
    /// loss by `1 - f`. Absorbing below `floor`.
    Multiplicative { fraction: f64, floor: f64 },
}

/// What happens once the state is absorbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuinPolicy {
    /// The trajectory ends at the absorbing step.
    #[default]
    Halt,
    /// Remaining steps repeat the terminal value.
    Freeze,
    /// State is set to zero, remaining steps repeat zero.
    ZeroOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessParameters {
    pub trial_count: usize,
    pub win_probability: f64,
    pub payoff_multiplier: f64,
    pub starting_state: f64,
    pub rule: TransitionRule,
    #[serde(default)]
    pub ruin: RuinPolicy,
}

impl ProcessParameters {
    pub fn validate(&self) -> Result<()> {
        check_probability("win_probability", self.win_probability)?;
        check_non_negative("payoff_multiplier", self.payoff_multiplier)?;
        check_non_negative("starting_state", self.starting_state)?;
        match self.rule {
            TransitionRule::Additive { stake } => {
                if !stake.is_finite() || stake <= 0.0 {
                    return Err(SimError::invalid(
                        "stake",
                        format!("{stake} must be finite and positive"),
                    ));
                }
            }
            TransitionRule::Multiplicative { fraction, floor } => {
                check_probability("fraction", fraction)?;
                check_non_negative("floor", floor)?;
            }
        }
        Ok(())
    }

    fn apply(&self, state: f64, won: bool) -> f64 {
        let next = match (self.rule, won) {
            (TransitionRule::Additive { stake }, true) => state + stake * self.payoff_multiplier,
            (TransitionRule::Additive { stake }, false) => state - stake,
            (TransitionRule::Multiplicative { fraction, .. }, true) => {
                state * (1.0 + fraction * self.payoff_multiplier)
            }
            (TransitionRule::Multiplicative { fraction, .. }, false) => state * (1.0 - fraction),
        };
        next.max(0.0)
    }

    fn is_absorbed(&self, state: f64) -> bool {
        match self.rule {
            TransitionRule::Additive { stake } => state < stake,
            TransitionRule::Multiplicative { floor, .. } => state < floor,
        }
    }

    fn settle(&self, state: f64) -> f64 {
        match self.ruin {
            RuinPolicy::ZeroOut => 0.0,
            RuinPolicy::Halt | RuinPolicy::Freeze => state,
        }
    }

    /// State after `wins` wins and `losses` losses in any order.
    fn lattice_state(&self, wins: usize, losses: usize) -> f64 {
        let state = match self.rule {
            TransitionRule::Additive { stake } => {
                self.starting_state + wins as f64 * stake * self.payoff_multiplier
                    - losses as f64 * stake
            }
            TransitionRule::Multiplicative { fraction, .. } => {
                self.starting_state
                    * (1.0 + fraction * self.payoff_multiplier).powi(wins as i32)
                    * (1.0 - fraction).powi(losses as i32)
            }
        };
        state.max(0.0)
    }

    /// Expected terminal value when no path is absorbed.
    fn closed_form(&self) -> f64 {
        let p = self.win_probability;
        let n = self.trial_count;
        match self.rule {
            TransitionRule::Additive { stake } => {
                self.starting_state
                    + n as f64 * (p * stake * self.payoff_multiplier - (1.0 - p) * stake)
            }
            TransitionRule::Multiplicative { fraction, .. } => {
                let growth =
                    p * (1.0 + fraction * self.payoff_multiplier) + (1.0 - p) * (1.0 - fraction);
                self.starting_state * growth.powi(n as i32)
            }
        }
    }

    /// Whether some path of `trial_count` steps can reach the absorbing region.
    ///
    /// Wins never lower the state, so the all-loss path is the lowest one.
    fn absorption_reachable(&self) -> bool {
        if self.is_absorbed(self.starting_state) {
            return true;
        }
        self.win_probability < 1.0 && self.is_absorbed(self.lattice_state(0, self.trial_count))
    }

    /// Expectation sweep over the (wins, losses) lattice.
    ///
    /// Cell `w` of row `t` holds the probability of `w` wins in `t` steps
    /// without prior absorption, and the state there. States are advanced
    /// with the same per-step arithmetic as the simulator. Only the window of
    /// cells carrying at least [`NEGLIGIBLE_WEIGHT`] of the row's largest
    /// `mass * state` is kept, so long horizons cost `O(n sqrt(n))`.
    fn expectation_sweep(&self) -> f64 {
        if self.is_absorbed(self.starting_state) {
            return self.settle(self.starting_state);
        }

        let p = self.win_probability;
        let q = 1.0 - p;
        let n = self.trial_count;

        let mut mass = vec![0.0; n + 1];
        let mut state = vec![0.0; n + 1];
        mass[0] = 1.0;
        state[0] = self.starting_state;
        let (mut lo, mut hi) = (0, 0);
        let mut absorbed_value = 0.0;

        for _ in 0..n {
            // In place, top down: cell w + 1 takes the wins of cell w.
            state[hi + 1] = self.apply(state[hi], true);
            mass[hi + 1] = 0.0;
            for w in (lo..=hi).rev() {
                mass[w + 1] += mass[w] * p;
                mass[w] *= q;
                state[w] = self.apply(state[w], false);
            }
            hi += 1;

            let mut peak: f64 = 0.0;
            for w in lo..=hi {
                if mass[w] == 0.0 {
                    continue;
                }
                if self.is_absorbed(state[w]) {
                    absorbed_value += mass[w] * self.settle(state[w]);
                    mass[w] = 0.0;
                } else {
                    peak = peak.max(mass[w] * state[w]);
                }
            }
            if peak == 0.0 {
                // Every live state is zero and stays zero.
                return absorbed_value;
            }

            let cutoff = peak * NEGLIGIBLE_WEIGHT;
            while lo < hi && mass[lo] * state[lo] < cutoff {
                mass[lo] = 0.0;
                lo += 1;
            }
            while hi > lo && mass[hi] * state[hi] < cutoff {
                mass[hi] = 0.0;
                hi -= 1;
            }
        }

        let surviving: f64 = (lo..=hi).map(|w| mass[w] * state[w]).sum();
        absorbed_value + surviving
    }
}

/// One simulated run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    /// State after each elapsed step, starting with the initial state.
    pub states: Vec<f64>,
    /// Number of winning steps.
    pub wins: usize,
    /// Step at which the absorbing region was entered, if it was.
    pub absorbed_at: Option<usize>,
}

impl Trajectory {
    pub fn terminal(&self) -> f64 {
        self.states.last().copied().unwrap_or(0.0)
    }

    /// Number of steps actually drawn.
    pub fn steps(&self) -> usize {
        self.states.len().saturating_sub(1)
    }
}

/// A process that can be both sampled and predicted.
///
/// The runner is generic over this trait; each scenario decides how its
/// state evolves and what its expected terminal value is.
pub trait StochasticProcess {
    fn simulate_once(&self, rng: &mut impl UniformSource) -> Trajectory;

    /// Expected terminal value. Must be a pure function of the process.
    fn theoretical(&self) -> f64;
}

/// [`ProcessParameters`] that passed validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BettingProcess {
    params: ProcessParameters,
}

impl BettingProcess {
    pub fn new(params: ProcessParameters) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ProcessParameters {
        &self.params
    }
}

impl StochasticProcess for BettingProcess {
    fn simulate_once(&self, rng: &mut impl UniformSource) -> Trajectory {
        let params = &self.params;
        let mut state = params.starting_state;
        let mut states = Vec::with_capacity(params.trial_count + 1);
        let mut wins = 0;
        let mut absorbed_at = None;

        if params.is_absorbed(state) {
            state = params.settle(state);
            absorbed_at = Some(0);
        }
        states.push(state);

        for step in 1..=params.trial_count {
            if absorbed_at.is_some() {
                match params.ruin {
                    RuinPolicy::Halt => break,
                    RuinPolicy::Freeze | RuinPolicy::ZeroOut => {
                        states.push(state);
                        continue;
                    }
                }
            }

            let won = rng.next_uniform() < params.win_probability;
            if won {
                wins += 1;
            }
            state = params.apply(state, won);
            if params.is_absorbed(state) {
                state = params.settle(state);
                absorbed_at = Some(step);
            }
            states.push(state);
        }

        Trajectory {
            states,
            wins,
            absorbed_at,
        }
    }

    fn theoretical(&self) -> f64 {
        if self.params.absorption_reachable() {
            self.params.expectation_sweep()
        } else {
            self.params.closed_form()
        }
    }
}

/// Validates `params` and samples one trajectory.
pub fn simulate_once(
    params: &ProcessParameters,
    rng: &mut impl UniformSource,
) -> Result<Trajectory> {
    Ok(BettingProcess::new(*params)?.simulate_once(rng))
}

/// Validates `params` and returns the expected terminal value.
pub fn compute_theoretical(params: &ProcessParameters) -> Result<f64> {
    Ok(BettingProcess::new(*params)?.theoretical())
}
