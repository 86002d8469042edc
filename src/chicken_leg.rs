//! Chopping legs off a flock of chickens.
//!
//! `n` chickens, `n` chops. Each chop picks a chicken uniformly among those
//! that still have at least one leg and removes a leg. The expected share of
//! chickens left with both legs converges to [`LIMIT_RATIO`] as `n` grows.

use serde::Serialize;

use crate::process::{StochasticProcess, Trajectory};
use crate::rng::UniformSource;

/// Limit of `E[healthy] / n` for large flocks.
pub const LIMIT_RATIO: f64 = 0.317_844_43;

/// Above this flock size [`theory`] switches from the recursion to the limit.
pub const EXACT_THEORY_MAX: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flock {
    pub healthy: usize,
    pub one_leg: usize,
    pub no_leg: usize,
}

impl Flock {
    pub fn new(n: usize) -> Self {
        Self {
            healthy: n,
            one_leg: 0,
            no_leg: 0,
        }
    }

    pub fn with_legs(&self) -> usize {
        self.healthy + self.one_leg
    }

    pub fn legs(&self) -> usize {
        2 * self.healthy + self.one_leg
    }

    /// Removes one leg from a chicken drawn uniformly among those with legs.
    /// Returns `false` when no chicken has a leg left.
    fn chop(&mut self, rng: &mut impl UniformSource) -> bool {
        let with_legs = self.with_legs();
        if with_legs == 0 {
            return false;
        }
        if rng.next_uniform() * (with_legs as f64) < self.healthy as f64 {
            self.healthy -= 1;
            self.one_leg += 1;
        } else {
            self.one_leg -= 1;
            self.no_leg += 1;
        }
        true
    }
}

/// One round of `n` chops on a fresh flock of `n`.
pub fn simulate(n: usize, rng: &mut impl UniformSource) -> Flock {
    let mut flock = Flock::new(n);
    for _ in 0..n {
        if !flock.chop(rng) {
            break;
        }
    }
    flock
}

/// Expected number of healthy chickens after `n` chops, by propagating the
/// expected counts one chop at a time.
pub fn exact_theory(n: usize) -> f64 {
    let mut healthy = n as f64;
    let mut one_leg = 0.0;

    for _ in 0..n {
        let total = healthy + one_leg;
        if total < 1e-10 {
            break;
        }
        let p_healthy = healthy / total;
        let p_one_leg = one_leg / total;
        healthy -= p_healthy;
        one_leg += p_healthy - p_one_leg;
    }
    healthy
}

/// Expected healthy count: exact for small flocks, `n * LIMIT_RATIO` beyond.
pub fn theory(n: usize) -> f64 {
    if n <= EXACT_THEORY_MAX {
        exact_theory(n)
    } else {
        n as f64 * LIMIT_RATIO
    }
}

/// The experiment as a process whose state is the healthy count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChickenLeg {
    pub n: usize,
}

impl StochasticProcess for ChickenLeg {
    fn simulate_once(&self, rng: &mut impl UniformSource) -> Trajectory {
        let mut flock = Flock::new(self.n);
        let mut states = Vec::with_capacity(self.n + 1);
        states.push(flock.healthy as f64);
        let mut absorbed_at = None;

        for step in 1..=self.n {
            if !flock.chop(rng) {
                absorbed_at = Some(step - 1);
                break;
            }
            states.push(flock.healthy as f64);
        }

        Trajectory {
            states,
            wins: self.n - flock.healthy,
            absorbed_at,
        }
    }

    fn theoretical(&self) -> f64 {
        theory(self.n)
    }
}
