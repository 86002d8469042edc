//! Scenario runner: many independent trajectories, one cross-validation.
//!
//! Run `i` draws from its own generator derived from `(seed, i)`, so the
//! set of terminal values does not depend on whether the runs are executed
//! sequentially or spread over the rayon pool.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, SimError};
use crate::process::StochasticProcess;
use crate::rng::SimRng;
use crate::stats::{aggregate, AggregateStatistics};

/// Upper bound on runs per batch.
pub const MAX_RUNS: usize = 10_000_000;

/// Runner settings.
///
/// # Examples
///
/// ```
/// use odds_lab::runner::RunnerConfig;
///
/// let config = RunnerConfig::builder()
///     .runs(1_000)
///     .tolerance(0.05)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(config.runs(), 1_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunnerConfig {
    runs: usize,
    tolerance: f64,
    seed: u64,
    parallel: bool,
}

impl RunnerConfig {
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runs: 1_000,
            tolerance: 0.05,
            seed: 42,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunnerConfigBuilder {
    runs: Option<usize>,
    tolerance: Option<f64>,
    seed: Option<u64>,
    parallel: Option<bool>,
}

impl RunnerConfigBuilder {
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = Some(runs);
        self
    }

    /// Largest accepted relative error between sample mean and theory.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> Result<RunnerConfig> {
        let defaults = RunnerConfig::default();
        let config = RunnerConfig {
            runs: self.runs.unwrap_or(defaults.runs),
            tolerance: self.tolerance.unwrap_or(defaults.tolerance),
            seed: self.seed.unwrap_or(defaults.seed),
            parallel: self.parallel.unwrap_or(defaults.parallel),
        };
        config.validate()?;
        Ok(config)
    }
}

impl RunnerConfig {
    fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(SimError::invalid("runs", "must be at least 1"));
        }
        if self.runs > MAX_RUNS {
            return Err(SimError::invalid(
                "runs",
                format!("{} exceeds maximum {}", self.runs, MAX_RUNS),
            ));
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(SimError::invalid(
                "tolerance",
                format!("{} must be finite and positive", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Outcome of comparing the sample mean against the theoretical value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrossValidation {
    pub theoretical: f64,
    pub statistics: AggregateStatistics,
    /// `|mean - theoretical| / |theoretical|`, or the absolute difference
    /// when the theoretical value is zero.
    pub relative_error: f64,
    pub tolerance: f64,
}

impl CrossValidation {
    pub fn passed(&self) -> bool {
        self.relative_error <= self.tolerance
    }

    pub fn print(&self) {
        println!("  Theoretical:             {:.4}", self.theoretical);
        self.statistics.print();
        println!("  Relative error:          {:.4}%", self.relative_error * 100.0);
        println!(
            "  Verdict:                 {} (tolerance {:.2}%)",
            if self.passed() { "PASS" } else { "FAIL" },
            self.tolerance * 100.0
        );
    }
}

/// Terminal values of `config.runs()` independent trajectories, in run order.
pub fn terminal_values<P>(process: &P, config: &RunnerConfig) -> Vec<f64>
where
    P: StochasticProcess + Sync,
{
    let seed = config.seed;
    let run = |i: usize| {
        let mut rng = SimRng::for_stream(seed, i as u64);
        process.simulate_once(&mut rng).terminal()
    };

    if config.parallel {
        (0..config.runs).into_par_iter().map(run).collect()
    } else {
        (0..config.runs).map(run).collect()
    }
}

/// Runs the process `config.runs()` times and compares the mean with
/// [`StochasticProcess::theoretical`].
pub fn cross_validate<P>(process: &P, config: &RunnerConfig) -> Result<CrossValidation>
where
    P: StochasticProcess + Sync,
{
    debug!(
        runs = config.runs,
        seed = config.seed,
        parallel = config.parallel,
        "Starting cross-validation"
    );

    let theoretical = process.theoretical();
    let values = terminal_values(process, config);
    let statistics = aggregate(&values)?;

    let diff = (statistics.mean - theoretical).abs();
    let relative_error = if theoretical == 0.0 {
        diff
    } else {
        diff / theoretical.abs()
    };

    let result = CrossValidation {
        theoretical,
        statistics,
        relative_error,
        tolerance: config.tolerance,
    };

    info!(
        theoretical,
        mean = statistics.mean,
        std_dev = statistics.std_dev,
        relative_error,
        passed = result.passed(),
        "Cross-validation finished"
    );

    Ok(result)
}
