//! Odds Lab Simulation Library
//!
//! Monte Carlo simulators for probability, game-theory and personal-finance
//! puzzles, each paired with its closed-form or exact theoretical value.
//!
//! ## Modules
//!
//! - `process`: two-outcome betting process, simulator and exact expectation
//! - `runner`: many-run cross-validation of a process against its theory
//! - `stats`: mean, population std-dev, median, percentiles
//! - `rng`: injected random sources (seeded, scripted)
//! - `config`: TOML experiment files
//! - Scenarios: `kelly`, `doubling_box`, `gambling`, `compound`,
//!   `chicken_leg`, `lottery`, `signaling`, `game_theory`, `paradoxes`,
//!   `fraction`, `trading`, `euler`
//!
//! ## Usage
//!
//! ```bash
//! # Kelly fraction vs bankroll outcomes
//! cargo run --bin kelly --release
//!
//! # Expected healthy chickens after N chops
//! cargo run --bin chicken_leg --release
//!
//! # Cross-validate a scenario, optionally from an experiment file
//! cargo run --bin crossval --release -- --scenario gambling --runs 5000
//! ```

pub mod error;
pub mod rng;
pub mod stats;
pub mod process;
pub mod runner;
pub mod config;

pub mod kelly;
pub mod doubling_box;
pub mod gambling;
pub mod compound;
pub mod chicken_leg;
pub mod lottery;
pub mod signaling;
pub mod game_theory;
pub mod paradoxes;
pub mod fraction;
pub mod trading;
pub mod euler;

pub use error::{Result, SimError};
pub use process::{
    BettingProcess, ProcessParameters, RuinPolicy, StochasticProcess, Trajectory, TransitionRule,
};
pub use runner::{cross_validate, CrossValidation, RunnerConfig};
