//! Experiment configuration.
//!
//! An experiment file picks one scenario, its parameters and the runner
//! settings:
//!
//! ```toml
//! scenario = "kelly"
//!
//! [runner]
//! runs = 2000
//! seed = 7
//! parallel = true
//!
//! [kelly]
//! win_probability = 0.6
//! fraction = 0.2
//! ```
//!
//! Every section is optional and falls back to the scenario defaults.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::chicken_leg::ChickenLeg;
use crate::doubling_box::DoublingBoxParams;
use crate::error::SimError;
use crate::gambling::GamblingParams;
use crate::kelly::KellyBet;
use crate::process::BettingProcess;
use crate::runner::{self, CrossValidation, RunnerConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(
        "Unknown scenario: {0}. Must be one of: kelly, gambling, doubling-box, chicken-leg"
    )]
    UnknownScenario(String),

    #[error(transparent)]
    Invalid(#[from] SimError),
}

/// Scenarios that can be cross-validated against their theoretical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    #[default]
    Kelly,
    Gambling,
    DoublingBox,
    ChickenLeg,
}

impl ScenarioKind {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Kelly,
            Self::Gambling,
            Self::DoublingBox,
            Self::ChickenLeg,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Kelly => "kelly",
            Self::Gambling => "gambling",
            Self::DoublingBox => "doubling-box",
            Self::ChickenLeg => "chicken-leg",
        }
    }
}

impl FromStr for ScenarioKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase().replace('_', "-");
        Self::all()
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or(ConfigError::UnknownScenario(s))
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runner settings as written in the file.
///
/// Validated by [`ExperimentConfig::runner_config`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerSection {
    pub runs: usize,
    pub tolerance: f64,
    pub seed: u64,
    pub parallel: bool,
}

impl Default for RunnerSection {
    fn default() -> Self {
        let defaults = RunnerConfig::default();
        Self {
            runs: defaults.runs(),
            tolerance: defaults.tolerance(),
            seed: defaults.seed(),
            parallel: defaults.parallel(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChickenLegParams {
    pub chickens: usize,
}

impl Default for ChickenLegParams {
    fn default() -> Self {
        Self { chickens: 100 }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub scenario: ScenarioKind,
    pub runner: RunnerSection,
    pub kelly: KellyBet,
    pub gambling: GamblingParams,
    pub doubling_box: DoublingBoxParams,
    pub chicken_leg: ChickenLegParams,
}

impl ExperimentConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ExperimentConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading experiment config");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Checks the runner section and the selected scenario's parameters.
    pub fn validate(&self) -> Result<(), SimError> {
        self.runner_config()?;
        match self.scenario {
            ScenarioKind::Kelly => self.kelly.validate(),
            ScenarioKind::Gambling => self.gambling.validate(),
            ScenarioKind::DoublingBox => self.doubling_box.validate(),
            ScenarioKind::ChickenLeg => Ok(()),
        }
    }

    pub fn runner_config(&self) -> Result<RunnerConfig, SimError> {
        RunnerConfig::builder()
            .runs(self.runner.runs)
            .tolerance(self.runner.tolerance)
            .seed(self.runner.seed)
            .parallel(self.runner.parallel)
            .build()
    }

    /// Cross-validates the selected scenario.
    pub fn cross_validate(&self) -> Result<CrossValidation, SimError> {
        let config = self.runner_config()?;
        match self.scenario {
            ScenarioKind::Kelly => {
                self.kelly.validate()?;
                runner::cross_validate(&BettingProcess::new(self.kelly.process())?, &config)
            }
            ScenarioKind::Gambling => {
                self.gambling.validate()?;
                runner::cross_validate(&BettingProcess::new(self.gambling.process())?, &config)
            }
            ScenarioKind::DoublingBox => {
                self.doubling_box.validate()?;
                let process = BettingProcess::new(self.doubling_box.process())?;
                runner::cross_validate(&process, &config)
            }
            ScenarioKind::ChickenLeg => runner::cross_validate(
                &ChickenLeg {
                    n: self.chicken_leg.chickens,
                },
                &config,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ExperimentConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExperimentConfig::default());
        assert_eq!(config.scenario, ScenarioKind::Kelly);
        assert_eq!(config.runner_config().unwrap(), RunnerConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let toml = r#"
            scenario = "doubling-box"

            [runner]
            runs = 500
            parallel = true

            [doubling_box]
            fraction = 0.2
        "#;
        let config = ExperimentConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.scenario, ScenarioKind::DoublingBox);
        assert_eq!(config.runner.runs, 500);
        assert!(config.runner.parallel);
        assert_eq!(config.runner.seed, 42);
        assert_eq!(config.doubling_box.fraction, 0.2);
        assert_eq!(config.doubling_box.multiplier, 3.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            ExperimentConfig::from_toml_str("scenario = \"roulette\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ExperimentConfig::from_toml_str("[kelly]\nwin_probability = 1.5"),
            Err(ConfigError::Invalid(SimError::InvalidParameter { name: "win_probability", .. }))
        ));
        assert!(matches!(
            ExperimentConfig::from_toml_str(
                "scenario = \"doubling-box\"\n[doubling_box]\nmultiplier = 0.5"
            ),
            Err(ConfigError::Invalid(SimError::InvalidParameter { name: "multiplier", .. }))
        ));
        assert!(matches!(
            ExperimentConfig::from_toml_str("[runner]\nruns = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            ExperimentConfig::load("/nonexistent/experiment.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_scenario_names() {
        for kind in ScenarioKind::all() {
            assert_eq!(kind.name().parse::<ScenarioKind>().unwrap(), kind);
        }
        assert_eq!("chicken_leg".parse::<ScenarioKind>().unwrap(), ScenarioKind::ChickenLeg);
        assert_eq!("Gambling".parse::<ScenarioKind>().unwrap(), ScenarioKind::Gambling);
        assert!("roulette".parse::<ScenarioKind>().is_err());
    }

    #[test]
    fn test_every_scenario_cross_validates() {
        for scenario in ScenarioKind::all() {
            let config = ExperimentConfig {
                scenario,
                runner: RunnerSection {
                    runs: 2_000,
                    tolerance: 0.1,
                    seed: 11,
                    parallel: true,
                },
                ..ExperimentConfig::default()
            };
            let result = config.cross_validate().unwrap();
            assert_eq!(result.statistics.count, 2_000);
            assert!(
                result.passed(),
                "{} relative error {}",
                scenario,
                result.relative_error
            );
        }
    }
}
