//! End-to-end checks: every cross-validated scenario converges to its
//! theoretical value, and the core invariants hold for arbitrary inputs.

use approx::assert_relative_eq;
use proptest::prelude::*;

use odds_lab::chicken_leg::ChickenLeg;
use odds_lab::config::{ExperimentConfig, ScenarioKind};
use odds_lab::kelly::{kelly_fraction, KellyBet};
use odds_lab::process::{compute_theoretical, simulate_once};
use odds_lab::rng::{ScriptedSource, SimRng};
use odds_lab::stats::aggregate;
use odds_lab::{
    cross_validate, BettingProcess, ProcessParameters, RuinPolicy, RunnerConfig, TransitionRule,
};

fn additive(trials: usize, p: f64, start: f64, ruin: RuinPolicy) -> ProcessParameters {
    ProcessParameters {
        trial_count: trials,
        win_probability: p,
        payoff_multiplier: 1.0,
        starting_state: start,
        rule: TransitionRule::Additive { stake: 10.0 },
        ruin,
    }
}

#[test]
fn test_fair_additive_game_keeps_its_value() {
    // Fair game with ruin is still a martingale.
    for ruin in [RuinPolicy::Halt, RuinPolicy::Freeze] {
        let params = additive(40, 0.5, 50.0, ruin);
        assert_relative_eq!(compute_theoretical(&params).unwrap(), 50.0, epsilon = 1e-9);

        let config = RunnerConfig::builder().runs(20_000).seed(3).build().unwrap();
        let result = cross_validate(&BettingProcess::new(params).unwrap(), &config).unwrap();
        assert!(result.passed(), "{:?}: relative error {}", ruin, result.relative_error);
    }
}

#[test]
fn test_kelly_bet_matches_process() {
    let bet = KellyBet {
        rounds: 50,
        ..KellyBet::default()
    };
    let params = bet.process();
    let mut a = ScriptedSource::new(vec![0.2, 0.9, 0.7, 0.3]);
    let mut b = ScriptedSource::new(vec![0.2, 0.9, 0.7, 0.3]);

    let outcome = odds_lab::kelly::simulate(&bet, &mut a).unwrap();
    let trajectory = simulate_once(&params, &mut b).unwrap();
    assert_relative_eq!(outcome.money, trajectory.terminal(), max_relative = 1e-12);
    assert_eq!(outcome.wins, trajectory.wins);
}

#[test]
fn test_chicken_leg_large_flock() {
    let config = RunnerConfig::builder()
        .runs(200)
        .tolerance(0.02)
        .seed(5)
        .parallel(true)
        .build()
        .unwrap();
    let result = cross_validate(&ChickenLeg { n: 1_000 }, &config).unwrap();
    assert!(result.passed(), "relative error {}", result.relative_error);
    assert!(result.statistics.min > 250.0 && result.statistics.max < 390.0);
}

#[test]
fn test_experiment_file_round_trip() {
    let toml = r#"
        scenario = "gambling"

        [runner]
        runs = 3000
        tolerance = 0.1
        seed = 8

        [gambling]
        initial_money = 500.0
        bet = 50.0
    "#;
    let experiment = ExperimentConfig::from_toml_str(toml).unwrap();
    assert_eq!(experiment.scenario, ScenarioKind::Gambling);

    let result = experiment.cross_validate().unwrap();
    assert!(result.passed(), "relative error {}", result.relative_error);

    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["statistics"]["count"], 3000);
    assert!(json["theoretical"].as_f64().unwrap() < 500.0);
}

proptest! {
    #[test]
    fn prop_aggregate_ignores_order(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
        let forward = aggregate(&values).unwrap();
        let mut reversed = values.clone();
        reversed.reverse();
        let backward = aggregate(&reversed).unwrap();

        prop_assert_eq!(forward.count, backward.count);
        prop_assert_eq!(forward.min, backward.min);
        prop_assert_eq!(forward.max, backward.max);
        prop_assert!((forward.mean - backward.mean).abs() <= 1e-6 * (1.0 + forward.mean.abs()));
        prop_assert!(forward.std_dev >= 0.0);
        prop_assert!(forward.min <= forward.mean + 1e-6 && forward.mean <= forward.max + 1e-6);
    }

    #[test]
    fn prop_kelly_fraction_is_a_fraction(p in 0.0f64..=1.0, b in 0.01f64..100.0) {
        let f = kelly_fraction(p, b);
        prop_assert!((0.0..=1.0).contains(&f));
    }

    #[test]
    fn prop_rejects_non_probabilities(p in prop_oneof![-10.0f64..-0.001, 1.001f64..10.0]) {
        let params = additive(10, p, 100.0, RuinPolicy::Halt);
        prop_assert!(compute_theoretical(&params).is_err());
        prop_assert!(simulate_once(&params, &mut SimRng::from_seed(0)).is_err());
    }

    #[test]
    fn prop_states_never_negative(
        p in 0.0f64..=1.0,
        fraction in 0.0f64..=1.0,
        b in 0.0f64..5.0,
        seed in any::<u64>(),
    ) {
        let params = ProcessParameters {
            trial_count: 60,
            win_probability: p,
            payoff_multiplier: b,
            starting_state: 100.0,
            rule: TransitionRule::Multiplicative { fraction, floor: 1.0 },
            ruin: RuinPolicy::Freeze,
        };
        let trajectory = simulate_once(&params, &mut SimRng::from_seed(seed)).unwrap();
        prop_assert_eq!(trajectory.states.len(), 61);
        prop_assert!(trajectory.states.iter().all(|&s| s >= 0.0));
        prop_assert!(compute_theoretical(&params).unwrap() >= 0.0);
    }

    #[test]
    fn prop_theoretical_is_pure(p in 0.0f64..=1.0, trials in 0usize..80) {
        let params = additive(trials, p, 95.0, RuinPolicy::Halt);
        let first = compute_theoretical(&params).unwrap();
        let second = compute_theoretical(&params).unwrap();
        prop_assert_eq!(first.to_bits(), second.to_bits());
    }
}
