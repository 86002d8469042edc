//! Spence job-market signalling with education as the signal.
//!
//! Employers cannot observe ability, only whether a candidate holds a
//! degree. Without a signal everybody is paid the pooling wage (average
//! output). A worker acquires the degree when being paid high-type output
//! minus their own cost of the degree beats the pooling wage.

use serde::Serialize;

use crate::error::{check_probability, Result, SimError};
use crate::rng::{shuffle, UniformSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EquilibriumKind {
    /// Only high-ability workers signal.
    Separating,
    /// Everyone signals, the degree carries no information.
    PoolingAll,
    /// Nobody signals.
    PoolingNone,
    /// Only low-ability workers would signal.
    Broken,
}

impl EquilibriumKind {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Separating,
            Self::PoolingAll,
            Self::PoolingNone,
            Self::Broken,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Separating => "Separating",
            Self::PoolingAll => "Pooling (all signal)",
            Self::PoolingNone => "Pooling (no signal)",
            Self::Broken => "Broken",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Equilibrium {
    pub pooling_wage: f64,
    pub high_net: f64,
    pub low_net: f64,
    pub high_wants_signal: bool,
    pub low_wants_signal: bool,
    pub kind: EquilibriumKind,
}

pub fn signaling_equilibrium(
    high_ratio: f64,
    high_output: f64,
    low_output: f64,
    high_cost: f64,
    low_cost: f64,
) -> Result<Equilibrium> {
    check_probability("high_ratio", high_ratio)?;

    let pooling_wage = (1.0 - high_ratio) * low_output + high_ratio * high_output;
    let high_net = high_output - high_cost;
    let low_net = high_output - low_cost;
    let high_wants_signal = high_net > pooling_wage;
    let low_wants_signal = low_net > pooling_wage;

    let kind = match (high_wants_signal, low_wants_signal) {
        (true, false) => EquilibriumKind::Separating,
        (true, true) => EquilibriumKind::PoolingAll,
        (false, false) => EquilibriumKind::PoolingNone,
        (false, true) => EquilibriumKind::Broken,
    };

    Ok(Equilibrium {
        pooling_wage,
        high_net,
        low_net,
        high_wants_signal,
        low_wants_signal,
        kind,
    })
}

/// Share of high-ability workers among degree holders (Bayes).
pub fn theoretical_precision(high_ratio: f64, high_edu: f64, low_edu: f64) -> f64 {
    let p_edu = high_ratio * high_edu + (1.0 - high_ratio) * low_edu;
    if p_edu == 0.0 {
        return 0.0;
    }
    high_ratio * high_edu / p_edu
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiringParams {
    pub candidates: usize,
    pub hires: usize,
    pub high_ability_ratio: f64,
    pub high_edu_rate: f64,
    pub low_edu_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HiringOutcome {
    /// Share of high-ability hires when hiring only degree holders.
    pub edu_high_rate: f64,
    /// Share of high-ability hires when hiring at random.
    pub random_high_rate: f64,
    /// High-ability candidates without a degree.
    pub missed_high: usize,
    pub total_high: usize,
    pub edu_hires: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    high: bool,
    educated: bool,
}

/// Draws a candidate pool, then compares degree screening with random hiring.
pub fn simulate_hiring(
    params: &HiringParams,
    rng: &mut impl UniformSource,
) -> Result<HiringOutcome> {
    check_probability("high_ability_ratio", params.high_ability_ratio)?;
    check_probability("high_edu_rate", params.high_edu_rate)?;
    check_probability("low_edu_rate", params.low_edu_rate)?;
    if params.hires == 0 || params.hires > params.candidates {
        return Err(SimError::invalid(
            "hires",
            format!("{} must be in 1..={}", params.hires, params.candidates),
        ));
    }

    let candidates: Vec<Candidate> = (0..params.candidates)
        .map(|_| {
            let high = rng.next_uniform() < params.high_ability_ratio;
            let rate = if high { params.high_edu_rate } else { params.low_edu_rate };
            Candidate {
                high,
                educated: rng.next_uniform() < rate,
            }
        })
        .collect();

    let mut educated: Vec<Candidate> = candidates.iter().copied().filter(|c| c.educated).collect();
    shuffle(&mut educated, rng);
    let edu_hires = &educated[..params.hires.min(educated.len())];
    let edu_high = edu_hires.iter().filter(|c| c.high).count();

    let mut pool = candidates.clone();
    shuffle(&mut pool, rng);
    let random_high = pool[..params.hires].iter().filter(|c| c.high).count();

    Ok(HiringOutcome {
        edu_high_rate: if edu_hires.is_empty() {
            0.0
        } else {
            edu_high as f64 / edu_hires.len() as f64
        },
        random_high_rate: random_high as f64 / params.hires as f64,
        missed_high: candidates.iter().filter(|c| c.high && !c.educated).count(),
        total_high: candidates.iter().filter(|c| c.high).count(),
        edu_hires: edu_hires.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimRng;
    use approx::assert_abs_diff_eq;

    fn hiring(
        candidates: usize,
        hires: usize,
        high_edu_rate: f64,
        low_edu_rate: f64,
    ) -> HiringParams {
        HiringParams {
            candidates,
            hires,
            high_ability_ratio: 0.4,
            high_edu_rate,
            low_edu_rate,
        }
    }

    #[test]
    fn test_pooling_wage() {
        let eq = signaling_equilibrium(0.4, 15.0, 8.0, 2.0, 7.0).unwrap();
        assert_abs_diff_eq!(eq.pooling_wage, 10.8, epsilon = 1e-9);

        let eq = signaling_equilibrium(0.5, 20.0, 10.0, 3.0, 8.0).unwrap();
        assert_abs_diff_eq!(eq.pooling_wage, 15.0, epsilon = 1e-9);

        let all_high = signaling_equilibrium(1.0, 15.0, 8.0, 2.0, 7.0).unwrap();
        assert_abs_diff_eq!(all_high.pooling_wage, 15.0);
        let all_low = signaling_equilibrium(0.0, 15.0, 8.0, 2.0, 7.0).unwrap();
        assert_abs_diff_eq!(all_low.pooling_wage, 8.0);
    }

    #[test]
    fn test_equilibrium_kinds() {
        let separating = signaling_equilibrium(0.4, 15.0, 8.0, 2.0, 7.0).unwrap();
        assert_eq!(separating.kind, EquilibriumKind::Separating);
        assert!(separating.high_wants_signal);
        assert!(!separating.low_wants_signal);

        let inflation = signaling_equilibrium(0.4, 15.0, 8.0, 2.0, 3.0).unwrap();
        assert_eq!(inflation.kind, EquilibriumKind::PoolingAll);

        let too_costly = signaling_equilibrium(0.4, 15.0, 8.0, 6.0, 10.0).unwrap();
        assert_eq!(too_costly.kind, EquilibriumKind::PoolingNone);

        let free = signaling_equilibrium(0.4, 15.0, 8.0, 0.0, 0.0).unwrap();
        assert_eq!(free.kind, EquilibriumKind::PoolingAll);

        let inverted = signaling_equilibrium(0.4, 15.0, 8.0, 6.0, 1.0).unwrap();
        assert_eq!(inverted.kind, EquilibriumKind::Broken);
    }

    #[test]
    fn test_equilibrium_properties_across_ratios() {
        for step in 1..=9 {
            let ratio = step as f64 / 10.0;
            let eq = signaling_equilibrium(ratio, 15.0, 8.0, 2.0, 7.0).unwrap();
            if eq.kind == EquilibriumKind::Separating {
                assert!(eq.high_net > eq.pooling_wage);
                assert!(eq.low_net < eq.pooling_wage);
            }
            assert!((8.0..=15.0).contains(&eq.pooling_wage));
        }
    }

    #[test]
    fn test_kind_names() {
        let names: Vec<&str> = EquilibriumKind::all().iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"Separating"));
    }

    #[test]
    fn test_screening_beats_random() {
        let mut rng = SimRng::from_seed(31);
        let params = hiring(500, 30, 0.85, 0.20);
        let better = (0..100)
            .filter(|_| {
                let outcome = simulate_hiring(&params, &mut rng).unwrap();
                outcome.edu_high_rate > outcome.random_high_rate
            })
            .count();
        assert!(better > 70, "better {better}");
    }

    #[test]
    fn test_precision_matches_bayes() {
        let mut rng = SimRng::from_seed(32);
        let params = hiring(1000, 100, 0.85, 0.20);
        let runs = 500;
        let total: f64 = (0..runs)
            .map(|_| simulate_hiring(&params, &mut rng).unwrap().edu_high_rate)
            .sum();
        let theory = theoretical_precision(0.4, 0.85, 0.20);
        assert!((total / runs as f64 - theory).abs() < 0.05);
    }

    #[test]
    fn test_missed_rate() {
        let mut rng = SimRng::from_seed(33);
        let params = hiring(1000, 50, 0.85, 0.20);
        let runs = 200;
        let total: f64 = (0..runs)
            .map(|_| {
                let outcome = simulate_hiring(&params, &mut rng).unwrap();
                outcome.missed_high as f64 / outcome.total_high as f64
            })
            .sum();
        assert!((total / runs as f64 - 0.15).abs() < 0.03);
    }

    #[test]
    fn test_extreme_signals() {
        let mut rng = SimRng::from_seed(34);
        let useless = hiring(500, 30, 0.5, 0.5);
        let diff: f64 = (0..100)
            .map(|_| {
                let outcome = simulate_hiring(&useless, &mut rng).unwrap();
                outcome.edu_high_rate - outcome.random_high_rate
            })
            .sum();
        assert!((diff / 100.0).abs() < 0.05);

        let perfect = hiring(500, 30, 1.0, 0.0);
        let precision: f64 = (0..100)
            .map(|_| simulate_hiring(&perfect, &mut rng).unwrap().edu_high_rate)
            .sum();
        assert!(precision / 100.0 > 0.95);
    }

    #[test]
    fn test_rejects_too_many_hires() {
        let params = hiring(10, 11, 0.85, 0.2);
        assert!(simulate_hiring(&params, &mut SimRng::from_seed(1)).is_err());
    }
}
