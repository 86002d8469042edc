//! 1/100 vs 6/600: equivalent fractions give the same odds.

use crate::error::{Result, SimError};
use crate::rng::UniformSource;

fn probability(numerator: u64, denominator: u64) -> Result<f64> {
    if denominator == 0 || numerator > denominator {
        return Err(SimError::invalid(
            "fraction",
            format!("{numerator}/{denominator} is not a probability"),
        ));
    }
    Ok(numerator as f64 / denominator as f64)
}

/// Number of wins in `trials` draws at odds `numerator / denominator`.
pub fn simulate_lottery(
    numerator: u64,
    denominator: u64,
    trials: usize,
    rng: &mut impl UniformSource,
) -> Result<usize> {
    let p = probability(numerator, denominator)?;
    Ok((0..trials).filter(|_| rng.next_uniform() < p).count())
}

pub fn fractions_equal(n1: u64, d1: u64, n2: u64, d2: u64) -> bool {
    (n1 as f64 / d1 as f64 - n2 as f64 / d2 as f64).abs() < 1e-10
}

/// Running win rate after each of `trials` draws.
pub fn cumulative_win_rate(p: f64, trials: usize, rng: &mut impl UniformSource) -> Vec<f64> {
    let mut wins = 0usize;
    (1..=trials)
        .map(|i| {
            if rng.next_uniform() < p {
                wins += 1;
            }
            wins as f64 / i as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedSource, SimRng};
    use crate::stats::aggregate;

    #[test]
    fn test_fractions_equal() {
        assert!(fractions_equal(1, 100, 6, 600));
        assert!(fractions_equal(1, 100, 10, 1000));
        assert!(fractions_equal(3, 300, 6, 600));
        assert!(!fractions_equal(1, 100, 7, 600));
        assert!(!fractions_equal(2, 100, 6, 600));
    }

    #[test]
    fn test_scripted_draws() {
        assert_eq!(simulate_lottery(1, 100, 10, &mut ScriptedSource::constant(0.005)).unwrap(), 10);
        assert_eq!(simulate_lottery(1, 100, 10, &mut ScriptedSource::constant(0.02)).unwrap(), 0);

        let a = simulate_lottery(1, 100, 10, &mut ScriptedSource::constant(0.005)).unwrap();
        let b = simulate_lottery(6, 600, 10, &mut ScriptedSource::constant(0.005)).unwrap();
        assert_eq!(a, b);

        let certain = simulate_lottery(100, 100, 10, &mut ScriptedSource::constant(0.999)).unwrap();
        assert_eq!(certain, 10);
        assert_eq!(simulate_lottery(0, 100, 1000, &mut SimRng::from_seed(1)).unwrap(), 0);
    }

    #[test]
    fn test_invalid_fraction() {
        assert!(simulate_lottery(1, 0, 10, &mut SimRng::from_seed(1)).is_err());
        assert!(simulate_lottery(3, 2, 10, &mut SimRng::from_seed(1)).is_err());
    }

    #[test]
    fn test_equivalent_fractions_converge() {
        let mut rng = SimRng::from_seed(100);
        let trials = 50_000;
        let rates: Vec<f64> = [(1, 100), (6, 600), (10, 1000), (17, 1700), (50, 5000)]
            .iter()
            .map(|&(n, d)| simulate_lottery(n, d, trials, &mut rng).unwrap() as f64 / trials as f64)
            .collect();

        for rate in &rates {
            assert!((rate - 0.01).abs() < 0.005);
        }
        let stats = aggregate(&rates).unwrap();
        assert!(stats.max - stats.min < 0.01);
    }

    #[test]
    fn test_distinct_odds_separate() {
        let mut rng = SimRng::from_seed(101);
        let low = simulate_lottery(1, 100, 50_000, &mut rng).unwrap();
        let high = simulate_lottery(5, 100, 50_000, &mut rng).unwrap();
        assert!(high > low);
    }

    #[test]
    fn test_running_rate_settles() {
        let rates = cumulative_win_rate(0.01, 10_000, &mut SimRng::from_seed(102));
        assert_eq!(rates.len(), 10_000);
        let early = (rates[99] - 0.01).abs();
        let late = (rates[9_999] - 0.01).abs();
        assert!(late < early || late < 0.005);
    }
}
