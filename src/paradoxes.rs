//! Counter-intuitive probability: non-transitive dice, the boy or girl
//! paradox, false positives, coupon collecting and Sleeping Beauty.
//!
//! Every closed form comes with a simulator so the two can be compared.

use serde::Serialize;

use crate::error::{check_probability, Result};
use crate::rng::UniformSource;

/// Efron-style non-transitive dice: A beats B, B beats C, C beats A, each
/// with probability 5/9.
pub const DICE_A: [u32; 6] = [2, 2, 4, 4, 9, 9];
pub const DICE_B: [u32; 6] = [1, 1, 6, 6, 8, 8];
pub const DICE_C: [u32; 6] = [3, 3, 5, 5, 7, 7];

/// Probability that `left` rolls strictly higher than `right`. Ties lose.
pub fn dice_win_probability(left: &[u32], right: &[u32]) -> f64 {
    let total = left.len() * right.len();
    if total == 0 {
        return 0.0;
    }
    let wins = left
        .iter()
        .map(|l| right.iter().filter(|&r| l > r).count())
        .sum::<usize>();
    wins as f64 / total as f64
}

/// Share of `trials` rolls won by `left`.
pub fn simulate_dice(
    left: &[u32],
    right: &[u32],
    trials: usize,
    rng: &mut impl UniformSource,
) -> f64 {
    if trials == 0 || left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let wins = (0..trials)
        .filter(|_| {
            let l = left[rng.next_index(left.len())];
            let r = right[rng.next_index(right.len())];
            l > r
        })
        .count();
    wins as f64 / trials as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoyGirlCondition {
    /// The elder child is a boy.
    Elder,
    /// At least one child is a boy.
    AtLeastOne,
}

impl BoyGirlCondition {
    fn holds(self, elder_boy: bool, younger_boy: bool) -> bool {
        match self {
            Self::Elder => elder_boy,
            Self::AtLeastOne => elder_boy || younger_boy,
        }
    }
}

/// P(both boys | condition), enumerating the four equally likely families.
pub fn boy_girl_probability(condition: BoyGirlCondition) -> f64 {
    let families = [(true, true), (true, false), (false, true), (false, false)];
    let matching: Vec<_> = families
        .iter()
        .filter(|(e, y)| condition.holds(*e, *y))
        .collect();
    let both = matching.iter().filter(|(e, y)| *e && *y).count();
    both as f64 / matching.len() as f64
}

/// Sampled P(both boys | condition) over `families` random families.
pub fn simulate_boy_girl(
    condition: BoyGirlCondition,
    families: usize,
    rng: &mut impl UniformSource,
) -> f64 {
    let mut matching = 0usize;
    let mut both = 0usize;
    for _ in 0..families {
        let elder = rng.next_uniform() < 0.5;
        let younger = rng.next_uniform() < 0.5;
        if condition.holds(elder, younger) {
            matching += 1;
            if elder && younger {
                both += 1;
            }
        }
    }
    if matching == 0 {
        0.0
    } else {
        both as f64 / matching as f64
    }
}

/// Positive predictive value of a test. 0 when nobody tests positive.
pub fn bayes_ppv(prevalence: f64, sensitivity: f64, specificity: f64) -> Result<f64> {
    check_probability("prevalence", prevalence)?;
    check_probability("sensitivity", sensitivity)?;
    check_probability("specificity", specificity)?;

    let true_positive = prevalence * sensitivity;
    let false_positive = (1.0 - prevalence) * (1.0 - specificity);
    let positive = true_positive + false_positive;
    Ok(if positive == 0.0 { 0.0 } else { true_positive / positive })
}

/// Sampled positive predictive value over a screened population.
pub fn simulate_screening(
    prevalence: f64,
    sensitivity: f64,
    specificity: f64,
    population: usize,
    rng: &mut impl UniformSource,
) -> f64 {
    let mut true_positive = 0usize;
    let mut false_positive = 0usize;
    for _ in 0..population {
        let sick = rng.next_uniform() < prevalence;
        let detected = rng.next_uniform();
        if sick && detected < sensitivity {
            true_positive += 1;
        }
        if !sick && detected >= specificity {
            false_positive += 1;
        }
    }
    let positive = true_positive + false_positive;
    if positive == 0 {
        0.0
    } else {
        true_positive as f64 / positive as f64
    }
}

/// Expected purchases to collect all `n` coupons: `n * H_n`.
pub fn coupon_expected(n: usize) -> f64 {
    let harmonic: f64 = (1..=n).map(|i| 1.0 / i as f64).sum();
    n as f64 * harmonic
}

/// Purchases until every one of `n` coupons has been seen once.
pub fn coupon_draws(n: usize, rng: &mut impl UniformSource) -> usize {
    let mut seen = vec![false; n];
    let mut distinct = 0;
    let mut draws = 0;
    while distinct < n {
        let coupon = rng.next_index(n);
        draws += 1;
        if !seen[coupon] {
            seen[coupon] = true;
            distinct += 1;
        }
    }
    draws
}

/// Share of awakenings that follow heads: heads wakes once, tails twice.
pub fn sleeping_beauty(experiments: usize, rng: &mut impl UniformSource) -> f64 {
    let mut awakenings = 0usize;
    let mut heads_awakenings = 0usize;
    for _ in 0..experiments {
        if rng.next_uniform() < 0.5 {
            awakenings += 1;
            heads_awakenings += 1;
        } else {
            awakenings += 2;
        }
    }
    if awakenings == 0 {
        0.0
    } else {
        heads_awakenings as f64 / awakenings as f64
    }
}
