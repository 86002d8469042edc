//! Everyday game theory: bargaining, the ultimatum game, chicken and the
//! repeated prisoner's dilemma.

use serde::Serialize;

use crate::rng::UniformSource;

/// Nash bargaining price: midpoint of the zone of agreement, if any.
pub fn nash_bargain(seller_min: f64, buyer_max: f64) -> Option<f64> {
    if buyer_max < seller_min {
        return None;
    }
    Some((seller_min + buyer_max) / 2.0)
}

/// Empirical acceptance probability of an ultimatum offer out of 100.
pub fn ultimatum_accept_probability(offer: f64) -> f64 {
    if offer <= 0.0 {
        0.0
    } else if offer >= 50.0 {
        0.98
    } else if offer >= 40.0 {
        0.90 + (offer - 40.0) * 0.008
    } else if offer >= 30.0 {
        0.70 + (offer - 30.0) * 0.02
    } else if offer >= 20.0 {
        0.40 + (offer - 20.0) * 0.03
    } else if offer >= 10.0 {
        0.15 + (offer - 10.0) * 0.025
    } else {
        offer * 0.015
    }
}

/// What the proposer expects to keep out of 100.
pub fn ultimatum_expected_gain(offer: f64) -> f64 {
    (100.0 - offer) * ultimatum_accept_probability(offer)
}

/// Probability of swerving in the mixed equilibrium of chicken.
pub fn chicken_mixed_equilibrium(crash: f64, win: f64, lose: f64) -> f64 {
    let crash = crash.abs();
    (crash - win) / (crash - win + lose.abs())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// Payoffs `(mine, theirs)` of one prisoner's dilemma round.
    pub fn payoff(self, other: Self) -> (u32, u32) {
        match (self, other) {
            (Self::Cooperate, Self::Cooperate) => (3, 3),
            (Self::Cooperate, Self::Defect) => (0, 5),
            (Self::Defect, Self::Cooperate) => (5, 0),
            (Self::Defect, Self::Defect) => (1, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    AlwaysCooperate,
    AlwaysDefect,
    Random,
    TitForTat,
    Grudger,
}

impl Strategy {
    pub fn all() -> Vec<Self> {
        vec![
            Self::AlwaysCooperate,
            Self::AlwaysDefect,
            Self::Random,
            Self::TitForTat,
            Self::Grudger,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AlwaysCooperate => "Always cooperate",
            Self::AlwaysDefect => "Always defect",
            Self::Random => "Random",
            Self::TitForTat => "Tit for tat",
            Self::Grudger => "Grudger",
        }
    }

    /// Next move given the opponent's history. Only `Random` draws.
    pub fn choose(&self, theirs: &[Move], rng: &mut impl UniformSource) -> Move {
        match self {
            Self::AlwaysCooperate => Move::Cooperate,
            Self::AlwaysDefect => Move::Defect,
            Self::Random => {
                if rng.next_uniform() < 0.5 {
                    Move::Cooperate
                } else {
                    Move::Defect
                }
            }
            Self::TitForTat => theirs.last().copied().unwrap_or(Move::Cooperate),
            Self::Grudger => {
                if theirs.contains(&Move::Defect) {
                    Move::Defect
                } else {
                    Move::Cooperate
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub a_total: u32,
    pub b_total: u32,
    pub a_moves: Vec<Move>,
    pub b_moves: Vec<Move>,
}

pub fn run_match(
    a: Strategy,
    b: Strategy,
    rounds: usize,
    rng: &mut impl UniformSource,
) -> MatchResult {
    let mut result = MatchResult {
        a_total: 0,
        b_total: 0,
        a_moves: Vec::with_capacity(rounds),
        b_moves: Vec::with_capacity(rounds),
    };
    for _ in 0..rounds {
        let a_move = a.choose(&result.b_moves, rng);
        let b_move = b.choose(&result.a_moves, rng);
        let (a_pay, b_pay) = a_move.payoff(b_move);
        result.a_total += a_pay;
        result.b_total += b_pay;
        result.a_moves.push(a_move);
        result.b_moves.push(b_move);
    }
    result
}

/// Every strategy plays every strategy (itself included, in both seats).
/// Returns total scores sorted from best to worst.
pub fn round_robin(
    strategies: &[Strategy],
    rounds: usize,
    rng: &mut impl UniformSource,
) -> Vec<(Strategy, u32)> {
    let mut scores: Vec<(Strategy, u32)> = strategies.iter().map(|&s| (s, 0)).collect();
    for i in 0..strategies.len() {
        for j in 0..strategies.len() {
            let result = run_match(strategies[i], strategies[j], rounds, rng);
            scores[i].1 += result.a_total;
            scores[j].1 += result.b_total;
        }
    }
    scores.sort_by(|a, b| b.1.cmp(&a.1));
    scores
}
