//! Kelly Criterion Simulation Binary
//!
//! Plays the same biased coin with different bet fractions and compares the
//! resulting bankrolls against the Kelly fraction.
//!
//! ## Usage
//! ```bash
//! cargo run --bin kelly --release
//! ```

use odds_lab::kelly::{geometric_growth, kelly_fraction, simulate_players, summarize, KellyBet};
use odds_lab::rng::SimRng;

const PLAYERS: usize = 10_000;
const SEED: u64 = 42;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base = KellyBet::default();
    let kelly = kelly_fraction(base.win_probability, base.odds);

    println!("=======================================================");
    println!("  Kelly Criterion Simulation");
    println!(
        "  p = {:.2}, odds = {:.1}, {} rounds, {} players",
        base.win_probability, base.odds, base.rounds, PLAYERS
    );
    println!("  Kelly fraction: {:.2}%", kelly * 100.0);
    println!("=======================================================\n");

    println!(
        "{:>10} {:>12} {:>12} {:>12} {:>10}",
        "Fraction", "Growth/round", "Mean", "Median", "Bankrupt"
    );
    println!("{}", "-".repeat(60));

    for multiple in [0.5, 1.0, 2.0, 5.0, 10.0, 25.0] {
        let bet = KellyBet {
            fraction: (kelly * multiple).min(1.0),
            ..base
        };
        let finals = simulate_players(&bet, PLAYERS, &mut SimRng::from_seed(SEED))?;
        let summary = summarize(&finals)?;

        println!(
            "{:>9.1}% {:>12.5} {:>12.0} {:>12.0} {:>9.1}%",
            bet.fraction * 100.0,
            geometric_growth(bet.win_probability, bet.odds, bet.fraction),
            summary.mean,
            summary.median,
            summary.bankrupt as f64 / PLAYERS as f64 * 100.0
        );
    }

    println!();
    println!("=======================================================");
    println!("  Interpretation:");
    println!("  - Median growth peaks at the Kelly fraction");
    println!("  - Twice Kelly has zero expected log growth");
    println!("  - Beyond that, most players lose even with an edge");
    println!("=======================================================");
    Ok(())
}
