//! Chicken Leg Simulation Binary
//!
//! Chops `n` legs off a flock of `n` chickens and compares the simulated
//! number of two-legged survivors with the exact expectation.
//!
//! ## Usage
//! ```bash
//! cargo run --bin chicken_leg --release
//! ```

use odds_lab::chicken_leg::{theory, ChickenLeg, LIMIT_RATIO};
use odds_lab::runner::{cross_validate, RunnerConfig};

const RUNS: usize = 2_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=======================================================");
    println!("  Chicken Leg Simulation");
    println!("  n chickens, n chops, how many keep both legs?");
    println!("=======================================================\n");

    let config = RunnerConfig::builder()
        .runs(RUNS)
        .tolerance(0.02)
        .parallel(true)
        .build()?;

    for n in [10, 100, 1_000, 10_000] {
        println!("Flock size: {}", n);
        println!("{}", "-".repeat(50));
        let result = cross_validate(&ChickenLeg { n }, &config)?;
        result.print();
        println!("  Healthy share:           {:.4}", theory(n) / n as f64);
        println!();
    }

    println!("=======================================================");
    println!("  Interpretation:");
    println!("  - The healthy share converges to {:.4}", LIMIT_RATIO);
    println!("  - Not 1/2: chickens with one leg left are chopped again");
    println!("=======================================================");
    Ok(())
}
