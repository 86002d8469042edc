//! Simple vs compound interest, and early vs late saving.
//!
//! All balances are floored to whole currency units per year, the way a
//! yearly statement would report them.

use serde::Serialize;

use crate::error::{check_non_negative, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthComparison {
    /// Balance at the end of year `i`, `i = 0..=years`.
    pub simple: Vec<f64>,
    pub compound: Vec<f64>,
}

/// `principal (1 + r t)` against `principal (1 + r)^t` for every year.
pub fn simple_vs_compound(principal: f64, rate: f64, years: usize) -> Result<GrowthComparison> {
    check_non_negative("principal", principal)?;
    check_non_negative("rate", rate)?;

    let (simple, compound) = (0..=years)
        .map(|year| {
            let t = year as f64;
            (
                (principal * (1.0 + rate * t)).floor(),
                (principal * (1.0 + rate).powf(t)).floor(),
            )
        })
        .unzip();

    Ok(GrowthComparison { simple, compound })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionComparison {
    pub early: Vec<f64>,
    pub late: Vec<f64>,
    pub invested_early: f64,
    pub invested_late: f64,
}

/// Early saver contributes for the first `gap_years` and then stops; late
/// saver starts after `gap_years` and contributes until `total_years`.
/// Contributions are made at the start of each year.
pub fn early_vs_late(
    annual: f64,
    rate: f64,
    gap_years: usize,
    total_years: usize,
) -> Result<ContributionComparison> {
    check_non_negative("annual", annual)?;
    check_non_negative("rate", rate)?;

    let growth = 1.0 + rate;
    let mut early_balance = 0.0;
    let mut late_balance = 0.0;
    let mut invested_early = 0.0;
    let mut invested_late = 0.0;
    let mut early = Vec::with_capacity(total_years + 1);
    let mut late = Vec::with_capacity(total_years + 1);

    for year in 0..=total_years {
        if year > 0 {
            if year <= gap_years {
                early_balance = (early_balance + annual) * growth;
                invested_early += annual;
            } else {
                early_balance *= growth;
            }
        }
        if year > gap_years {
            late_balance = (late_balance + annual) * growth;
            invested_late += annual;
        }
        early.push(early_balance.floor());
        late.push(late_balance.floor());
    }

    Ok(ContributionComparison {
        early,
        late,
        invested_early,
        invested_late,
    })
}
