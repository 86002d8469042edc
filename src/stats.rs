//! Aggregate statistics over terminal values of many independent runs.

use serde::Serialize;

use crate::error::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStatistics {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation (divisor `count`).
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl AggregateStatistics {
    /// Standard deviation over mean, 0 when the mean is 0.
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean
        }
    }

    pub fn print(&self) {
        println!("  Samples:                 {}", self.count);
        println!("  Mean:                    {:.4}", self.mean);
        println!("  Std dev:                 {:.4}", self.std_dev);
        println!("  Min:                     {:.4}", self.min);
        println!("  Max:                     {:.4}", self.max);
    }
}

/// Mean, population standard deviation, min and max of `values`.
///
/// The reduction is order-insensitive, so values collected from parallel
/// runs can be passed in any order.
///
/// # Errors
///
/// [`SimError::EmptyInput`] when `values` is empty.
pub fn aggregate(values: &[f64]) -> Result<AggregateStatistics> {
    if values.is_empty() {
        return Err(SimError::EmptyInput);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    Ok(AggregateStatistics {
        count: values.len(),
        mean,
        std_dev: variance.sqrt(),
        min: values.iter().cloned().fold(f64::INFINITY, f64::min),
        max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// Upper median: element `n / 2` of the sorted values.
pub fn median(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(SimError::EmptyInput);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted[sorted.len() / 2])
}

/// Nearest-rank percentile of an already sorted slice, `p` in [0, 1].
pub fn percentile(sorted: &[f64], p: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(SimError::EmptyInput);
    }
    let idx = ((sorted.len() as f64 - 1.0) * p.clamp(0.0, 1.0)).round() as usize;
    Ok(sorted[idx.min(sorted.len() - 1)])
}
