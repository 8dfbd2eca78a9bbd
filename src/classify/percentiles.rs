//! Percentile-based bins.
//!
//! Boundaries sit at `bin_count + 1` evenly spaced percentile ranks from 0 to
//! 100, each computed by linear interpolation between order statistics.

use super::common::{BinBoundaries, NumericSample};
use super::Classifier;
use crate::error::Result;

/// Percentile classifier
pub struct PercentileClassifier;

impl Classifier for PercentileClassifier {
    fn boundaries(&self, sample: &NumericSample, bin_count: usize) -> Result<BinBoundaries> {
        let sorted = sample.sorted();
        let ranks = percentile_ranks(bin_count);
        let values: Vec<f64> = ranks.iter().map(|&rank| percentile(sorted, rank)).collect();
        BinBoundaries::new(values)
    }

    fn name(&self) -> &str {
        "percentiles"
    }
}

/// The ranks `i * 100 / bin_count` for `i` in `0..=bin_count`.
pub fn percentile_ranks(bin_count: usize) -> Vec<f64> {
    (0..=bin_count)
        .map(|i| i as f64 * 100.0 / bin_count as f64)
        .collect()
}

/// Percentile of an ascending slice at `rank` (0 to 100).
///
/// # Panics
///
/// Panics if `sorted` is empty. [`NumericSample`](super::NumericSample) never is.
pub(crate) fn percentile(sorted: &[f64], rank: f64) -> f64 {
    let last = sorted.len() - 1;
    let h = (last as f64 * rank / 100.0).clamp(0.0, last as f64);
    let lower = h.floor() as usize;
    let upper = h.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = h - lower as f64;
    let value = sorted[lower] + fraction * (sorted[upper] - sorted[lower]);
    // Keep the interpolated value inside its order statistics
    value.clamp(sorted[lower], sorted[upper])
}
