//! Equal-width bins.
//!
//! Boundary `i` is `min + i * step` with `step = (max - min) / bin_count`.
//! The last boundary is the exact maximum so that it is never lost to
//! floating-point error.

use super::common::{BinBoundaries, NumericSample};
use super::Classifier;
use crate::error::Result;

/// Equal-width classifier
pub struct EqualWidthClassifier;

impl Classifier for EqualWidthClassifier {
    fn boundaries(&self, sample: &NumericSample, bin_count: usize) -> Result<BinBoundaries> {
        let min_v = sample.min();
        let max_v = sample.max();
        let step = (max_v - min_v) / bin_count as f64;

        let mut values: Vec<f64> = (0..bin_count)
            .map(|i| (min_v + i as f64 * step).min(max_v))
            .collect();
        values.push(max_v);

        BinBoundaries::new(values)
    }

    fn name(&self) -> &str {
        "equal_width"
    }
}
