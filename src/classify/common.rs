//! Shared types and helpers for classification.
//!
//! Values must be scaled and rounded to their display precision *before*
//! boundaries are computed; [`prepare_values`] does both in that order.

use serde::Serialize;

use crate::error::{ChoroplethError, Result};

/// Round a value to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Scale every value by `multiply_by`, then round it to `decimals` places.
pub fn prepare_values(values: &[f64], multiply_by: f64, decimals: u32) -> Vec<f64> {
    values
        .iter()
        .map(|v| round_to(v * multiply_by, decimals))
        .collect()
}

/// A non-empty sample of finite values, ready for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSample {
    sorted: Vec<f64>,
}

impl NumericSample {
    /// Build a sample from values of `column`.
    ///
    /// Fails with [`ChoroplethError::EmptySample`] when there is nothing to
    /// classify and with [`ChoroplethError::InvalidParameter`] on NaN or
    /// infinite values; missing values must be filtered out beforehand.
    pub fn new(mut values: Vec<f64>, column: &str) -> Result<Self> {
        if values.is_empty() {
            return Err(ChoroplethError::EmptySample {
                column: column.to_string(),
            });
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ChoroplethError::InvalidParameter {
                param: column.to_string(),
                message: format!("Sample contains a non-finite value: {}", bad),
            });
        }
        values.sort_by(f64::total_cmp);
        Ok(Self { sorted: values })
    }

    /// Number of values in the sample
    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    /// Smallest value
    pub fn min(&self) -> f64 {
        self.sorted[0]
    }

    /// Largest value
    pub fn max(&self) -> f64 {
        self.sorted[self.sorted.len() - 1]
    }

    /// Values in ascending order
    pub fn sorted(&self) -> &[f64] {
        &self.sorted
    }
}

/// Ordered breakpoints defining `len() - 1` bins.
///
/// Bin `i` covers `[b[i], b[i+1])`, except the last bin which is closed at
/// the top. Adjacent boundaries may be equal; such bins have zero width.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BinBoundaries {
    values: Vec<f64>,
}

impl BinBoundaries {
    /// Validate and wrap a boundary sequence.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() < 2 {
            return Err(ChoroplethError::InvalidParameter {
                param: "boundaries".to_string(),
                message: format!("At least 2 boundaries are required, got {}", values.len()),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ChoroplethError::InvalidParameter {
                param: "boundaries".to_string(),
                message: "Boundaries must be finite".to_string(),
            });
        }
        if values.windows(2).any(|w| w[0] > w[1]) {
            return Err(ChoroplethError::InvalidParameter {
                param: "boundaries".to_string(),
                message: format!("Boundaries must be non-decreasing: {:?}", values),
            });
        }
        Ok(Self { values })
    }

    /// Number of boundary values (`bin_count() + 1`)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a validated sequence
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of bins
    pub fn bin_count(&self) -> usize {
        self.values.len() - 1
    }

    /// Lowest boundary
    pub fn first(&self) -> f64 {
        self.values[0]
    }

    /// Highest boundary
    pub fn last(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// The boundaries as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// True when every boundary is the same value (constant sample).
    pub fn is_degenerate(&self) -> bool {
        self.first() == self.last()
    }

    /// Index of the bin `value` falls into.
    ///
    /// The greatest `i` with `b[i] <= value`, capped at the last bin. Values
    /// below the first boundary fall into bin 0.
    ///
    /// When the range is collapsed to a single value every bin but the last
    /// has zero width, so there is one effective bin and every input maps to
    /// it, including inputs below `b[0]`. A constant column therefore gets a
    /// single color instead of splitting on which side of the constant a
    /// stray value lands.
    pub fn bin_index(&self, value: f64) -> usize {
        let last_bin = self.bin_count() - 1;
        if self.is_degenerate() {
            return last_bin;
        }
        let at_or_below = self.values.partition_point(|b| *b <= value);
        at_or_below.saturating_sub(1).min(last_bin)
    }
}
