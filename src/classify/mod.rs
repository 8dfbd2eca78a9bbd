//! Classification of a numeric column into ordered bins.
//!
//! A classifier turns a [`NumericSample`] into [`BinBoundaries`]: `bin_count + 1`
//! non-decreasing breakpoints whose first value is the sample minimum and whose
//! last value is the sample maximum.

pub mod common;
pub mod equal_width;
pub mod percentiles;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChoroplethError, Result};

pub use common::{prepare_values, round_to, BinBoundaries, NumericSample};
pub use equal_width::EqualWidthClassifier;
pub use percentiles::PercentileClassifier;

/// Trait for bin selection strategies
pub trait Classifier {
    /// Compute `bin_count + 1` boundaries for the sample
    fn boundaries(&self, sample: &NumericSample, bin_count: usize) -> Result<BinBoundaries>;

    /// Get the name of this strategy
    fn name(&self) -> &str;
}

/// Supported bin selection strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinType {
    /// Evenly spaced percentile ranks; robust against outliers
    Percentiles,
    /// Evenly spaced values between the sample minimum and maximum
    #[serde(alias = "equally_spaced")]
    EqualWidth,
}

impl BinType {
    /// The canonical name of the strategy
    pub fn as_str(&self) -> &'static str {
        match self {
            BinType::Percentiles => "percentiles",
            BinType::EqualWidth => "equal_width",
        }
    }

    /// The classifier implementing this strategy
    pub fn classifier(&self) -> Box<dyn Classifier> {
        match self {
            BinType::Percentiles => Box::new(PercentileClassifier),
            BinType::EqualWidth => Box::new(EqualWidthClassifier),
        }
    }
}

impl FromStr for BinType {
    type Err = ChoroplethError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "percentiles" => Ok(BinType::Percentiles),
            // "equally_spaced" is the name older configurations use
            "equal_width" | "equally_spaced" => Ok(BinType::EqualWidth),
            _ => Err(ChoroplethError::UnknownBinType {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for BinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Get a classifier by strategy name
pub fn get_classifier(name: &str) -> Result<Box<dyn Classifier>> {
    Ok(name.parse::<BinType>()?.classifier())
}

/// Compute bin boundaries for a sample with the given strategy.
///
/// `bin_count` must be at least 2. Whether a palette exists for that many
/// bins is decided by the palette catalog, not here.
pub fn compute_boundaries(
    sample: &NumericSample,
    bin_count: usize,
    bin_type: BinType,
) -> Result<BinBoundaries> {
    if bin_count < 2 {
        return Err(ChoroplethError::InvalidParameter {
            param: "bin_count".to_string(),
            message: format!("At least 2 bins are required, got {}", bin_count),
        });
    }
    bin_type.classifier().boundaries(sample, bin_count)
}
