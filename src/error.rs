//! Error types for the choropleth pipeline.
//!
//! Every failure is one variant of [`ChoroplethError`]. Variants fall into the
//! three categories reported by [`ChoroplethError::category`]: configuration
//! problems, data problems and resource problems.

use thiserror::Error;

/// The main error type for choropleth operations.
#[derive(Error, Debug)]
pub enum ChoroplethError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Bin type name not recognized
    #[error("Unknown bin type: {name}. Must be one of: percentiles, equal_width")]
    UnknownBinType { name: String },

    /// No palette of the requested size in the catalog
    #[error("Unsupported palette: no '{palette}' scheme with {bin_count} colors")]
    UnsupportedPalette { palette: String, bin_count: usize },

    /// Color list does not match the number of bins
    #[error("Color count mismatch: {colors} colors for {bins} bins")]
    ColorCountMismatch { colors: usize, bins: usize },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Nothing left to classify after filtering
    #[error("Empty sample: column '{column}' has no values to classify")]
    EmptySample { column: String },

    /// Data not found errors
    #[error("Data not found: {message}")]
    DataNotFound { message: String },

    /// Palette resource or input file could not be used
    #[error("Resource error: {message}")]
    Resource { message: String },

    /// Image generation errors
    #[error("Image generation error: {message}")]
    ImageGeneration { message: String },
}

/// Coarse grouping of errors, used for reporting and exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad options: unknown bin type, unsupported palette size and the like
    Configuration,
    /// The data itself cannot be classified
    Data,
    /// Files or embedded resources are unreadable or malformed
    Resource,
}

impl ChoroplethError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChoroplethError::Config { .. }
            | ChoroplethError::UnknownBinType { .. }
            | ChoroplethError::UnsupportedPalette { .. }
            | ChoroplethError::ColorCountMismatch { .. }
            | ChoroplethError::InvalidParameter { .. } => ErrorCategory::Configuration,
            ChoroplethError::EmptySample { .. } | ChoroplethError::DataNotFound { .. } => {
                ErrorCategory::Data
            }
            ChoroplethError::Io(_)
            | ChoroplethError::Json(_)
            | ChoroplethError::Resource { .. }
            | ChoroplethError::ImageGeneration { .. } => ErrorCategory::Resource,
        }
    }
}

/// Convenience type alias for Results with ChoroplethError
pub type Result<T> = std::result::Result<T, ChoroplethError>;
