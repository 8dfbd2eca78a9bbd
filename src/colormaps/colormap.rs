//! Colormap trait.
//!
//! This module defines the common interface for value-to-color mappings.

use crate::palettes::Color;

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a data value to a color
    fn map(&self, value: f64) -> &Color;

    /// Map a possibly missing value; missing values have no color
    fn map_optional(&self, value: Option<f64>) -> Option<&Color> {
        value.map(|v| self.map(v))
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}
