//! Stepped colormap.
//!
//! Each bin of a [`BinBoundaries`] is painted with one color. The same map is
//! used to fill features and to build the legend, so both always agree.

use super::colormap::Colormap;
use crate::classify::BinBoundaries;
use crate::error::{ChoroplethError, Result};
use crate::palettes::{Color, ColorList};

/// Step colormap built from boundaries and one color per bin
#[derive(Debug, Clone)]
pub struct StepColormap {
    boundaries: BinBoundaries,
    colors: ColorList,
}

impl StepColormap {
    /// Pair boundaries with colors; there must be exactly one color per bin.
    pub fn new(boundaries: BinBoundaries, colors: ColorList) -> Result<Self> {
        if colors.len() != boundaries.bin_count() {
            return Err(ChoroplethError::ColorCountMismatch {
                colors: colors.len(),
                bins: boundaries.bin_count(),
            });
        }
        Ok(Self { boundaries, colors })
    }

    /// The boundaries this map was built from
    pub fn boundaries(&self) -> &BinBoundaries {
        &self.boundaries
    }

    /// Colors, lowest bin first
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Lowest boundary
    pub fn vmin(&self) -> f64 {
        self.boundaries.first()
    }

    /// Highest boundary
    pub fn vmax(&self) -> f64 {
        self.boundaries.last()
    }
}

impl Colormap for StepColormap {
    fn map(&self, value: f64) -> &Color {
        &self.colors[self.boundaries.bin_index(value)]
    }

    fn name(&self) -> &str {
        "step"
    }
}
