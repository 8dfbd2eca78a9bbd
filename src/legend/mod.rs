//! Legend construction and export.
//!
//! A [`LegendSpec`] pairs every boundary with a color: boundary `i` takes the
//! color of the bin it opens, and the topmost boundary takes the last color.
//! The pairing is the same for both orientations; only the drawing differs.

pub mod raster;
pub mod svg;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classify::{round_to, BinBoundaries};
use crate::error::{ChoroplethError, Result};
use crate::palettes::Color;

/// How the legend is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendOrientation {
    /// Horizontal strip drawn inside the map page
    Inline,
    /// Vertical stack exported as a standalone graphic
    Vertical,
}

impl FromStr for LegendOrientation {
    type Err = ChoroplethError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "inline" | "horizontal" => Ok(LegendOrientation::Inline),
            "vertical" => Ok(LegendOrientation::Vertical),
            _ => Err(ChoroplethError::InvalidParameter {
                param: "legend_orientation".to_string(),
                message: format!("Unknown orientation: {}. Must be inline or vertical", s),
            }),
        }
    }
}

/// File format of an exported legend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendFormat {
    /// Vector graphic with labels and title
    Svg,
    /// Raster color bar
    Png,
}

impl LegendFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            LegendFormat::Svg => "svg",
            LegendFormat::Png => "png",
        }
    }
}

impl FromStr for LegendFormat {
    type Err = ChoroplethError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(LegendFormat::Svg),
            "png" => Ok(LegendFormat::Png),
            _ => Err(ChoroplethError::InvalidParameter {
                param: "legend_format".to_string(),
                message: format!("Unknown legend format: {}. Must be svg or png", s),
            }),
        }
    }
}

impl fmt::Display for LegendFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One boundary of the legend with its display label and color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    /// Boundary value rounded to the legend precision
    pub value: f64,
    /// Text shown for the boundary
    pub label: String,
    /// Color paired with the boundary
    pub color: Color,
}

/// A colored bin between two consecutive legend entries
#[derive(Debug, Clone, PartialEq)]
pub struct Swatch<'a> {
    /// Label of the lower boundary
    pub lower: &'a str,
    /// Label of the upper boundary
    pub upper: &'a str,
    /// Fill of the bin
    pub color: &'a Color,
}

/// Structured legend description, independent of how it is drawn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendSpec {
    /// Caption shown above the legend
    pub title: String,
    /// Decimal places used for labels
    pub decimal_precision: u32,
    /// Requested layout
    pub orientation: LegendOrientation,
    /// One entry per boundary, lowest first
    pub entries: Vec<LegendEntry>,
}

impl LegendSpec {
    /// Number of bins shown
    pub fn bin_count(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    /// The bins with their bounding labels, lowest first
    pub fn swatches(&self) -> Vec<Swatch<'_>> {
        self.entries
            .windows(2)
            .map(|pair| Swatch {
                lower: &pair[0].label,
                upper: &pair[1].label,
                color: &pair[0].color,
            })
            .collect()
    }

    /// `(label, color)` pairs in boundary order
    pub fn pairs(&self) -> Vec<(&str, &Color)> {
        self.entries
            .iter()
            .map(|e| (e.label.as_str(), &e.color))
            .collect()
    }
}

/// Format a boundary for display: rounded, without trailing zeros.
pub fn format_label(value: f64, decimals: u32) -> String {
    let mut label = format!("{:.*}", decimals as usize, round_to(value, decimals));
    if label.contains('.') {
        let trimmed = label.trim_end_matches('0').trim_end_matches('.').len();
        label.truncate(trimmed);
    }
    if label == "-0" {
        label = "0".to_string();
    }
    label
}

/// Build the legend for boundaries and their colors.
pub fn build_legend(
    boundaries: &BinBoundaries,
    colors: &[Color],
    title: &str,
    decimal_precision: u32,
    orientation: LegendOrientation,
) -> Result<LegendSpec> {
    let bins = boundaries.bin_count();
    if colors.len() != bins {
        return Err(ChoroplethError::ColorCountMismatch {
            colors: colors.len(),
            bins,
        });
    }

    let entries = boundaries
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &b)| LegendEntry {
            value: round_to(b, decimal_precision),
            label: format_label(b, decimal_precision),
            color: colors[i.min(bins - 1)].clone(),
        })
        .collect();

    Ok(LegendSpec {
        title: title.to_string(),
        decimal_precision,
        orientation,
        entries,
    })
}

/// Path of the exported legend for a map
pub fn legend_path(dir: &Path, map_name: &str, format: LegendFormat) -> PathBuf {
    dir.join(format!("{}_legend.{}", map_name, format.extension()))
}

/// Write the legend as a standalone graphic, replacing any previous one.
pub fn export_legend(
    spec: &LegendSpec,
    dir: &Path,
    map_name: &str,
    format: LegendFormat,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = legend_path(dir, map_name, format);

    match format {
        LegendFormat::Svg => svg::write_svg(spec, &path)?,
        LegendFormat::Png => raster::write_png(spec, &path)?,
    }

    info!(
        path = %path.display(),
        format = %format,
        bins = spec.bin_count(),
        "Legend exported"
    );
    Ok(path)
}
