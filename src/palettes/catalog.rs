//! The color scheme catalog.
//!
//! Maps keys of the form `"{palette}_{count:02}"` (for example `RdYlGn_08`)
//! to ordered color lists. The catalog is read-only once loaded; the
//! embedded ColorBrewer table is parsed at most once per process.

use std::collections::BTreeMap;
use std::path::Path;

use once_cell::sync::OnceCell;
use tracing::debug;

use super::color::Color;
use crate::error::{ChoroplethError, Result};

/// Ordered colors for one palette size, lowest bin first
pub type ColorList = Vec<Color>;

/// ColorBrewer schemes in branca's `_schemes.json` layout
const BUILTIN_SCHEMES: &str = include_str!("../../resources/color_schemes.json");

static BUILTIN: OnceCell<ColorSchemeCatalog> = OnceCell::new();

/// Build the catalog key for a palette and bin count
pub fn palette_key(palette: &str, bin_count: usize) -> String {
    format!("{}_{:02}", palette, bin_count)
}

/// Split a catalog key into palette name and color count
fn split_key(key: &str) -> Option<(&str, usize)> {
    let (name, count) = key.rsplit_once('_')?;
    if name.is_empty() {
        return None;
    }
    Some((name, count.parse().ok()?))
}

/// Read-only lookup from `(palette, bin_count)` to a color list
#[derive(Debug, Clone, Default)]
pub struct ColorSchemeCatalog {
    schemes: BTreeMap<String, ColorList>,
}

impl ColorSchemeCatalog {
    /// The embedded ColorBrewer catalog, parsed on first use.
    pub fn builtin() -> Result<&'static ColorSchemeCatalog> {
        BUILTIN.get_or_try_init(|| Self::from_json_str(BUILTIN_SCHEMES))
    }

    /// Load a catalog from a JSON file mapping keys to lists of colors.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ChoroplethError::Resource {
            message: format!("Failed to read palette file {}: {}", path.display(), e),
        })?;
        let catalog = Self::from_json_str(&content)?;
        debug!(
            path = %path.display(),
            schemes = catalog.len(),
            "Loaded palette file"
        );
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> =
            serde_json::from_str(content).map_err(|e| ChoroplethError::Resource {
                message: format!("Palette resource is not a key to color list map: {}", e),
            })?;

        let mut schemes = BTreeMap::new();
        for (key, colors) in raw {
            if split_key(&key).is_none() {
                return Err(ChoroplethError::Resource {
                    message: format!(
                        "Malformed palette key '{}': expected '<name>_<count>'",
                        key
                    ),
                });
            }
            if colors.is_empty() {
                return Err(ChoroplethError::Resource {
                    message: format!("Palette '{}' has no colors", key),
                });
            }
            let parsed = colors
                .iter()
                .map(|c| Color::parse(c))
                .collect::<Result<ColorList>>()?;
            schemes.insert(key, parsed);
        }

        Ok(Self { schemes })
    }

    /// Resolve the colors for `bin_count` bins of `palette`.
    ///
    /// A missing combination is a configuration error; this catalog is the
    /// only authority on which bin counts a palette supports.
    pub fn resolve(&self, palette: &str, bin_count: usize) -> Result<ColorList> {
        let colors = self
            .schemes
            .get(&palette_key(palette, bin_count))
            .ok_or_else(|| ChoroplethError::UnsupportedPalette {
                palette: palette.to_string(),
                bin_count,
            })?;
        if colors.len() != bin_count {
            return Err(ChoroplethError::ColorCountMismatch {
                colors: colors.len(),
                bins: bin_count,
            });
        }
        Ok(colors.clone())
    }

    /// Distinct palette names, sorted
    pub fn palette_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .schemes
            .keys()
            .filter_map(|k| split_key(k).map(|(name, _)| name))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Bin counts available for a palette, ascending
    pub fn supported_bin_counts(&self, palette: &str) -> Vec<usize> {
        let mut counts: Vec<usize> = self
            .schemes
            .keys()
            .filter_map(|k| split_key(k))
            .filter(|(name, _)| *name == palette)
            .map(|(_, count)| count)
            .collect();
        counts.sort_unstable();
        counts
    }

    /// Number of `(palette, count)` entries
    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    /// True when no schemes are loaded
    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}
