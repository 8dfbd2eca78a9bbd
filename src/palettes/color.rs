//! A single palette color.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{ChoroplethError, Result};

/// A parsed color that remembers how it was written.
///
/// Palette files may use hex (`#08519c`) or CSS names (`steelblue`); the
/// original spelling is kept for HTML/SVG output and the RGBA value for
/// raster output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    spec: String,
    rgba: [u8; 4],
}

impl Color {
    /// Parse a hex or CSS color string.
    pub fn parse(spec: &str) -> Result<Self> {
        let parsed = colorgrad::Color::from_html(spec.trim()).map_err(|e| {
            ChoroplethError::Resource {
                message: format!("Invalid color '{}': {}", spec, e),
            }
        })?;
        Ok(Self {
            spec: spec.trim().to_string(),
            rgba: parsed.to_rgba8(),
        })
    }

    /// Build a color from RGB components.
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            spec: format!("#{:02x}{:02x}{:02x}", r, g, b),
            rgba: [r, g, b, 255],
        }
    }

    /// The color as written in the palette
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    /// RGBA components
    pub fn to_rgba8(&self) -> [u8; 4] {
        self.rgba
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(&self) -> String {
        let [r, g, b, _] = self.rgba;
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let c = Color::parse("#08519c").unwrap();
        assert_eq!(c.to_rgba8(), [8, 81, 156, 255]);
        assert_eq!(c.as_str(), "#08519c");
        assert_eq!(c.to_hex(), "#08519c");
    }

    #[test]
    fn test_parse_named() {
        let c = Color::parse("white").unwrap();
        assert_eq!(c.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(c.to_string(), "white");
        assert_eq!(c.to_hex(), "#ffffff");
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Color::parse("not-a-color").is_err());
        assert!(Color::parse("#12").is_err());
    }

    #[test]
    fn test_from_rgb() {
        let c = Color::from_rgb(255, 0, 16);
        assert_eq!(c.as_str(), "#ff0010");
        assert_eq!(c.to_rgba8(), [255, 0, 16, 255]);
    }

    #[test]
    fn test_serialize_as_spec() {
        let c = Color::parse("#DEEBF7").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), r##""#DEEBF7""##);
    }
}
