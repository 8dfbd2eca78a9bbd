//! Raster color bar for a legend.
//!
//! PNG legends carry only the colors; labels need the SVG form.

use image::{ImageBuffer, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use super::{LegendOrientation, LegendSpec};
use crate::error::{ChoroplethError, Result};

/// Pixel size of one bin along the bar
pub const CELL_LENGTH: u32 = 40;
/// Pixel thickness of the bar
pub const BAR_THICKNESS: u32 = 24;

/// Draw the legend bins as an image, lowest bin at the bottom (vertical) or
/// on the left (inline).
pub fn render_image(spec: &LegendSpec) -> Result<RgbaImage> {
    let swatches = spec.swatches();
    if swatches.is_empty() {
        return Err(ChoroplethError::ImageGeneration {
            message: "Legend has no bins to draw".to_string(),
        });
    }
    let n = swatches.len() as u32;

    let (width, height) = match spec.orientation {
        LegendOrientation::Vertical => (BAR_THICKNESS, n * CELL_LENGTH),
        LegendOrientation::Inline => (n * CELL_LENGTH, BAR_THICKNESS),
    };

    let img = ImageBuffer::from_fn(width, height, |x, y| {
        let bin = match spec.orientation {
            LegendOrientation::Vertical => n - 1 - y / CELL_LENGTH,
            LegendOrientation::Inline => x / CELL_LENGTH,
        };
        image::Rgba(swatches[bin as usize].color.to_rgba8())
    });

    Ok(img)
}

/// Encode the legend bar as PNG bytes
pub fn encode_png(spec: &LegendSpec) -> Result<Vec<u8>> {
    let img = render_image(spec)?;
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| ChoroplethError::ImageGeneration {
            message: format!("Failed to encode PNG: {}", e),
        })?;
    Ok(buffer.into_inner())
}

/// Write the PNG legend to `path`.
pub fn write_png(spec: &LegendSpec, path: &Path) -> Result<()> {
    let bytes = encode_png(spec)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
