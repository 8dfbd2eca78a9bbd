//! Image utilities for testing exported PNG legends.

use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(
    image: &DynamicImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

/// Colors of a vertical legend bar, lowest bin first, sampled at each cell center.
pub fn vertical_bar_colors(image: &DynamicImage, cell: u32) -> Vec<[u8; 4]> {
    let (width, height) = image.dimensions();
    let cells = height / cell;
    (0..cells)
        .map(|i| {
            let y = height - 1 - (i * cell + cell / 2);
            image.get_pixel(width / 2, y).0
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    #[test]
    fn test_detect_image_format() {
        let img = ImageBuffer::<Rgba<u8>, Vec<u8>>::new(2, 2);
        let mut png_bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .unwrap();

        assert_eq!(detect_image_format(&png_bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_assert_image_dimensions() {
        let img = DynamicImage::new_rgb8(10, 20);

        assert!(assert_image_dimensions(&img, 10, 20).is_ok());
        assert!(assert_image_dimensions(&img, 11, 20).is_err());
    }
}
