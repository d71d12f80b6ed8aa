//! Image inspection utilities for testing.

use image::{DynamicImage, GenericImageView, ImageFormat};

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

/// Count pixels that are neither white nor near-gray, i.e. carry palette hue
pub fn count_colored_pixels(image: &DynamicImage) -> usize {
    image
        .to_rgb8()
        .pixels()
        .filter(|p| {
            let [r, g, b] = p.0;
            let max = r.max(g).max(b) as i16;
            let min = r.min(g).min(b) as i16;
            max - min > 40
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_image_dimensions() {
        let img = DynamicImage::new_rgb8(10, 20);
        assert!(assert_image_dimensions(&img, 10, 20).is_ok());
        assert!(assert_image_dimensions(&img, 11, 20).is_err());
    }

    #[test]
    fn test_count_colored_pixels() {
        let img = DynamicImage::new_rgb8(4, 4);
        assert_eq!(count_colored_pixels(&img), 0);
    }
}
