use image::imageops::{self, FilterType};
use image::RgbImage;

/// Bound `frame` so neither dimension exceeds `max_size`, preserving aspect
/// ratio. Applied in two passes: width is constrained first, and if the
/// proportionally scaled height still exceeds the bound, height is
/// constrained in a second pass. In-bounds frames pass through unchanged.
pub fn bound_to_max(frame: RgbImage, max_size: u32) -> RgbImage {
    let (mut width, mut height) = frame.dimensions();
    if width <= max_size && height <= max_size {
        return frame;
    }

    let mut frame = frame;
    if width > max_size {
        let scale = max_size as f64 / width as f64;
        height = (height as f64 * scale) as u32;
        width = max_size;
        frame = imageops::resize(&frame, width, height, FilterType::Triangle);
    }
    if height > max_size {
        let scale = max_size as f64 / height as f64;
        width = (width as f64 * scale) as u32;
        height = max_size;
        frame = imageops::resize(&frame, width, height, FilterType::Triangle);
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_bounds_frame_passes_through() {
        let frame = RgbImage::from_pixel(800, 600, image::Rgb([10, 20, 30]));
        let result = bound_to_max(frame.clone(), 1024);
        assert_eq!(result.dimensions(), (800, 600));
        assert_eq!(result, frame);
    }

    #[test]
    fn test_wide_frame_is_bounded() {
        let frame = RgbImage::new(2048, 1536);
        let result = bound_to_max(frame, 1024);
        assert_eq!(result.dimensions(), (1024, 768));
    }

    #[test]
    fn test_tall_frame_is_bounded() {
        let frame = RgbImage::new(500, 2000);
        let result = bound_to_max(frame, 1024);
        assert_eq!(result.dimensions(), (256, 1024));
    }

    #[test]
    fn test_both_dimensions_over_needs_two_passes() {
        let frame = RgbImage::new(2000, 4000);
        let result = bound_to_max(frame, 1024);
        let (width, height) = result.dimensions();
        assert!(width <= 1024 && height <= 1024);
        // 2000x4000 has aspect 0.5; rounding may shift it slightly
        let aspect = width as f64 / height as f64;
        assert!((aspect - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_square_over_limit() {
        let frame = RgbImage::new(3000, 3000);
        let result = bound_to_max(frame, 1024);
        assert_eq!(result.dimensions(), (1024, 1024));
    }
}
