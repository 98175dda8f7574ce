//! Coordinate mapping between preview and source resolutions.
//!
//! The selection UI displays frames downscaled to a fixed reference
//! width; selection boxes arrive in that preview space and must be
//! mapped back to source pixels before matching or rendering.

use hilite_models::PixelBox;

/// Reference width the preview UI downscales to.
pub const PREVIEW_REFERENCE_WIDTH: i32 = 800;

/// Map a preview-resolution box to source-video pixel coordinates.
///
/// Identity when `full_width <= preview_width` (the preview was never
/// downscaled). Otherwise every coordinate is multiplied by
/// `full_width / preview_width` and truncated to an integer. Truncation
/// is the documented policy, chosen to match how the preview
/// coordinates were produced; callers must not "fix" it to rounding.
pub fn scale_to_full(bbox: PixelBox, full_width: i32, preview_width: i32) -> PixelBox {
    if full_width <= preview_width {
        return bbox;
    }
    let factor = full_width as f64 / preview_width as f64;
    bbox.scale(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_not_downscaled() {
        let b = PixelBox::new(100, 100, 200, 200).unwrap();
        assert_eq!(scale_to_full(b, 800, PREVIEW_REFERENCE_WIDTH), b);
        assert_eq!(scale_to_full(b, 640, PREVIEW_REFERENCE_WIDTH), b);
    }

    #[test]
    fn test_doubles_at_1600() {
        let b = PixelBox::new(100, 100, 200, 200).unwrap();
        let scaled = scale_to_full(b, 1600, PREVIEW_REFERENCE_WIDTH);
        assert_eq!(<[i32; 4]>::from(scaled), [200, 200, 400, 400]);
    }

    #[test]
    fn test_truncates_fractional_coordinates() {
        // 1920/800 = 2.4; 133 * 2.4 = 319.2 -> 319
        let b = PixelBox::new(133, 0, 200, 100).unwrap();
        let scaled = scale_to_full(b, 1920, PREVIEW_REFERENCE_WIDTH);
        assert_eq!(scaled.x1(), 319);
        assert_eq!(scaled.x2(), 480);
    }
}
