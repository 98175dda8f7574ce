//! Axis-aligned pixel-space rectangles.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a box cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoxError {
    #[error("invalid box corners: ({x1},{y1})-({x2},{y2})")]
    InvertedCorners { x1: i32, y1: i32, x2: i32, y2: i32 },
}

/// An axis-aligned rectangle `(x1, y1, x2, y2)` in pixel coordinates.
///
/// Construction enforces `x2 >= x1` and `y2 >= y1`, so scaled or padded
/// boxes cannot silently invert. On the wire this is the 4-element array
/// `[x1, y1, x2, y2]` used by the selection UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "[i32; 4]", into = "[i32; 4]")]
pub struct PixelBox {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl PixelBox {
    /// Create a new box, rejecting inverted corners.
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Result<Self, BoxError> {
        if x2 < x1 || y2 < y1 {
            return Err(BoxError::InvertedCorners { x1, y1, x2, y2 });
        }
        Ok(Self { x1, y1, x2, y2 })
    }

    #[inline]
    pub fn x1(&self) -> i32 {
        self.x1
    }

    #[inline]
    pub fn y1(&self) -> i32 {
        self.y1
    }

    #[inline]
    pub fn x2(&self) -> i32 {
        self.x2
    }

    #[inline]
    pub fn y2(&self) -> i32 {
        self.y2
    }

    /// Box width in pixels.
    #[inline]
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    /// Box height in pixels.
    #[inline]
    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    /// Box area in pixels.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Center point of the box.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x1 + self.x2) as f64 / 2.0,
            (self.y1 + self.y2) as f64 / 2.0,
        )
    }

    /// Multiply all four coordinates by `factor`, truncating to integers.
    ///
    /// Truncation (not round-to-nearest) matches how preview coordinates
    /// were produced and is the documented policy.
    pub fn scale(&self, factor: f64) -> PixelBox {
        PixelBox {
            x1: (self.x1 as f64 * factor) as i32,
            y1: (self.y1 as f64 * factor) as i32,
            x2: (self.x2 as f64 * factor) as i32,
            y2: (self.y2 as f64 * factor) as i32,
        }
    }

    /// Expand the box by `pad_frac` of its width/height on each side.
    pub fn pad_frac(&self, pad_frac: f64) -> PixelBox {
        let pad_x = (self.width() as f64 * pad_frac) as i32;
        let pad_y = (self.height() as f64 * pad_frac) as i32;
        PixelBox {
            x1: self.x1 - pad_x,
            y1: self.y1 - pad_y,
            x2: self.x2 + pad_x,
            y2: self.y2 + pad_y,
        }
    }

    /// Intersect the box with a `frame_width` x `frame_height` frame.
    ///
    /// Returns `None` when the clamped rectangle has zero or negative
    /// area, i.e. the box lies entirely outside the frame.
    pub fn clamp_to(&self, frame_width: i32, frame_height: i32) -> Option<PixelBox> {
        let x1 = self.x1.max(0);
        let y1 = self.y1.max(0);
        let x2 = self.x2.min(frame_width);
        let y2 = self.y2.min(frame_height);
        if x2 <= x1 || y2 <= y1 {
            return None;
        }
        Some(PixelBox { x1, y1, x2, y2 })
    }
}

impl TryFrom<[i32; 4]> for PixelBox {
    type Error = BoxError;

    fn try_from(v: [i32; 4]) -> Result<Self, Self::Error> {
        PixelBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<PixelBox> for [i32; 4] {
    fn from(b: PixelBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_inverted_corners() {
        assert!(PixelBox::new(10, 10, 5, 20).is_err());
        assert!(PixelBox::new(10, 10, 20, 5).is_err());
        assert!(PixelBox::new(10, 10, 10, 10).is_ok());
    }

    #[test]
    fn test_geometry_helpers() {
        let b = PixelBox::new(100, 100, 200, 300).unwrap();
        assert_eq!(b.width(), 100);
        assert_eq!(b.height(), 200);
        assert_eq!(b.area(), 20_000);
        assert_eq!(b.center(), (150.0, 200.0));
    }

    #[test]
    fn test_scale_truncates() {
        let b = PixelBox::new(1, 1, 3, 3).unwrap();
        let scaled = b.scale(1.5);
        assert_eq!(<[i32; 4]>::from(scaled), [1, 1, 4, 4]);
    }

    #[test]
    fn test_clamp_to_frame() {
        let b = PixelBox::new(-50, -50, 100, 100).unwrap();
        let clamped = b.clamp_to(640, 480).unwrap();
        assert_eq!(<[i32; 4]>::from(clamped), [0, 0, 100, 100]);

        // Entirely outside the frame: degenerate, no rectangle
        let outside = PixelBox::new(700, 500, 800, 600).unwrap();
        assert!(outside.clamp_to(640, 480).is_none());
    }

    #[test]
    fn test_wire_format_roundtrip() {
        let b = PixelBox::new(10, 20, 30, 40).unwrap();
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "[10,20,30,40]");
        let back: PixelBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);

        let bad: Result<PixelBox, _> = serde_json::from_str("[30,20,10,40]");
        assert!(bad.is_err());
    }
}
