//! Highlight rendering: translucent fill plus opaque border over a
//! padded player box.

use opencv::core::{self, Mat, Rect, Scalar};
use opencv::imgproc;
use opencv::prelude::MatTraitConst;

use hilite_models::PixelBox;

use crate::error::MediaResult;

/// Visual parameters of the highlight region.
#[derive(Debug, Clone, Copy)]
pub struct HighlightStyle {
    /// Padding added on each side, as a fraction of box width/height
    pub pad_frac: f64,
    /// Opacity of the translucent fill
    pub fill_alpha: f64,
    /// Border stroke width in pixels
    pub border_width: i32,
    /// Highlight color in BGR order
    pub color_bgr: (f64, f64, f64),
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            pad_frac: 0.1,
            fill_alpha: 0.3,
            border_width: 3,
            color_bgr: (0.0, 0.0, 255.0),
        }
    }
}

impl HighlightStyle {
    fn scalar(&self) -> Scalar {
        Scalar::new(self.color_bgr.0, self.color_bgr.1, self.color_bgr.2, 0.0)
    }
}

/// Composite a highlight over `frame` at `bbox`, returning a new frame.
///
/// The box is expanded by `pad_frac` per side and clamped to the frame.
/// The fill blends as `color*alpha + original*(1-alpha)`; the border is
/// stroked opaque at the clamped rectangle's edge. A box whose clamped
/// region has zero or negative area (fully outside the frame) yields an
/// unmodified copy, never an error.
pub fn render_highlight(frame: &Mat, bbox: PixelBox, style: &HighlightStyle) -> MediaResult<Mat> {
    let region = bbox
        .pad_frac(style.pad_frac)
        .clamp_to(frame.cols(), frame.rows());

    let region = match region {
        Some(r) => r,
        None => return Ok(frame.try_clone()?),
    };

    let rect = Rect::new(region.x1(), region.y1(), region.width(), region.height());

    let mut overlay = frame.try_clone()?;
    imgproc::rectangle(&mut overlay, rect, style.scalar(), imgproc::FILLED, imgproc::LINE_8, 0)?;

    let mut blended = Mat::default();
    core::add_weighted(
        &overlay,
        style.fill_alpha,
        frame,
        1.0 - style.fill_alpha,
        0.0,
        &mut blended,
        -1,
    )?;

    imgproc::rectangle(
        &mut blended,
        rect,
        style.scalar(),
        style.border_width,
        imgproc::LINE_8,
        0,
    )?;

    Ok(blended)
}
