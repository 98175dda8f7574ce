//! Single-frame preview for the external selection UI.
//!
//! The UI shows individual frames downscaled to the preview reference
//! width, with the detections for that frame, so the user can click a
//! player. Selections made against these previews are mapped back to
//! source pixels by the assembler.

use opencv::core::{Mat, Size};
use opencv::imgproc;
use opencv::prelude::MatTraitConst;
use serde::{Deserialize, Serialize};

use hilite_models::FrameDetections;

use crate::detect::Detector;
use crate::error::MediaResult;
use crate::scale::PREVIEW_REFERENCE_WIDTH;
use crate::source::FrameSource;

/// One preview frame with its detections, in preview coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewFrame {
    pub frame_index: u64,
    /// Timestamp in seconds, derived from decode order and fps
    pub timestamp: f64,
    /// Preview frame width after downscaling
    pub width: i32,
    /// Preview frame height after downscaling
    pub height: i32,
    pub detections: FrameDetections,
}

/// Seek to `frame_index`, downscale to the preview width keeping
/// aspect, and run the detector on the downscaled frame.
///
/// Detections are reported in preview coordinates, matching the boxes
/// the UI will send back as selections. Sources at or below the preview
/// width are not rescaled.
pub fn preview_frame<S: FrameSource, D: Detector>(
    source: &mut S,
    detector: &mut D,
    frame_index: u64,
) -> MediaResult<Option<PreviewFrame>> {
    source.seek(frame_index)?;
    let frame = match source.read_frame()? {
        Some(f) => f,
        None => return Ok(None),
    };

    let frame = downscale_for_preview(&frame)?;
    let detections = detector.detect(&frame)?;

    let fps = source.fps();
    let timestamp = if fps > 0.0 {
        frame_index as f64 / fps
    } else {
        0.0
    };

    Ok(Some(PreviewFrame {
        frame_index,
        timestamp,
        width: frame.cols(),
        height: frame.rows(),
        detections,
    }))
}

fn downscale_for_preview(frame: &Mat) -> MediaResult<Mat> {
    let width = frame.cols();
    if width <= PREVIEW_REFERENCE_WIDTH {
        return Ok(frame.try_clone()?);
    }
    let scale = PREVIEW_REFERENCE_WIDTH as f64 / width as f64;
    let height = (frame.rows() as f64 * scale) as i32;
    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(PREVIEW_REFERENCE_WIDTH, height),
        0.0,
        0.0,
        imgproc::INTER_AREA,
    )?;
    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC3};

    use hilite_models::{Detection, PixelBox};
    use crate::error::MediaError;

    struct OneFrameSource {
        frame: Option<Mat>,
    }

    impl FrameSource for OneFrameSource {
        fn fps(&self) -> f64 {
            25.0
        }
        fn width(&self) -> i32 {
            1600
        }
        fn height(&self) -> i32 {
            900
        }
        fn total_frames(&self) -> u64 {
            100
        }
        fn read_frame(&mut self) -> MediaResult<Option<Mat>> {
            Ok(self.frame.take())
        }
        fn seek(&mut self, _frame_index: u64) -> MediaResult<()> {
            Ok(())
        }
    }

    struct OnePlayer;

    impl Detector for OnePlayer {
        fn detect(&mut self, _frame: &Mat) -> MediaResult<FrameDetections> {
            let mut out = FrameDetections::default();
            out.players
                .push(Detection::new(PixelBox::new(10, 10, 50, 90).unwrap(), 0.8));
            Ok(out)
        }
    }

    #[test]
    fn test_preview_downscales_to_reference_width() {
        let frame =
            Mat::new_rows_cols_with_default(900, 1600, CV_8UC3, Scalar::all(0.0)).unwrap();
        let mut source = OneFrameSource { frame: Some(frame) };

        let preview = preview_frame(&mut source, &mut OnePlayer, 50)
            .unwrap()
            .unwrap();
        assert_eq!(preview.width, 800);
        assert_eq!(preview.height, 450);
        assert_eq!(preview.frame_index, 50);
        assert!((preview.timestamp - 2.0).abs() < 1e-9);
        assert_eq!(preview.detections.players.len(), 1);
    }

    #[test]
    fn test_preview_past_end_is_none() {
        let mut source = OneFrameSource { frame: None };
        let preview = preview_frame(&mut source, &mut OnePlayer, 99).unwrap();
        assert!(preview.is_none());
    }

    #[test]
    fn test_small_source_not_rescaled() {
        let frame = Mat::new_rows_cols_with_default(480, 640, CV_8UC3, Scalar::all(0.0)).unwrap();
        let mut source = OneFrameSource { frame: Some(frame) };
        let preview = preview_frame(&mut source, &mut OnePlayer, 0)
            .unwrap()
            .unwrap();
        assert_eq!(preview.width, 640);
        assert_eq!(preview.height, 480);
    }

    #[test]
    fn test_seek_error_propagates() {
        struct BadSeek;
        impl FrameSource for BadSeek {
            fn fps(&self) -> f64 {
                30.0
            }
            fn width(&self) -> i32 {
                640
            }
            fn height(&self) -> i32 {
                480
            }
            fn total_frames(&self) -> u64 {
                10
            }
            fn read_frame(&mut self) -> MediaResult<Option<Mat>> {
                Ok(None)
            }
            fn seek(&mut self, frame_index: u64) -> MediaResult<()> {
                Err(MediaError::FrameOutOfRange(frame_index, 10))
            }
        }

        let result = preview_frame(&mut BadSeek, &mut OnePlayer, 50);
        assert!(matches!(result, Err(MediaError::FrameOutOfRange(50, 10))));
    }
}
