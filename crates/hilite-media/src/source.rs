//! Frame sources: sequential decode-order frame iteration.

use std::path::{Path, PathBuf};

use opencv::core::Mat;
use opencv::prelude::{MatTraitConst, VideoCaptureTrait, VideoCaptureTraitConst};
use opencv::videoio::{
    VideoCapture, CAP_ANY, CAP_PROP_FPS, CAP_PROP_FRAME_COUNT, CAP_PROP_FRAME_HEIGHT,
    CAP_PROP_FRAME_WIDTH, CAP_PROP_POS_FRAMES,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Basic properties of a video source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub fps: f64,
    pub width: i32,
    pub height: i32,
    pub total_frames: u64,
    /// Duration in seconds, derived from frame count and fps
    pub duration: f64,
}

/// A sequential, decode-order frame iterator.
///
/// `read_frame` returning `Ok(None)` is the normal end of stream, never
/// an error. `seek` supports the single-frame preview path; the
/// assembler itself only reads forward.
pub trait FrameSource {
    fn fps(&self) -> f64;
    fn width(&self) -> i32;
    fn height(&self) -> i32;
    fn total_frames(&self) -> u64;
    fn read_frame(&mut self) -> MediaResult<Option<Mat>>;
    fn seek(&mut self, frame_index: u64) -> MediaResult<()>;
}

/// File-backed frame source over OpenCV's `VideoCapture`.
pub struct VideoFileSource {
    path: PathBuf,
    cap: VideoCapture,
    fps: f64,
    width: i32,
    height: i32,
    total_frames: u64,
}

impl VideoFileSource {
    /// Open a video file for sequential reading.
    pub fn open(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let path_str = path.to_string_lossy();

        let cap = VideoCapture::from_file(&path_str, CAP_ANY)?;
        if !cap.is_opened()? {
            return Err(MediaError::SourceUnavailable(path));
        }

        let fps = cap.get(CAP_PROP_FPS)?;
        let width = cap.get(CAP_PROP_FRAME_WIDTH)? as i32;
        let height = cap.get(CAP_PROP_FRAME_HEIGHT)? as i32;
        let total_frames = cap.get(CAP_PROP_FRAME_COUNT)?.max(0.0) as u64;

        if width <= 0 || height <= 0 {
            return Err(MediaError::SourceUnavailable(path));
        }

        debug!(
            path = %path.display(),
            fps, width, height, total_frames,
            "Opened video source"
        );

        Ok(Self {
            path,
            cap,
            fps,
            width,
            height,
            total_frames,
        })
    }

    /// Source path this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Summarize the source's properties.
    pub fn info(&self) -> VideoInfo {
        let duration = if self.fps > 0.0 {
            self.total_frames as f64 / self.fps
        } else {
            0.0
        };
        VideoInfo {
            fps: self.fps,
            width: self.width,
            height: self.height,
            total_frames: self.total_frames,
            duration,
        }
    }
}

impl FrameSource for VideoFileSource {
    fn fps(&self) -> f64 {
        self.fps
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn total_frames(&self) -> u64 {
        self.total_frames
    }

    fn read_frame(&mut self) -> MediaResult<Option<Mat>> {
        let mut frame = Mat::default();
        let got = self.cap.read(&mut frame)?;
        if !got || frame.empty() {
            return Ok(None);
        }
        Ok(Some(frame))
    }

    fn seek(&mut self, frame_index: u64) -> MediaResult<()> {
        if self.total_frames > 0 && frame_index >= self.total_frames {
            return Err(MediaError::FrameOutOfRange(frame_index, self.total_frames));
        }
        self.cap.set(CAP_PROP_POS_FRAMES, frame_index as f64)?;
        Ok(())
    }
}
