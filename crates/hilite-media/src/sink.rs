//! Frame sinks: append-only consumers producing the output container.

use std::path::{Path, PathBuf};

use opencv::core::{Mat, Size};
use opencv::prelude::{VideoWriterTrait, VideoWriterTraitConst};
use opencv::videoio::VideoWriter;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// An append-only frame consumer.
///
/// Output fps and dimensions are fixed at construction and match the
/// source; frames are written in output order.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &Mat) -> MediaResult<()>;
}

/// File-backed sink over OpenCV's `VideoWriter` (mp4v container).
///
/// The writer handle is released on drop, so the file is finalized on
/// every exit path.
pub struct VideoFileSink {
    path: PathBuf,
    writer: VideoWriter,
    frames_written: u64,
}

impl VideoFileSink {
    /// Create the output file with the given fps and frame size.
    pub fn create(path: impl AsRef<Path>, fps: f64, width: i32, height: i32) -> MediaResult<Self> {
        let path = path.as_ref().to_path_buf();
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let writer = VideoWriter::new(
            &path.to_string_lossy(),
            fourcc,
            fps,
            Size::new(width, height),
            true,
        )?;
        if !writer.is_opened()? {
            return Err(MediaError::SinkCreateFailed(path));
        }

        debug!(path = %path.display(), fps, width, height, "Opened video sink");

        Ok(Self {
            path,
            writer,
            frames_written: 0,
        })
    }

    /// Output path this writer appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of frames written so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl FrameSink for VideoFileSink {
    fn write_frame(&mut self, frame: &Mat) -> MediaResult<()> {
        self.writer
            .write(frame)
            .map_err(|_| MediaError::SinkWriteFailed {
                frame: self.frames_written,
            })?;
        self.frames_written += 1;
        Ok(())
    }
}
