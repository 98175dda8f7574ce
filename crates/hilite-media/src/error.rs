//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during highlight assembly.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Could not open video source: {0}")]
    SourceUnavailable(PathBuf),

    #[error("Could not create video sink: {0}")]
    SinkCreateFailed(PathBuf),

    #[error("Failed to write frame {frame} to sink")]
    SinkWriteFailed { frame: u64 },

    #[error("Detection failed: {0}")]
    DetectionFailed(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Frame index {0} out of range (total {1})")]
    FrameOutOfRange(u64, u64),

    #[error("Model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
