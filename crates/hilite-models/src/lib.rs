//! Shared data models for the hilite backend.
//!
//! This crate provides Serde-serializable types for:
//! - Pixel-space bounding boxes and detections
//! - User player selections
//! - Highlight jobs and their status records

pub mod detection;
pub mod job;
pub mod job_status;
pub mod rect;
pub mod selection;

// Re-export common types
pub use detection::{Detection, DetectionClass, FrameDetections};
pub use job::{HighlightJob, JobId};
pub use job_status::{JobStatus, JobStatusRecord};
pub use rect::{BoxError, PixelBox};
pub use selection::{sort_selections, Selection};
