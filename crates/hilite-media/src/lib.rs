//! OpenCV-backed highlight assembly pipeline.
//!
//! This crate provides:
//! - Frame source/sink traits with `VideoCapture`/`VideoWriter` backends
//! - Preview-to-source coordinate mapping
//! - Player re-identification by center distance
//! - Alpha-blended highlight rendering
//! - The timeline assembler state machine that ties them together
//! - A YOLOv8 ONNX detector adapter behind the `Detector` trait

pub mod assembler;
pub mod detect;
pub mod error;
pub mod matcher;
pub mod preview;
pub mod render;
pub mod scale;
pub mod sink;
pub mod source;
pub mod yolo;

pub use assembler::{
    AssemblerConfig, AssemblyReport, FreezePolicy, ProgressFn, TimelineAssembler,
};
pub use detect::{Detector, CONFIDENCE_THRESHOLD};
pub use error::{MediaError, MediaResult};
pub use matcher::{match_nearest, DEFAULT_MATCH_THRESHOLD};
pub use preview::{preview_frame, PreviewFrame};
pub use render::{render_highlight, HighlightStyle};
pub use scale::{scale_to_full, PREVIEW_REFERENCE_WIDTH};
pub use sink::{FrameSink, VideoFileSink};
pub use source::{FrameSource, VideoFileSource, VideoInfo};
pub use yolo::YoloDetector;
