//! Detector adapter interface.
//!
//! The detection model is an external collaborator consumed through
//! this narrow detect-this-frame interface. Implementations are
//! stateless per frame: no memory of prior calls, so results stay a
//! pure function of the input frame. The assembler receives its
//! detector by constructor injection, which lets tests substitute a
//! deterministic stub.

use opencv::core::Mat;

use hilite_models::FrameDetections;

use crate::error::MediaResult;

/// Minimum confidence a detection must carry to be reported.
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Detect players and balls in one frame.
///
/// Output is ordered as produced by the model, confidence-filtered at
/// [`CONFIDENCE_THRESHOLD`], and partitioned into class kinds using the
/// model taxonomy's fixed class identifiers.
pub trait Detector: Send {
    fn detect(&mut self, frame: &Mat) -> MediaResult<FrameDetections>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    fn detect(&mut self, frame: &Mat) -> MediaResult<FrameDetections> {
        (**self).detect(frame)
    }
}
