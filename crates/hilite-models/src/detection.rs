//! Per-frame detection snapshots produced by the detector adapter.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::PixelBox;

/// Object classes the pipeline cares about, keyed to the COCO taxonomy
/// used by the external model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectionClass {
    Player,
    Ball,
}

impl DetectionClass {
    /// COCO class id for "person".
    pub const PERSON_CLASS_ID: i32 = 0;
    /// COCO class id for "sports ball".
    pub const SPORTS_BALL_CLASS_ID: i32 = 32;

    /// Map a raw model class id to a class the pipeline tracks.
    pub fn from_class_id(class_id: i32) -> Option<Self> {
        match class_id {
            Self::PERSON_CLASS_ID => Some(DetectionClass::Player),
            Self::SPORTS_BALL_CLASS_ID => Some(DetectionClass::Ball),
            _ => None,
        }
    }
}

/// One recognized object instance in a single frame.
///
/// Immutable snapshot; the confidence has already been filtered at the
/// adapter's threshold (0.5) before this type is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Detection {
    /// Bounding box in the frame's pixel space
    pub bbox: PixelBox,
    /// Model confidence in (0, 1]
    pub confidence: f32,
}

impl Detection {
    pub fn new(bbox: PixelBox, confidence: f32) -> Self {
        Self { bbox, confidence }
    }

    /// Center point of the detection box.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        self.bbox.center()
    }
}

/// Detector output for one frame, partitioned by class.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FrameDetections {
    pub players: Vec<Detection>,
    pub balls: Vec<Detection>,
}

impl FrameDetections {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.balls.is_empty()
    }
}
