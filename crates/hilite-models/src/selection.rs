//! User player selections handed to the pipeline by the external UI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::rect::PixelBox;

/// A user-chosen (frame, player-box) pair to be highlighted.
///
/// The box is expressed in the preview resolution the UI displayed
/// (800 px reference width), not necessarily the source resolution.
/// `frame_index` refers to the source's decode order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    /// Source frame index in decode order
    pub frame_index: u64,
    /// Player box in preview resolution
    #[serde(rename = "box")]
    pub bbox: PixelBox,
    /// Confidence the preview detection carried, if any
    pub confidence: f32,
}

impl Selection {
    pub fn new(frame_index: u64, bbox: PixelBox, confidence: f32) -> Self {
        Self {
            frame_index,
            bbox,
            confidence,
        }
    }
}

/// Sort selections ascending by frame index.
///
/// The assembler visits selections strictly in ascending order, so this
/// runs once before a job starts.
pub fn sort_selections(selections: &mut [Selection]) {
    selections.sort_by_key(|s| s.frame_index);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorts_by_frame_index() {
        let b = PixelBox::new(0, 0, 10, 10).unwrap();
        let mut sels = vec![
            Selection::new(90, b, 0.8),
            Selection::new(10, b, 0.8),
            Selection::new(40, b, 0.8),
        ];
        sort_selections(&mut sels);
        let order: Vec<u64> = sels.iter().map(|s| s.frame_index).collect();
        assert_eq!(order, vec![10, 40, 90]);
    }

    #[test]
    fn test_wire_shape() {
        let json = r#"{"frameIndex": 42, "box": [10, 20, 30, 40], "confidence": 0.75}"#;
        let s: Selection = serde_json::from_str(json).unwrap();
        assert_eq!(s.frame_index, 42);
        assert_eq!(<[i32; 4]>::from(s.bbox), [10, 20, 30, 40]);
    }
}
