//! YOLOv8 ONNX detector adapter via OpenCV's DNN module.
//!
//! Loads a COCO-trained YOLOv8 model file and implements [`Detector`]
//! over it: blob preprocessing, raw output decode, confidence filter,
//! per-class non-maximum suppression, and partitioning into the player
//! and ball kinds the pipeline tracks.

use std::path::{Path, PathBuf};

use opencv::core::{self, Mat, Rect2d, Scalar, Size, Vector};
use opencv::dnn::{self, Net};
use opencv::prelude::{MatTraitConst, NetTrait, NetTraitConst};
use tracing::debug;

use hilite_models::{Detection, DetectionClass, FrameDetections, PixelBox};

use crate::detect::{Detector, CONFIDENCE_THRESHOLD};
use crate::error::{MediaError, MediaResult};

/// Square input size the model expects.
const INPUT_SIZE: i32 = 640;

/// IoU threshold for non-maximum suppression.
const NMS_THRESHOLD: f32 = 0.45;

/// COCO classes + box layout of the YOLOv8 output head: 4 box rows
/// followed by 80 class-score rows.
const BOX_ROWS: i32 = 4;
const CLASS_ROWS: i32 = 80;

/// OpenCV DNN-backed YOLOv8 detector.
pub struct YoloDetector {
    net: Net,
    model_path: PathBuf,
}

impl YoloDetector {
    /// Load the ONNX model from disk.
    pub fn load(model_path: impl AsRef<Path>) -> MediaResult<Self> {
        let model_path = model_path.as_ref().to_path_buf();
        if !model_path.exists() {
            return Err(MediaError::ModelNotFound(model_path));
        }

        let net = dnn::read_net_from_onnx(&model_path.to_string_lossy())?;
        debug!(model = %model_path.display(), "Loaded YOLO model");

        Ok(Self { net, model_path })
    }

    /// Path the model was loaded from.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Decode one raw output tensor (1 x 84 x N) into detections for a
    /// frame of the given size.
    fn decode_output(
        &self,
        output: &Mat,
        frame_width: i32,
        frame_height: i32,
    ) -> MediaResult<FrameDetections> {
        // Flatten to 84 rows x N anchor columns
        let rows = output.reshape(1, BOX_ROWS + CLASS_ROWS)?.try_clone()?;
        let anchors = rows.cols();

        let scale_x = frame_width as f64 / INPUT_SIZE as f64;
        let scale_y = frame_height as f64 / INPUT_SIZE as f64;

        let mut boxes: Vec<(DetectionClass, Rect2d, f32)> = Vec::new();

        for col in 0..anchors {
            let mut best_class = 0;
            let mut best_score = 0.0f32;
            for class_idx in 0..CLASS_ROWS {
                let score = *rows.at_2d::<f32>(BOX_ROWS + class_idx, col)?;
                if score > best_score {
                    best_score = score;
                    best_class = class_idx;
                }
            }

            if best_score < CONFIDENCE_THRESHOLD {
                continue;
            }
            let class = match DetectionClass::from_class_id(best_class) {
                Some(c) => c,
                None => continue,
            };

            let cx = *rows.at_2d::<f32>(0, col)? as f64 * scale_x;
            let cy = *rows.at_2d::<f32>(1, col)? as f64 * scale_y;
            let w = *rows.at_2d::<f32>(2, col)? as f64 * scale_x;
            let h = *rows.at_2d::<f32>(3, col)? as f64 * scale_y;

            boxes.push((
                class,
                Rect2d::new(cx - w / 2.0, cy - h / 2.0, w, h),
                best_score,
            ));
        }

        let mut detections = FrameDetections::default();
        for class in [DetectionClass::Player, DetectionClass::Ball] {
            let kept = nms_for_class(&boxes, class)?;
            let dest = match class {
                DetectionClass::Player => &mut detections.players,
                DetectionClass::Ball => &mut detections.balls,
            };
            for (rect, score) in kept {
                let x1 = rect.x.max(0.0) as i32;
                let y1 = rect.y.max(0.0) as i32;
                let x2 = ((rect.x + rect.width) as i32).min(frame_width).max(x1);
                let y2 = ((rect.y + rect.height) as i32).min(frame_height).max(y1);
                if let Ok(bbox) = PixelBox::new(x1, y1, x2, y2) {
                    dest.push(Detection::new(bbox, score));
                }
            }
        }

        Ok(detections)
    }
}

/// Run NMS over the candidates of one class, returning kept boxes.
fn nms_for_class(
    boxes: &[(DetectionClass, Rect2d, f32)],
    class: DetectionClass,
) -> MediaResult<Vec<(Rect2d, f32)>> {
    let mut rects: Vector<Rect2d> = Vector::new();
    let mut scores: Vector<f32> = Vector::new();
    for (c, rect, score) in boxes {
        if *c == class {
            rects.push(*rect);
            scores.push(*score);
        }
    }
    if rects.is_empty() {
        return Ok(Vec::new());
    }

    let mut indices: Vector<i32> = Vector::new();
    dnn::nms_boxes_f64(
        &rects,
        &scores,
        CONFIDENCE_THRESHOLD,
        NMS_THRESHOLD,
        &mut indices,
        1.0,
        0,
    )?;

    let mut kept = Vec::with_capacity(indices.len());
    for idx in indices.iter() {
        kept.push((rects.get(idx as usize)?, scores.get(idx as usize)?));
    }
    Ok(kept)
}

impl Detector for YoloDetector {
    fn detect(&mut self, frame: &Mat) -> MediaResult<FrameDetections> {
        let blob = dnn::blob_from_image(
            frame,
            1.0 / 255.0,
            Size::new(INPUT_SIZE, INPUT_SIZE),
            Scalar::default(),
            true,
            false,
            core::CV_32F,
        )?;

        self.net.set_input(&blob, "", 1.0, Scalar::default())?;

        let mut outputs: Vector<Mat> = Vector::new();
        let out_names = self.net.get_unconnected_out_layers_names()?;
        self.net.forward(&mut outputs, &out_names)?;

        let output = outputs
            .get(0)
            .map_err(|_| MediaError::detection_failed("model produced no output tensor"))?;

        self.decode_output(&output, frame.cols(), frame.rows())
    }
}
