//! Timeline assembly: the freeze-frame highlight state machine.
//!
//! Walks the source frame-by-frame in decode order. Frames that match a
//! pending selection trigger a freeze: detect once, map the stored
//! preview box to source pixels, re-identify the player among the
//! current detections, render the highlight onto a copy, and emit that
//! copy for the configured freeze duration. All other frames pass
//! through unmodified.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use hilite_models::{sort_selections, Selection};

use crate::detect::Detector;
use crate::error::MediaResult;
use crate::matcher::{match_nearest, DEFAULT_MATCH_THRESHOLD};
use crate::render::{render_highlight, HighlightStyle};
use crate::scale::{scale_to_full, PREVIEW_REFERENCE_WIDTH};
use crate::sink::FrameSink;
use crate::source::FrameSource;

/// How freeze frames relate to the original timeline.
///
/// `Additive` is the default: freeze frames are inserted and the output
/// is longer than the source by the sum of freeze durations.
/// `ReplaceSource` instead discards following source frames so the
/// output keeps the source's length while playback pauses on the
/// highlight. The two differ materially in duration/sync expectations,
/// so the policy is explicit configuration, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezePolicy {
    #[default]
    Additive,
    ReplaceSource,
}

/// Assembly configuration.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// How long each freeze lasts, in seconds of output time
    pub freeze_duration_secs: f64,
    /// Maximum re-identification distance in source pixels
    pub match_threshold: f64,
    /// Reference width selection boxes were expressed against
    pub preview_width: i32,
    /// Freeze timeline policy
    pub policy: FreezePolicy,
    /// Highlight appearance
    pub style: HighlightStyle,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            freeze_duration_secs: 1.5,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            preview_width: PREVIEW_REFERENCE_WIDTH,
            policy: FreezePolicy::default(),
            style: HighlightStyle::default(),
        }
    }
}

/// Final frame accounting for one assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyReport {
    /// Source frames consumed
    pub original_frames: u64,
    /// Frames written to the sink
    pub output_frames: u64,
    /// Freeze segments actually applied
    pub freezes_applied: u64,
}

/// Progress callback, receives percentages in 0..=100.
pub type ProgressFn = Box<dyn FnMut(u8) + Send>;

/// The highlight-assembly orchestrator.
///
/// Single-threaded and strictly sequential: one frame (or one freeze
/// burst) is fully written before the next is read. The detector is
/// invoked only on selection frames, since it is the dominant cost.
pub struct TimelineAssembler<S, K, D> {
    source: S,
    sink: K,
    detector: D,
    selections: Vec<Selection>,
    config: AssemblerConfig,
    progress: Option<ProgressFn>,
}

impl<S: FrameSource, K: FrameSink, D: Detector> TimelineAssembler<S, K, D> {
    pub fn new(
        source: S,
        sink: K,
        detector: D,
        selections: Vec<Selection>,
        config: AssemblerConfig,
    ) -> Self {
        Self {
            source,
            sink,
            detector,
            selections,
            config,
            progress: None,
        }
    }

    /// Attach a progress callback. Reported values are monotonically
    /// non-decreasing and reach exactly 100 on completion.
    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Run the assembly to completion.
    pub fn run(mut self) -> MediaResult<AssemblyReport> {
        sort_selections(&mut self.selections);

        let fps = self.source.fps();
        let total_frames = self.source.total_frames();
        let full_width = self.source.width();

        let duration_frames = ((fps * self.config.freeze_duration_secs).round() as u64).max(1);
        let estimated_output = match self.config.policy {
            FreezePolicy::Additive => {
                total_frames + duration_frames * self.selections.len() as u64
            }
            FreezePolicy::ReplaceSource => total_frames,
        };

        info!(
            total_frames,
            selections = self.selections.len(),
            duration_frames,
            policy = ?self.config.policy,
            "Starting highlight assembly"
        );

        let mut original_index: u64 = 0;
        let mut output_index: u64 = 0;
        let mut selection_cursor: usize = 0;
        let mut freezes_applied: u64 = 0;
        // ReplaceSource: source frames still to discard after a freeze
        let mut skip_remaining: u64 = 0;

        loop {
            if total_frames > 0 && original_index >= total_frames {
                break;
            }
            let frame = match self.source.read_frame()? {
                Some(f) => f,
                None => break,
            };

            if skip_remaining > 0 {
                skip_remaining -= 1;
                // Every selection landing in the discarded range is spent
                // here; leaving one behind would stall the cursor for the
                // rest of the run.
                while let Some(sel) = self.selections.get(selection_cursor) {
                    if sel.frame_index > original_index {
                        break;
                    }
                    warn!(
                        frame = sel.frame_index,
                        "Selection falls inside a replaced freeze range, skipping it"
                    );
                    selection_cursor += 1;
                }
                original_index += 1;
                continue;
            }

            let pending = self
                .selections
                .get(selection_cursor)
                .filter(|s| s.frame_index == original_index)
                .copied();

            if let Some(selection) = pending {
                // FREEZE_ACTIVE: detect once, re-identify, render once,
                // emit the rendered frame duration_frames times.
                let detections = self.detector.detect(&frame)?;
                let mapped = scale_to_full(selection.bbox, full_width, self.config.preview_width);

                let target = match match_nearest(
                    &detections.players,
                    mapped.center(),
                    self.config.match_threshold,
                ) {
                    Some(detection) => {
                        debug!(
                            frame = original_index,
                            confidence = detection.confidence,
                            "Re-identified selected player"
                        );
                        detection.bbox
                    }
                    None => {
                        warn!(
                            frame = original_index,
                            candidates = detections.players.len(),
                            "No confident re-identification, using mapped selection box"
                        );
                        mapped
                    }
                };

                let rendered = render_highlight(&frame, target, &self.config.style)?;
                for _ in 0..duration_frames {
                    self.sink.write_frame(&rendered)?;
                    output_index += 1;
                    self.report_progress(output_index, estimated_output);
                }

                match self.config.policy {
                    FreezePolicy::Additive => {
                        // The source frame itself follows the freeze
                        // unchanged; the burst only pauses playback.
                        self.sink.write_frame(&frame)?;
                        output_index += 1;
                        self.report_progress(output_index, estimated_output);
                    }
                    FreezePolicy::ReplaceSource => {
                        // The rendered frame stands in for this frame and
                        // the next duration_frames - 1 source frames.
                        skip_remaining = duration_frames - 1;
                    }
                }

                selection_cursor += 1;
                // Duplicate selections on the same frame never fire twice
                while self
                    .selections
                    .get(selection_cursor)
                    .is_some_and(|s| s.frame_index == selection.frame_index)
                {
                    warn!(frame = selection.frame_index, "Duplicate selection ignored");
                    selection_cursor += 1;
                }

                freezes_applied += 1;
                original_index += 1;
                info!(
                    frame = selection.frame_index,
                    duration_frames, "Applied freeze segment"
                );
            } else {
                // PASSTHROUGH: emit the source frame unchanged.
                self.sink.write_frame(&frame)?;
                output_index += 1;
                original_index += 1;
                self.report_progress(output_index, estimated_output);
            }
        }

        if let Some(progress) = self.progress.as_mut() {
            progress(100);
        }

        let report = AssemblyReport {
            original_frames: original_index,
            output_frames: output_index,
            freezes_applied,
        };
        info!(?report, "Highlight assembly complete");
        Ok(report)
    }

    fn report_progress(&mut self, output_index: u64, estimated_output: u64) {
        if let Some(progress) = self.progress.as_mut() {
            let pct = if estimated_output == 0 {
                100
            } else {
                ((output_index * 100) / estimated_output).min(100) as u8
            };
            progress(pct);
        }
    }
}
