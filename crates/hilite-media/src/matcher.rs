//! Player re-identification within a single frame's detections.
//!
//! Detection results are recomputed per frame, so the player a user
//! picked in the preview has to be re-located in the current detection
//! set by proximity to the stored reference position.

use hilite_models::Detection;

/// Default maximum center distance, in source pixels, for a confident
/// re-identification.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 200.0;

/// Find the detection whose center is nearest to `reference_center`.
///
/// Returns the candidate only if its distance is strictly below
/// `threshold`; otherwise `None`, meaning no confident
/// re-identification — callers fall back to the mapped reference box
/// rather than failing. Ties keep the first candidate in input order,
/// an arbitrary but deterministic policy kept for reproducibility.
pub fn match_nearest<'a>(
    candidates: &'a [Detection],
    reference_center: (f64, f64),
    threshold: f64,
) -> Option<&'a Detection> {
    let mut best: Option<(&Detection, f64)> = None;

    for candidate in candidates {
        let (cx, cy) = candidate.center();
        let dx = reference_center.0 - cx;
        let dy = reference_center.1 - cy;
        let distance = (dx * dx + dy * dy).sqrt();

        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((candidate, distance)),
        }
    }

    match best {
        Some((detection, distance)) if distance < threshold => Some(detection),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hilite_models::PixelBox;

    fn det(x1: i32, y1: i32, x2: i32, y2: i32) -> Detection {
        Detection::new(PixelBox::new(x1, y1, x2, y2).unwrap(), 0.9)
    }

    #[test]
    fn test_picks_nearest_candidate() {
        let candidates = vec![
            det(500, 500, 600, 600), // center (550, 550)
            det(100, 100, 200, 200), // center (150, 150)
        ];
        let matched = match_nearest(&candidates, (160.0, 160.0), 200.0).unwrap();
        assert_eq!(matched.bbox, candidates[1].bbox);
    }

    #[test]
    fn test_none_beyond_threshold() {
        // Nearest center is 250 px away; threshold 200 means no match
        let candidates = vec![det(250, 0, 250, 0)];
        assert!(match_nearest(&candidates, (0.0, 0.0), 200.0).is_none());
    }

    #[test]
    fn test_none_on_empty_candidates() {
        assert!(match_nearest(&[], (0.0, 0.0), 200.0).is_none());
    }

    #[test]
    fn test_tie_keeps_first_in_input_order() {
        // Both centers are exactly 100 px from the reference
        let candidates = vec![
            det(100, 0, 100, 0),  // center (100, 0)
            det(0, 100, 0, 100),  // center (0, 100)
        ];
        let matched = match_nearest(&candidates, (0.0, 0.0), 200.0).unwrap();
        assert_eq!(matched.bbox, candidates[0].bbox);
    }

    #[test]
    fn test_distance_equal_to_threshold_is_no_match() {
        let candidates = vec![det(200, 0, 200, 0)];
        assert!(match_nearest(&candidates, (0.0, 0.0), 200.0).is_none());
        assert!(match_nearest(&candidates, (0.0, 0.0), 200.1).is_some());
    }
}
