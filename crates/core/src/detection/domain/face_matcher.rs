use crate::detection::domain::face::TrackedFace;
use crate::shared::bounding_box::BoundingBox;

/// Finds the tracked face from the previous frame closest to `current`.
///
/// Candidates must lie strictly under `max_distance` (center to center);
/// among them the minimum distance wins, and the first entry with the
/// minimal distance wins ties because only a strict improvement replaces
/// the running best.
///
/// Matching is greedy per detection with no exclusivity: two detections in
/// the same frame may both match one previous face.
pub fn find_match<'a>(
    current: &BoundingBox,
    previous: &'a [TrackedFace],
    max_distance: f64,
) -> Option<&'a TrackedFace> {
    let mut min_dist = f64::INFINITY;
    let mut best: Option<&TrackedFace> = None;

    for candidate in previous {
        let dist = current.center_distance(&candidate.bbox);
        if dist < max_distance && dist < min_dist {
            min_dist = dist;
            best = Some(candidate);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::domain::face::{Gender, GenderHistory};

    fn tracked(x: f64, y: f64, age: f64) -> TrackedFace {
        TrackedFace {
            bbox: BoundingBox::new(x, y, 100.0, 100.0),
            smoothed_age: age,
            smoothed_gender: Gender::Male,
            gender_history: GenderHistory::seeded(10, Gender::Male),
        }
    }

    #[test]
    fn test_empty_previous_returns_none() {
        let current = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert!(find_match(&current, &[], 200.0).is_none());
    }

    #[test]
    fn test_all_candidates_too_far_returns_none() {
        let current = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let previous = vec![tracked(500.0, 0.0, 30.0), tracked(0.0, 500.0, 40.0)];
        assert!(find_match(&current, &previous, 200.0).is_none());
    }

    #[test]
    fn test_distance_equal_to_max_is_rejected() {
        // Centers exactly 200px apart: the bound is strict.
        let current = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let previous = vec![tracked(200.0, 0.0, 30.0)];
        assert!(find_match(&current, &previous, 200.0).is_none());
    }

    #[test]
    fn test_picks_nearest_of_several() {
        let current = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let previous = vec![
            tracked(80.0, 0.0, 31.0),
            tracked(10.0, 10.0, 32.0),
            tracked(60.0, 60.0, 33.0),
        ];
        let m = find_match(&current, &previous, 200.0).unwrap();
        assert_eq!(m.smoothed_age, 32.0);
    }

    #[test]
    fn test_tie_first_entry_wins() {
        // Two candidates at identical distance; the later one never
        // satisfies dist < min_dist.
        let current = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let previous = vec![tracked(50.0, 0.0, 31.0), tracked(-50.0, 0.0, 32.0)];
        let m = find_match(&current, &previous, 200.0).unwrap();
        assert_eq!(m.smoothed_age, 31.0);
    }

    #[test]
    fn test_no_exclusivity_two_detections_can_share_a_match() {
        // Greedy per-detection matching: both current boxes resolve to the
        // single previous face.
        let previous = vec![tracked(0.0, 0.0, 30.0)];
        let a = BoundingBox::new(10.0, 0.0, 100.0, 100.0);
        let b = BoundingBox::new(0.0, 10.0, 100.0, 100.0);
        let ma = find_match(&a, &previous, 200.0).unwrap();
        let mb = find_match(&b, &previous, 200.0).unwrap();
        assert!(std::ptr::eq(ma, mb));
    }

    #[test]
    fn test_is_pure_previous_unchanged() {
        let current = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let previous = vec![tracked(10.0, 10.0, 30.0)];
        let snapshot = previous.clone();
        let _ = find_match(&current, &previous, 200.0);
        assert_eq!(previous, snapshot);
    }
}
