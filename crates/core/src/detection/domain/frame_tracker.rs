use crate::detection::domain::age_smoother::AgeSmoother;
use crate::detection::domain::face::{RawDetection, TrackedFace, TrackedFrameState};
use crate::detection::domain::face_matcher::find_match;
use crate::detection::domain::gender_smoother::GenderSmoother;
use crate::shared::constants::{
    DEFAULT_AGE_WEIGHT_NEW, DEFAULT_AGE_WEIGHT_OLD, DEFAULT_GENDER_HIGH_CONFIDENCE,
    DEFAULT_GENDER_HISTORY_SIZE, DEFAULT_GENDER_MEDIUM_CONFIDENCE, DEFAULT_MAX_TRACKING_DISTANCE,
};

/// Session-static tracking and smoothing parameters.
#[derive(Clone, Copy, Debug)]
pub struct TrackerConfig {
    pub max_tracking_distance: f64,
    pub age_weight_new: f64,
    pub age_weight_old: f64,
    pub gender_history_size: usize,
    pub gender_high_confidence: f64,
    pub gender_medium_confidence: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_tracking_distance: DEFAULT_MAX_TRACKING_DISTANCE,
            age_weight_new: DEFAULT_AGE_WEIGHT_NEW,
            age_weight_old: DEFAULT_AGE_WEIGHT_OLD,
            gender_history_size: DEFAULT_GENDER_HISTORY_SIZE,
            gender_high_confidence: DEFAULT_GENDER_HIGH_CONFIDENCE,
            gender_medium_confidence: DEFAULT_GENDER_MEDIUM_CONFIDENCE,
        }
    }
}

/// Orchestrates one frame cycle: associate each raw detection with the
/// previous frame's tracked faces, then stabilize age and gender.
///
/// Matched detections blend into their prior record; unmatched ones start
/// fresh with raw values and a single-element history. The returned state
/// replaces the previous one wholesale; an unmatched previous face simply
/// does not reappear.
pub struct FrameTracker {
    config: TrackerConfig,
    age_smoother: AgeSmoother,
    gender_smoother: GenderSmoother,
}

impl FrameTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            age_smoother: AgeSmoother::new(config.age_weight_new, config.age_weight_old),
            gender_smoother: GenderSmoother::new(
                config.gender_history_size,
                config.gender_high_confidence,
                config.gender_medium_confidence,
            ),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Processes one frame's detections against the previous tracked state.
    ///
    /// Output order follows detector output order. `previous` is read-only;
    /// an empty input yields an empty state regardless of prior contents.
    pub fn process_frame(
        &self,
        detections: &[RawDetection],
        previous: &TrackedFrameState,
    ) -> TrackedFrameState {
        detections
            .iter()
            .map(|det| self.track_one(det, previous))
            .collect()
    }

    fn track_one(&self, det: &RawDetection, previous: &TrackedFrameState) -> TrackedFace {
        match find_match(&det.bbox, previous, self.config.max_tracking_distance) {
            Some(prior) => {
                let smoothed_age = self.age_smoother.smooth(det.age, prior.smoothed_age);
                let (smoothed_gender, gender_history) = self.gender_smoother.smooth(
                    det.gender,
                    det.gender_probability,
                    prior.smoothed_gender,
                    &prior.gender_history,
                );
                TrackedFace {
                    bbox: det.bbox,
                    smoothed_age,
                    smoothed_gender,
                    gender_history,
                }
            }
            None => {
                let (smoothed_gender, gender_history) = self.gender_smoother.seed(det.gender);
                TrackedFace {
                    bbox: det.bbox,
                    smoothed_age: det.age,
                    smoothed_gender,
                    gender_history,
                }
            }
        }
    }
}

impl Default for FrameTracker {
    fn default() -> Self {
        Self::new(TrackerConfig::default())
    }
}
