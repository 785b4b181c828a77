use crate::detection::domain::face::{Gender, GenderHistory};
use crate::shared::constants::{
    DEFAULT_GENDER_HIGH_CONFIDENCE, DEFAULT_GENDER_HISTORY_SIZE, DEFAULT_GENDER_MEDIUM_CONFIDENCE,
};

/// Confidence-gated, history-backed smoothing of the categorical gender
/// estimate.
///
/// Three tiers, evaluated in order:
/// - high confidence: trust the current frame outright;
/// - medium confidence: trust it only when the historical vote window
///   agrees by strict majority, otherwise keep the previous label;
/// - low confidence: keep the previous label.
///
/// The raw label is recorded into the history in every tier, so even
/// rejected labels accumulate toward a future majority. The result is
/// hysteresis: confident flips land immediately, uncertain ones need
/// corroboration.
#[derive(Clone, Copy, Debug)]
pub struct GenderSmoother {
    history_size: usize,
    high_confidence: f64,
    medium_confidence: f64,
}

impl GenderSmoother {
    pub fn new(history_size: usize, high_confidence: f64, medium_confidence: f64) -> Self {
        Self {
            history_size,
            high_confidence,
            medium_confidence,
        }
    }

    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Smooths one frame's gender estimate for a matched face.
    ///
    /// Returns the stabilized label and the updated bounded history. Pure:
    /// the prior history is cloned, not mutated.
    pub fn smooth(
        &self,
        current_gender: Gender,
        current_probability: f64,
        previous_smoothed_gender: Gender,
        prior_history: &GenderHistory,
    ) -> (Gender, GenderHistory) {
        let mut history = prior_history.clone();
        history.push(current_gender);

        let (male_votes, female_votes) = history.votes();

        let smoothed = if current_probability > self.high_confidence {
            current_gender
        } else if current_probability > self.medium_confidence {
            let has_majority = match current_gender {
                Gender::Male => male_votes > female_votes,
                Gender::Female => female_votes > male_votes,
            };
            if has_majority {
                current_gender
            } else {
                previous_smoothed_gender
            }
        } else {
            previous_smoothed_gender
        };

        (smoothed, history)
    }

    /// New-face initialization: the raw label is adopted as-is with a
    /// single-element history. The tier logic never runs here.
    pub fn seed(&self, current_gender: Gender) -> (Gender, GenderHistory) {
        (
            current_gender,
            GenderHistory::seeded(self.history_size, current_gender),
        )
    }
}

impl Default for GenderSmoother {
    fn default() -> Self {
        Self::new(
            DEFAULT_GENDER_HISTORY_SIZE,
            DEFAULT_GENDER_HIGH_CONFIDENCE,
            DEFAULT_GENDER_MEDIUM_CONFIDENCE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn history(labels: &[Gender]) -> GenderHistory {
        let mut h = GenderHistory::new(DEFAULT_GENDER_HISTORY_SIZE);
        for &g in labels {
            h.push(g);
        }
        h
    }

    #[rstest]
    #[case(Gender::Male, Gender::Female)]
    #[case(Gender::Female, Gender::Male)]
    fn test_high_confidence_trusts_current(#[case] current: Gender, #[case] previous: Gender) {
        let s = GenderSmoother::default();
        // History heavily favors the previous label; irrelevant above the
        // high threshold.
        let h = history(&[previous, previous, previous, previous]);
        let (smoothed, _) = s.smooth(current, 0.95, previous, &h);
        assert_eq!(smoothed, current);
    }

    #[test]
    fn test_medium_confidence_with_majority_trusts_current() {
        let s = GenderSmoother::default();
        let h = history(&[Gender::Female, Gender::Female]);
        // After append: 2 female + 1 female... make majority for current.
        let (smoothed, _) = s.smooth(Gender::Female, 0.80, Gender::Male, &h);
        assert_eq!(smoothed, Gender::Female);
    }

    #[test]
    fn test_medium_confidence_without_majority_keeps_previous() {
        // History [male], female arrives at 0.80.
        // After append: 1 male, 1 female, no strict majority for female.
        let s = GenderSmoother::default();
        let h = history(&[Gender::Male]);
        let (smoothed, updated) = s.smooth(Gender::Female, 0.80, Gender::Male, &h);
        assert_eq!(smoothed, Gender::Male);
        let labels: Vec<_> = updated.iter().copied().collect();
        assert_eq!(labels, vec![Gender::Male, Gender::Female]);
    }

    #[test]
    fn test_medium_tie_is_not_a_majority() {
        let s = GenderSmoother::default();
        let h = history(&[Gender::Male, Gender::Female, Gender::Male]);
        // After append: 2 male, 2 female.
        let (smoothed, _) = s.smooth(Gender::Female, 0.80, Gender::Male, &h);
        assert_eq!(smoothed, Gender::Male);
    }

    #[rstest]
    #[case(0.75)] // exactly the medium threshold: strict comparison, low tier
    #[case(0.5)]
    #[case(0.0)]
    fn test_low_confidence_always_keeps_previous(#[case] probability: f64) {
        let s = GenderSmoother::default();
        // History unanimously agrees with the current label; still ignored.
        let h = history(&[Gender::Female, Gender::Female, Gender::Female]);
        let (smoothed, _) = s.smooth(Gender::Female, probability, Gender::Male, &h);
        assert_eq!(smoothed, Gender::Male);
    }

    #[test]
    fn test_threshold_boundary_high_is_strict() {
        // Exactly 0.85 falls through to the medium tier.
        let s = GenderSmoother::default();
        let h = history(&[Gender::Male]);
        let (smoothed, _) = s.smooth(Gender::Female, 0.85, Gender::Male, &h);
        assert_eq!(smoothed, Gender::Male);
    }

    #[test]
    fn test_rejected_label_still_recorded_in_history() {
        let s = GenderSmoother::default();
        let h = history(&[Gender::Male]);
        let (_, updated) = s.smooth(Gender::Female, 0.1, Gender::Male, &h);
        assert_eq!(updated.votes(), (1, 1));
    }

    #[test]
    fn test_history_stays_bounded_across_calls() {
        let s = GenderSmoother::new(4, 0.85, 0.75);
        let mut h = GenderHistory::new(4);
        let mut gender = Gender::Male;
        for _ in 0..50 {
            let (g, updated) = s.smooth(Gender::Male, 0.9, gender, &h);
            gender = g;
            h = updated;
            assert!(h.len() <= 4);
        }
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn test_persistent_minority_flips_via_majority() {
        // Medium-confidence female frames against a male prior: rejected at
        // first, adopted once the window majority tips.
        let s = GenderSmoother::default();
        let mut h = history(&[Gender::Male, Gender::Male]);
        let mut gender = Gender::Male;
        let mut flipped_at = None;
        for i in 0..6 {
            let (g, updated) = s.smooth(Gender::Female, 0.80, gender, &h);
            gender = g;
            h = updated;
            if gender == Gender::Female && flipped_at.is_none() {
                flipped_at = Some(i);
            }
        }
        // 2 male + n female: strict female majority from the third female on.
        assert_eq!(flipped_at, Some(2));
    }

    #[test]
    fn test_smooth_does_not_mutate_prior_history() {
        let s = GenderSmoother::default();
        let h = history(&[Gender::Male]);
        let snapshot = h.clone();
        let _ = s.smooth(Gender::Female, 0.9, Gender::Male, &h);
        assert_eq!(h, snapshot);
    }

    #[test]
    fn test_seed_bypasses_tiers() {
        let s = GenderSmoother::default();
        let (gender, h) = s.seed(Gender::Female);
        assert_eq!(gender, Gender::Female);
        assert_eq!(h.len(), 1);
        assert_eq!(h.capacity(), DEFAULT_GENDER_HISTORY_SIZE);
    }
}
