use std::collections::VecDeque;
use std::fmt;

use crate::shared::bounding_box::BoundingBox;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// One face as reported by the external detector for a single frame.
///
/// The detector is a black box; its output is assumed frame-synchronous,
/// with `age >= 0` and `gender_probability` in `[0, 1]`. Violations are a
/// caller contract breach, not a runtime error the core recovers from.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawDetection {
    pub bbox: BoundingBox,
    pub age: f64,
    pub gender: Gender,
    pub gender_probability: f64,
}

/// Bounded FIFO window of recent raw gender labels.
///
/// Length never exceeds the configured capacity; the oldest label is
/// evicted on overflow. Insertion order is preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct GenderHistory {
    entries: VecDeque<Gender>,
    capacity: usize,
}

impl GenderHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// A history seeded with a single label, the new-face initialization.
    pub fn seeded(capacity: usize, gender: Gender) -> Self {
        let mut history = Self::new(capacity);
        history.push(gender);
        history
    }

    /// Appends a label, evicting the oldest entry when full.
    pub fn push(&mut self, gender: Gender) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(gender);
    }

    /// Counts `(male, female)` votes over the window.
    pub fn votes(&self) -> (usize, usize) {
        let male = self
            .entries
            .iter()
            .filter(|&&g| g == Gender::Male)
            .count();
        (male, self.entries.len() - male)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Labels oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Gender> {
        self.entries.iter()
    }
}

/// A face's running smoothed record.
///
/// Lives for exactly one frame unless re-matched; an unmatched face is
/// dropped, not aged. The box always holds the current frame's geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedFace {
    pub bbox: BoundingBox,
    pub smoothed_age: f64,
    pub smoothed_gender: Gender,
    pub gender_history: GenderHistory,
}

/// The full tracked output of the most recently processed frame, the only
/// state carried between cycles. Replaced wholesale, never merged.
pub type TrackedFrameState = Vec<TrackedFace>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "male");
        assert_eq!(Gender::Female.to_string(), "female");
    }

    #[test]
    fn test_gender_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
        let g: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(g, Gender::Female);
    }

    #[test]
    fn test_history_push_and_order() {
        let mut h = GenderHistory::new(3);
        h.push(Gender::Male);
        h.push(Gender::Female);
        let labels: Vec<_> = h.iter().copied().collect();
        assert_eq!(labels, vec![Gender::Male, Gender::Female]);
    }

    #[test]
    fn test_history_evicts_oldest_on_overflow() {
        let mut h = GenderHistory::new(2);
        h.push(Gender::Male);
        h.push(Gender::Male);
        h.push(Gender::Female);
        assert_eq!(h.len(), 2);
        let labels: Vec<_> = h.iter().copied().collect();
        assert_eq!(labels, vec![Gender::Male, Gender::Female]);
    }

    #[test]
    fn test_history_length_never_exceeds_capacity() {
        let mut h = GenderHistory::new(5);
        for _ in 0..100 {
            h.push(Gender::Female);
            assert!(h.len() <= 5);
        }
        assert_eq!(h.len(), 5);
    }

    #[rstest]
    #[case(&[], (0, 0))]
    #[case(&[Gender::Male], (1, 0))]
    #[case(&[Gender::Male, Gender::Female, Gender::Female], (1, 2))]
    #[case(&[Gender::Female, Gender::Female], (0, 2))]
    fn test_history_votes(#[case] labels: &[Gender], #[case] expected: (usize, usize)) {
        let mut h = GenderHistory::new(10);
        for &g in labels {
            h.push(g);
        }
        assert_eq!(h.votes(), expected);
    }

    #[test]
    fn test_seeded_history() {
        let h = GenderHistory::seeded(10, Gender::Female);
        assert_eq!(h.len(), 1);
        assert_eq!(h.votes(), (0, 1));
    }

    #[test]
    fn test_detection_serde_round_trip() {
        let det = RawDetection {
            bbox: crate::shared::bounding_box::BoundingBox::new(1.0, 2.0, 30.0, 40.0),
            age: 27.5,
            gender: Gender::Female,
            gender_probability: 0.92,
        };
        let json = serde_json::to_string(&det).unwrap();
        let back: RawDetection = serde_json::from_str(&json).unwrap();
        assert_eq!(det, back);
    }
}
