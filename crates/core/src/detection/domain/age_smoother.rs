use crate::shared::constants::{DEFAULT_AGE_WEIGHT_NEW, DEFAULT_AGE_WEIGHT_OLD};

/// Exponential smoothing of the scalar age estimate.
///
/// `smoothed = previous * weight_old + current * weight_new`
///
/// The weights are expected to sum to 1; that is a configuration invariant
/// validated at the boundary, not enforced here. With weights summing to 1
/// the output is a convex combination, so it stays between the two inputs
/// and finite non-negative inputs yield a finite non-negative output.
#[derive(Clone, Copy, Debug)]
pub struct AgeSmoother {
    weight_new: f64,
    weight_old: f64,
}

impl AgeSmoother {
    pub fn new(weight_new: f64, weight_old: f64) -> Self {
        Self {
            weight_new,
            weight_old,
        }
    }

    pub fn smooth(&self, current_age: f64, previous_smoothed_age: f64) -> f64 {
        previous_smoothed_age * self.weight_old + current_age * self.weight_new
    }
}

impl Default for AgeSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_AGE_WEIGHT_NEW, DEFAULT_AGE_WEIGHT_OLD)
    }
}
