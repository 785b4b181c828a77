pub mod age_gender_detector;
pub mod age_smoother;
pub mod face;
pub mod face_matcher;
pub mod frame_tracker;
pub mod gender_smoother;
