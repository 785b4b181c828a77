/// Upper bound (pixels) on the center distance for a frame-to-frame match.
pub const DEFAULT_MAX_TRACKING_DISTANCE: f64 = 200.0;

/// Exponential age smoothing coefficients. Expected to sum to 1.
pub const DEFAULT_AGE_WEIGHT_NEW: f64 = 0.1;
pub const DEFAULT_AGE_WEIGHT_OLD: f64 = 0.9;

/// Sliding-window length for gender majority voting.
pub const DEFAULT_GENDER_HISTORY_SIZE: usize = 10;

/// Above this probability the current frame's gender label is trusted outright.
pub const DEFAULT_GENDER_HIGH_CONFIDENCE: f64 = 0.85;

/// Above this probability the label is trusted only with historical majority.
pub const DEFAULT_GENDER_MEDIUM_CONFIDENCE: f64 = 0.75;

/// Overlay palette, one color per gender label.
pub const MALE_COLOR: [u8; 3] = [0x63, 0x66, 0xf1];
pub const FEMALE_COLOR: [u8; 3] = [0xec, 0x48, 0x99];

pub const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];
