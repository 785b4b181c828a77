use crate::detection::domain::face::TrackedFace;
use crate::shared::frame::Frame;

/// Domain interface for drawing tracked faces onto a frame.
///
/// Rendering consumes the stabilized values plus the current-frame
/// geometry; coordinate flips, label formatting, and color mapping are
/// renderer concerns, not tracking concerns.
pub trait OverlayRenderer: Send {
    fn draw(&self, frame: &mut Frame, faces: &[TrackedFace])
        -> Result<(), Box<dyn std::error::Error>>;
}
