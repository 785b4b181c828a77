use crate::detection::domain::face::RawDetection;
use crate::shared::frame::Frame;

/// Domain interface for per-frame age/gender inference.
///
/// The core treats inference as a black box: implementations may wrap a
/// model runtime, replay recorded output, or synthesize detections for
/// tests. Implementations may be stateful, hence `&mut self`.
pub trait AgeGenderDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>>;
}
