use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// Consumes rendered frames (directory of images, encoder, display, ...).
pub trait FrameSink: Send {
    /// Prepares the sink for a stream with the given metadata.
    fn open(&mut self, path: &Path, info: &StreamInfo) -> Result<(), Box<dyn std::error::Error>>;

    /// Writes one frame. Frames arrive in stream order.
    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>>;

    /// Flushes and releases resources.
    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}
