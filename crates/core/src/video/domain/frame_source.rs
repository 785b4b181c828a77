use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;

/// Produces frames from a stream (directory of images, camera, ...).
///
/// Implementations handle decoding details; the pipeline only sees
/// `Frame` and `StreamInfo`.
pub trait FrameSource: Send {
    /// Opens the source and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in stream order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
