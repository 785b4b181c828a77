use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use crate::detection::domain::age_gender_detector::AgeGenderDetector;
use crate::detection::domain::frame_tracker::FrameTracker;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::overlay_logger::OverlayLogger;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

/// Per-run options for an overlay execution.
pub struct OverlayRunConfig {
    /// Called after each completed frame; returning `false` aborts the run.
    pub on_progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>>,
    /// Checked at the top of each cycle; setting it stops the run cleanly.
    pub cancelled: Arc<AtomicBool>,
}

impl Default for OverlayRunConfig {
    fn default() -> Self {
        Self {
            on_progress: None,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Abstracts how the read → detect → track → render → write cycle runs.
///
/// This is a port; infrastructure provides concrete implementations.
/// Implementations must keep detection frame-synchronous: one cycle runs
/// to completion before the next begins, and the tracked state is replaced
/// only between cycles.
pub trait OverlayExecutor: Send {
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &self,
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        detector: Box<dyn AgeGenderDetector>,
        tracker: FrameTracker,
        renderer: Box<dyn OverlayRenderer>,
        info: &StreamInfo,
        output_path: &Path,
        logger: &mut dyn OverlayLogger,
        config: OverlayRunConfig,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
