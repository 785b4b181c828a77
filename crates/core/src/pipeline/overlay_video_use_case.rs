use std::path::Path;

use crate::detection::domain::age_gender_detector::AgeGenderDetector;
use crate::detection::domain::frame_tracker::FrameTracker;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::overlay_executor::{OverlayExecutor, OverlayRunConfig};
use crate::pipeline::overlay_logger::OverlayLogger;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

/// Full overlay run: open input → detect/track/render every frame → write
/// the annotated sequence.
///
/// Owns its collaborators for the duration of one run; `execute` consumes
/// the use case since the executor takes ownership of the ports.
pub struct OverlayVideoUseCase {
    source: Box<dyn FrameSource>,
    sink: Box<dyn FrameSink>,
    detector: Box<dyn AgeGenderDetector>,
    tracker: FrameTracker,
    renderer: Box<dyn OverlayRenderer>,
    executor: Box<dyn OverlayExecutor>,
    logger: Box<dyn OverlayLogger>,
    run_config: OverlayRunConfig,
}

impl OverlayVideoUseCase {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Box<dyn FrameSource>,
        sink: Box<dyn FrameSink>,
        detector: Box<dyn AgeGenderDetector>,
        tracker: FrameTracker,
        renderer: Box<dyn OverlayRenderer>,
        executor: Box<dyn OverlayExecutor>,
        logger: Box<dyn OverlayLogger>,
        run_config: OverlayRunConfig,
    ) -> Self {
        Self {
            source,
            sink,
            detector,
            tracker,
            renderer,
            executor,
            logger,
            run_config,
        }
    }

    pub fn execute(
        mut self,
        input_path: &Path,
        output_path: &Path,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let info = self.source.open(input_path)?;
        self.logger.info(&format!(
            "Overlaying {} frames at {}x{}",
            info.total_frames, info.width, info.height
        ));

        self.executor.execute(
            self.source,
            self.sink,
            self.detector,
            self.tracker,
            self.renderer,
            &info,
            output_path,
            self.logger.as_mut(),
            self.run_config,
        )?;

        self.logger.summary();
        Ok(())
    }
}
