use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::detection::domain::age_gender_detector::AgeGenderDetector;
use crate::detection::domain::face::TrackedFrameState;
use crate::detection::domain::frame_tracker::FrameTracker;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::pipeline::overlay_executor::{OverlayExecutor, OverlayRunConfig};
use crate::pipeline::overlay_logger::OverlayLogger;
use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::frame_source::FrameSource;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Executes the overlay pipeline with dedicated threads for I/O.
///
/// Layout: `reader → main [detect/track/render] → writer`
///
/// Detection, tracking, and rendering all run on the single main loop, so
/// at most one detection cycle is in flight at a time and the tracked
/// state is replaced atomically between cycles. A frame whose detection
/// fails is passed through unannotated with the previous state retained;
/// the next frame matches against the state from before the failure.
pub struct ThreadedOverlayExecutor {
    channel_capacity: usize,
}

impl ThreadedOverlayExecutor {
    pub fn new() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for ThreadedOverlayExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayExecutor for ThreadedOverlayExecutor {
    fn execute(
        &self,
        source: Box<dyn FrameSource>,
        mut sink: Box<dyn FrameSink>,
        mut detector: Box<dyn AgeGenderDetector>,
        tracker: FrameTracker,
        renderer: Box<dyn OverlayRenderer>,
        info: &StreamInfo,
        output_path: &Path,
        logger: &mut dyn OverlayLogger,
        config: OverlayRunConfig,
    ) -> Result<(), Box<dyn std::error::Error>> {
        sink.open(output_path, info)?;

        let cap = self.channel_capacity;
        let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Result<Frame, SendError>>(cap);
        let (write_tx, write_rx) = crossbeam_channel::bounded::<Frame>(cap);

        let reader_handle = spawn_reader(source, frame_tx, config.cancelled.clone());
        let writer_handle = spawn_writer(sink, write_rx);

        let main_error = run_cycles(
            frame_rx,
            &write_tx,
            detector.as_mut(),
            &tracker,
            renderer.as_ref(),
            info.total_frames,
            logger,
            &config,
        );

        drop(write_tx);

        join_threads(reader_handle, writer_handle, main_error)
    }
}

fn spawn_reader(
    mut source: Box<dyn FrameSource>,
    frame_tx: crossbeam_channel::Sender<Result<Frame, SendError>>,
    cancelled: std::sync::Arc<std::sync::atomic::AtomicBool>,
) -> std::thread::JoinHandle<Box<dyn FrameSource>> {
    std::thread::spawn(move || {
        for frame_result in source.frames() {
            if cancelled.load(Ordering::Relaxed) {
                break;
            }
            let mapped = frame_result.map_err(|e| -> SendError { e.to_string().into() });
            if frame_tx.send(mapped).is_err() {
                break;
            }
        }
        source.close();
        source
    })
}

fn spawn_writer(
    mut sink: Box<dyn FrameSink>,
    write_rx: crossbeam_channel::Receiver<Frame>,
) -> std::thread::JoinHandle<Result<Box<dyn FrameSink>, SendError>> {
    std::thread::spawn(move || {
        for frame in write_rx {
            sink.write(&frame)
                .map_err(|e| -> SendError { e.to_string().into() })?;
        }
        Ok(sink)
    })
}

/// One cycle per received frame: detect, track, render, hand off to the
/// writer. The tracked state lives only here, owned by this loop.
#[allow(clippy::too_many_arguments)]
fn run_cycles(
    frame_rx: crossbeam_channel::Receiver<Result<Frame, SendError>>,
    write_tx: &crossbeam_channel::Sender<Frame>,
    detector: &mut dyn AgeGenderDetector,
    tracker: &FrameTracker,
    renderer: &dyn OverlayRenderer,
    total_frames: usize,
    logger: &mut dyn OverlayLogger,
    config: &OverlayRunConfig,
) -> Option<Box<dyn std::error::Error>> {
    let mut previous: TrackedFrameState = Vec::new();
    let mut frames_done: usize = 0;

    for frame_result in frame_rx {
        if config.cancelled.load(Ordering::Relaxed) {
            break;
        }

        let mut frame = match frame_result {
            Ok(frame) => frame,
            Err(e) => return Some(e.to_string().into()),
        };

        let detect_start = Instant::now();
        let detections = detector.detect(&frame);
        logger.timing("detect", detect_start.elapsed().as_secs_f64() * 1000.0);

        match detections {
            Ok(detections) => {
                let track_start = Instant::now();
                let state = tracker.process_frame(&detections, &previous);
                logger.timing("track", track_start.elapsed().as_secs_f64() * 1000.0);
                logger.metric("faces_per_frame", state.len() as f64);

                let render_start = Instant::now();
                if let Err(e) = renderer.draw(&mut frame, &state) {
                    return Some(e.to_string().into());
                }
                logger.timing("render", render_start.elapsed().as_secs_f64() * 1000.0);

                previous = state;
            }
            Err(e) => {
                // Failed cycle: the frame goes through unannotated and the
                // previous tracked state stays valid for the next attempt.
                log::warn!("Detection failed for frame {}: {e}", frame.index());
            }
        }

        if write_tx.send(frame).is_err() {
            return Some("Writer channel closed unexpectedly".into());
        }

        frames_done += 1;
        logger.progress(frames_done, total_frames);
        if let Some(ref callback) = config.on_progress {
            if !callback(frames_done, total_frames) {
                return Some("Cancelled".into());
            }
        }
    }

    None
}

/// Joins the I/O threads and coalesces the first error encountered.
fn join_threads(
    reader_handle: std::thread::JoinHandle<Box<dyn FrameSource>>,
    writer_handle: std::thread::JoinHandle<Result<Box<dyn FrameSink>, SendError>>,
    mut first_error: Option<Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    fn set_if_none(slot: &mut Option<Box<dyn std::error::Error>>, err: Box<dyn std::error::Error>) {
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    if reader_handle.join().is_err() {
        set_if_none(&mut first_error, "Reader thread panicked".into());
    }

    match writer_handle.join() {
        Ok(Ok(mut sink)) => {
            if let Err(e) = sink.close() {
                set_if_none(&mut first_error, e);
            }
        }
        Ok(Err(e)) => set_if_none(&mut first_error, e.to_string().into()),
        Err(_) => set_if_none(&mut first_error, "Writer thread panicked".into()),
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
