use std::path::PathBuf;
use std::process;

use clap::Parser;

use agelens_core::detection::domain::frame_tracker::{FrameTracker, TrackerConfig};
use agelens_core::detection::infrastructure::sidecar_detector::SidecarDetector;
use agelens_core::overlay::infrastructure::box_label_renderer::BoxLabelRenderer;
use agelens_core::pipeline::infrastructure::threaded_overlay_executor::ThreadedOverlayExecutor;
use agelens_core::pipeline::overlay_executor::OverlayRunConfig;
use agelens_core::pipeline::overlay_logger::{
    NullOverlayLogger, OverlayLogger, StdoutOverlayLogger,
};
use agelens_core::pipeline::overlay_video_use_case::OverlayVideoUseCase;
use agelens_core::video::infrastructure::image_sequence_reader::ImageSequenceReader;
use agelens_core::video::infrastructure::image_sequence_writer::ImageSequenceWriter;

/// Stabilized age/gender overlays for frame sequences.
///
/// Takes a directory of numbered frames plus a JSON sidecar of per-frame
/// detections from an external model, and writes annotated frames with
/// flicker-free age and gender labels.
#[derive(Parser)]
#[command(name = "agelens")]
struct Cli {
    /// Directory of input frame images.
    input: PathBuf,

    /// JSON sidecar file with per-frame detections.
    detections: PathBuf,

    /// Directory for annotated output frames.
    output: PathBuf,

    /// Max center distance (pixels) for a frame-to-frame match.
    #[arg(long, default_value = "200")]
    max_distance: f64,

    /// Weight of the current frame in age smoothing.
    #[arg(long, default_value = "0.1")]
    age_weight_new: f64,

    /// Weight of the previous estimate in age smoothing.
    #[arg(long, default_value = "0.9")]
    age_weight_old: f64,

    /// Sliding-window length for gender majority voting.
    #[arg(long, default_value = "10")]
    history_size: usize,

    /// Probability above which the frame's gender label is trusted outright.
    #[arg(long, default_value = "0.85")]
    high_confidence: f64,

    /// Probability above which the label needs historical majority support.
    #[arg(long, default_value = "0.75")]
    medium_confidence: f64,

    /// Mirror x coordinates (matches a mirrored webcam preview).
    #[arg(long)]
    mirror: bool,

    /// Suppress progress output and the end-of-run summary.
    #[arg(long)]
    quiet: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let tracker = FrameTracker::new(tracker_config(&cli));
    let detector = SidecarDetector::from_path(&cli.detections)?;
    log::info!(
        "Loaded detections for {} frames from {}",
        detector.recorded_frames(),
        cli.detections.display()
    );

    let logger: Box<dyn OverlayLogger> = if cli.quiet {
        Box::new(NullOverlayLogger)
    } else {
        Box::new(StdoutOverlayLogger::default())
    };

    let progress: Option<Box<dyn Fn(usize, usize) -> bool + Send>> = if cli.quiet {
        None
    } else {
        Some(Box::new(|current, total| {
            eprint!("\rProcessing frame {current}/{total}");
            true
        }))
    };

    let use_case = OverlayVideoUseCase::new(
        Box::new(ImageSequenceReader::new()),
        Box::new(ImageSequenceWriter::new()),
        Box::new(detector),
        tracker,
        Box::new(BoxLabelRenderer::new(cli.mirror)),
        Box::new(ThreadedOverlayExecutor::new()),
        logger,
        OverlayRunConfig {
            on_progress: progress,
            cancelled: Default::default(),
        },
    );

    use_case.execute(&cli.input, &cli.output)?;
    if !cli.quiet {
        eprintln!();
    }
    log::info!("Annotated frames written to {}", cli.output.display());
    Ok(())
}

fn tracker_config(cli: &Cli) -> TrackerConfig {
    TrackerConfig {
        max_tracking_distance: cli.max_distance,
        age_weight_new: cli.age_weight_new,
        age_weight_old: cli.age_weight_old,
        gender_history_size: cli.history_size,
        gender_high_confidence: cli.high_confidence,
        gender_medium_confidence: cli.medium_confidence,
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.is_dir() {
        return Err(format!("Input directory not found: {}", cli.input.display()).into());
    }
    if !cli.detections.is_file() {
        return Err(format!("Detections file not found: {}", cli.detections.display()).into());
    }
    if cli.max_distance <= 0.0 {
        return Err(format!("Max distance must be positive, got {}", cli.max_distance).into());
    }
    if (cli.age_weight_new + cli.age_weight_old - 1.0).abs() > 1e-9 {
        return Err(format!(
            "Age weights must sum to 1, got {} + {}",
            cli.age_weight_new, cli.age_weight_old
        )
        .into());
    }
    if !(0.0..=1.0).contains(&cli.age_weight_new) {
        return Err(format!(
            "Age weight must be between 0.0 and 1.0, got {}",
            cli.age_weight_new
        )
        .into());
    }
    if cli.history_size == 0 {
        return Err("History size must be at least 1".into());
    }
    for (name, value) in [
        ("High confidence", cli.high_confidence),
        ("Medium confidence", cli.medium_confidence),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(format!("{name} must be between 0.0 and 1.0, got {value}").into());
        }
    }
    if cli.medium_confidence >= cli.high_confidence {
        return Err(format!(
            "Medium confidence ({}) must be below high confidence ({})",
            cli.medium_confidence, cli.high_confidence
        )
        .into());
    }
    Ok(())
}
