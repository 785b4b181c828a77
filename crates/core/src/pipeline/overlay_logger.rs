use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting observer for overlay pipeline events.
///
/// Keeps the executor independent of any particular output mechanism; a
/// CLI run wants throttled stdout progress, tests want silence.
pub trait OverlayLogger: Send {
    /// Frame-level progress.
    fn progress(&mut self, current: usize, total: usize);

    /// Duration of a named pipeline stage for one frame.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Point-in-time value (e.g. faces per frame).
    fn metric(&mut self, name: &str, value: f64);

    /// Human-readable status message.
    fn info(&mut self, message: &str);

    /// End-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used where output is unwanted (tests, callers
/// with their own progress reporting).
pub struct NullOverlayLogger;

impl OverlayLogger for NullOverlayLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn metric(&mut self, _name: &str, _value: f64) {}
    fn info(&mut self, _message: &str) {}
}

#[derive(Clone, Copy, Debug, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn record(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Logs throttled progress through the `log` facade and accumulates
/// per-stage timings and metrics for an end-of-run summary.
pub struct StdoutOverlayLogger {
    throttle_frames: usize,
    timings: HashMap<String, Accumulator>,
    metrics: HashMap<String, Accumulator>,
    started: Instant,
    total_frames: usize,
}

impl StdoutOverlayLogger {
    pub fn new(throttle_frames: usize) -> Self {
        Self {
            throttle_frames: throttle_frames.max(1),
            timings: HashMap::new(),
            metrics: HashMap::new(),
            started: Instant::now(),
            total_frames: 0,
        }
    }

    /// The formatted summary, or `None` when nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.metrics.is_empty() {
            return None;
        }

        let elapsed_s = self.started.elapsed().as_secs_f64();
        let mut lines = vec![format!(
            "Overlay summary ({} frames, {elapsed_s:.1}s total):",
            self.total_frames
        )];

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let acc = &self.timings[stage];
            lines.push(format!(
                "  {stage:8}: avg {:6.2}ms over {} frames",
                acc.mean(),
                acc.count
            ));
        }

        let mut names: Vec<_> = self.metrics.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: avg {:.2}", self.metrics[name].mean()));
        }

        if self.total_frames > 0 && elapsed_s > 0.0 {
            lines.push(format!(
                "  Throughput: {:.1} fps",
                self.total_frames as f64 / elapsed_s
            ));
        }

        Some(lines.join("\n"))
    }

    pub fn mean_timing(&self, stage: &str) -> Option<f64> {
        self.timings.get(stage).map(Accumulator::mean)
    }

    pub fn mean_metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).map(Accumulator::mean)
    }
}

impl Default for StdoutOverlayLogger {
    fn default() -> Self {
        Self::new(10)
    }
}

impl OverlayLogger for StdoutOverlayLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_frames = total;
        if total > 0 && (current % self.throttle_frames == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} frames ({pct:.1}%)");
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&mut self, name: &str, value: f64) {
        self.metrics
            .entry(name.to_string())
            .or_default()
            .record(value);
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n{text}");
        }
    }
}
