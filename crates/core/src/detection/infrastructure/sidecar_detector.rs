use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::detection::domain::age_gender_detector::AgeGenderDetector;
use crate::detection::domain::face::RawDetection;
use crate::shared::frame::Frame;

#[derive(Error, Debug)]
pub enum SidecarError {
    #[error("failed to read detections file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse detections file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Replays per-frame detection records produced by an external model.
///
/// The sidecar file is a JSON array indexed by frame number; each element
/// is that frame's array of detections. Frames beyond the recorded range
/// (or recorded as empty) yield no detections, which the tracker treats
/// the same as a frame where the detector saw nothing.
pub struct SidecarDetector {
    frames: Vec<Vec<RawDetection>>,
}

impl SidecarDetector {
    pub fn from_path(path: &Path) -> Result<Self, SidecarError> {
        let text = fs::read_to_string(path).map_err(|e| SidecarError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let frames: Vec<Vec<RawDetection>> =
            serde_json::from_str(&text).map_err(|e| SidecarError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;
        log::debug!(
            "Loaded sidecar detections for {} frames from {}",
            frames.len(),
            path.display()
        );
        Ok(Self { frames })
    }

    pub fn from_frames(frames: Vec<Vec<RawDetection>>) -> Self {
        Self { frames }
    }

    pub fn recorded_frames(&self) -> usize {
        self.frames.len()
    }
}

impl AgeGenderDetector for SidecarDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>> {
        Ok(self.frames.get(frame.index()).cloned().unwrap_or_default())
    }
}
