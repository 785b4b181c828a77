use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::constants::FRAME_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_source::FrameSource;

/// Reads a directory of numbered image files as a frame stream.
///
/// Files are ordered by name, so zero-padded numbering yields the intended
/// frame order. Dimensions come from the first frame; a later frame with
/// different dimensions is reported as an error for that frame.
pub struct ImageSequenceReader {
    paths: Vec<PathBuf>,
    info: Option<StreamInfo>,
}

impl ImageSequenceReader {
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            info: None,
        }
    }
}

impl Default for ImageSequenceReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn load_frame(path: &Path, index: usize, info: &StreamInfo) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)?.into_rgb8();
    if img.width() != info.width || img.height() != info.height {
        return Err(format!(
            "Frame {} has dimensions {}x{}, expected {}x{}",
            path.display(),
            img.width(),
            img.height(),
            info.width,
            info.height
        )
        .into());
    }
    let (w, h) = (img.width(), img.height());
    Ok(Frame::new(img.into_raw(), w, h, index))
}

impl FrameSource for ImageSequenceReader {
    fn open(&mut self, path: &Path) -> Result<StreamInfo, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| is_frame_file(p))
            .collect();
        paths.sort();

        let first = paths
            .first()
            .ok_or_else(|| format!("No frame images found in {}", path.display()))?;
        let probe = image::open(first)?.into_rgb8();

        let info = StreamInfo {
            width: probe.width(),
            height: probe.height(),
            fps: 0.0,
            total_frames: paths.len(),
            source_path: Some(path.to_path_buf()),
        };
        self.paths = paths;
        self.info = Some(info.clone());
        Ok(info)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(info) = self.info.clone() else {
            return Box::new(std::iter::once(Err("ImageSequenceReader: not opened".into())));
        };
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(move |(index, path)| load_frame(path, index, &info)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
        self.info = None;
    }
}
