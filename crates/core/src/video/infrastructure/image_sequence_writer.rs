use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::shared::stream_info::StreamInfo;
use crate::video::domain::frame_sink::FrameSink;

/// Writes frames as numbered PNG files into a directory.
///
/// File names are `frame_NNNNNN.png` using the frame's own stream index,
/// so the output sequence lines up with the input even when frames are
/// skipped upstream.
pub struct ImageSequenceWriter {
    dir: Option<PathBuf>,
    written: usize,
}

impl ImageSequenceWriter {
    pub fn new() -> Self {
        Self {
            dir: None,
            written: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.written
    }
}

impl Default for ImageSequenceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSink for ImageSequenceWriter {
    fn open(&mut self, path: &Path, _info: &StreamInfo) -> Result<(), Box<dyn std::error::Error>> {
        fs::create_dir_all(path)?;
        self.dir = Some(path.to_path_buf());
        self.written = 0;
        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let dir = self
            .dir
            .as_ref()
            .ok_or("ImageSequenceWriter: not opened")?;
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Frame buffer does not match its dimensions")?;
        img.save(dir.join(format!("frame_{:06}.png", frame.index())))?;
        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.dir = None;
        Ok(())
    }
}
