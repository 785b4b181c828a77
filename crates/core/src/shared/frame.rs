/// A single video frame: contiguous RGB bytes in row-major order.
///
/// Pixel format conversion happens at I/O boundaries only; everything
/// between source and sink works on this one representation.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * 3,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// A frame filled with a single color. Mostly useful in tests and
    /// as a placeholder when a source cannot produce pixels.
    pub fn filled(width: u32, height: u32, index: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position of this frame in the stream, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let off = self.offset(x, y);
        [self.data[off], self.data[off + 1], self.data[off + 2]]
    }

    /// Writes a pixel, silently ignoring out-of-bounds coordinates so
    /// drawing code can clip at frame edges without pre-checks.
    pub fn put_pixel(&mut self, x: i64, y: i64, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let off = self.offset(x as u32, y as u32);
        self.data[off..off + 3].copy_from_slice(&rgb);
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 3
    }
}
