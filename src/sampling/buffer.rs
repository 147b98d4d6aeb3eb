//! Low-resolution RGBA sample type.

/// Bytes per sampled cell (RGBA8).
pub const SAMPLE_CHANNELS: usize = 4;

/// A frame downsampled to grid resolution.
///
/// Holds exactly `cols * rows * 4` RGBA bytes in row-major order. This is the
/// output of the sampling stage and input to motion estimation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SampleBuffer {
    cols: usize,
    rows: usize,
    data: Vec<u8>,
}

impl SampleBuffer {
    /// Creates a zeroed buffer for the given grid size.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            data: vec![0; cols * rows * SAMPLE_CHANNELS],
        }
    }

    /// Wraps existing RGBA bytes. Returns `None` if the length does not match.
    pub fn from_rgba(cols: usize, rows: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == cols * rows * SAMPLE_CHANNELS).then_some(Self { cols, rows, data })
    }

    /// Resizes in place, keeping the allocation where possible.
    pub(crate) fn resize(&mut self, cols: usize, rows: usize) {
        self.cols = cols;
        self.rows = rows;
        self.data.resize(cols * rows * SAMPLE_CHANNELS, 0);
    }

    /// Overwrites this buffer with `other`, reusing the allocation.
    pub(crate) fn copy_from(&mut self, other: &SampleBuffer) {
        self.cols = other.cols;
        self.rows = other.rows;
        self.data.clone_from(&other.data);
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns true if the buffer matches the given grid size.
    #[inline]
    pub fn has_dimensions(&self, cols: usize, rows: usize) -> bool {
        self.cols == cols && self.rows == rows
    }

    /// Raw RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// RGB of the cell at `index` (row-major).
    #[inline]
    pub fn rgb(&self, index: usize) -> [u8; 3] {
        let i = index * SAMPLE_CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// RGB of the cell at `(row, col)`, if in bounds.
    pub fn rgb_at(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        (row < self.rows && col < self.cols).then(|| self.rgb(row * self.cols + col))
    }
}

impl std::fmt::Debug for SampleBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SampleBuffer")
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(SampleBuffer::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(SampleBuffer::from_rgba(2, 2, vec![0; 12]).is_none());
    }

    #[test]
    fn test_rgb_at() {
        let data = (0..16).collect();
        let buffer = SampleBuffer::from_rgba(2, 2, data).unwrap();
        assert_eq!(buffer.rgb_at(1, 0), Some([8, 9, 10]));
        assert_eq!(buffer.rgb_at(2, 0), None);
    }
}
