//! Frame type representing a captured RGB image with metadata.

use std::time::Instant;

/// Bytes per pixel of a captured frame (packed RGB8).
pub const FRAME_CHANNELS: usize = 3;

/// A single captured frame from the camera.
///
/// Pixels are packed RGB8, row-major, without padding.
#[derive(Clone)]
pub struct Frame {
    /// Raw pixel data.
    pixels: Vec<u8>,
    /// Frame width in pixels.
    width: u32,
    /// Frame height in pixels.
    height: u32,
    /// Capture timestamp.
    timestamp: Instant,
    /// Monotonic sequence number.
    sequence: u64,
}

impl Frame {
    /// Creates a new frame with the given parameters.
    pub fn new(pixels: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            pixels,
            width,
            height,
            timestamp: Instant::now(),
            sequence,
        }
    }

    /// Creates a frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], sequence: u64) -> Self {
        let count = (width as usize) * (height as usize);
        let pixels = rgb.iter().copied().cycle().take(count * FRAME_CHANNELS).collect();
        Self::new(pixels, width, height, sequence)
    }

    /// Returns a reference to the raw pixel data.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the capture timestamp.
    #[inline]
    pub fn timestamp(&self) -> Instant {
        self.timestamp
    }

    /// Returns the sequence number.
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Returns the RGB value at pixel `(row, col)`, or `None` outside the
    /// frame or past the end of a short buffer.
    #[inline]
    pub fn rgb_at(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        if row >= self.height as usize || col >= self.width as usize {
            return None;
        }
        let i = (row * self.width as usize + col) * FRAME_CHANNELS;
        let px = self.pixels.get(i..i + FRAME_CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Validates that the pixel buffer size matches dimensions and the frame
    /// is non-empty.
    pub fn is_valid(&self) -> bool {
        self.pixel_count() > 0 && self.pixels.len() == self.pixel_count() * FRAME_CHANNELS
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("sequence", &self.sequence)
            .field("pixel_bytes", &self.pixels.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let pixels = vec![0u8; 640 * 480 * 3];
        let frame = Frame::new(pixels, 640, 480, 1);

        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.sequence(), 1);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_frame_invalid_size() {
        let pixels = vec![0u8; 100]; // Wrong size
        let frame = Frame::new(pixels, 640, 480, 1);

        assert!(!frame.is_valid());
        assert!(!Frame::new(Vec::new(), 0, 0, 1).is_valid());
    }

    #[test]
    fn test_solid_frame() {
        let frame = Frame::solid(4, 2, [10, 20, 30], 7);
        assert!(frame.is_valid());
        assert_eq!(frame.rgb_at(1, 3), Some([10, 20, 30]));
    }

    #[test]
    fn test_rgb_at_out_of_bounds() {
        let frame = Frame::solid(4, 2, [10, 20, 30], 0);
        assert_eq!(frame.rgb_at(2, 0), None);
        assert_eq!(frame.rgb_at(0, 4), None);

        let short = Frame::new(vec![1, 2, 3], 2, 2, 0);
        assert_eq!(short.rgb_at(0, 0), Some([1, 2, 3]));
        assert_eq!(short.rgb_at(1, 1), None);
    }
}
