//! Area-averaging downsampler.
//!
//! Every output cell averages the block of source pixels that maps onto it.
//! Blocks always contain at least one pixel, so grids larger than the frame
//! simply repeat source pixels.

use super::buffer::{SampleBuffer, SAMPLE_CHANNELS};
use crate::capture::{Frame, FRAME_CHANNELS};

/// Downsamples frames to grid resolution, reusing one output buffer.
#[derive(Debug, Default)]
pub struct Sampler {
    buffer: SampleBuffer,
}

/// Source pixel range `[start, end)` covered by output index `index`.
fn block(index: usize, count: usize, extent: usize) -> (usize, usize) {
    let start = (index * extent / count).min(extent - 1);
    let end = ((index + 1) * extent / count).clamp(start + 1, extent);
    (start, end)
}

impl Sampler {
    /// Creates a sampler with an empty scratch buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples `frame` down to `cols × rows` RGBA.
    ///
    /// With `mirror`, output column `c` takes the block that an unmirrored
    /// sample would place at column `cols - 1 - c`. Returns `None` for an
    /// invalid frame or an empty grid.
    pub fn sample(
        &mut self,
        frame: &Frame,
        cols: usize,
        rows: usize,
        mirror: bool,
    ) -> Option<&SampleBuffer> {
        if !frame.is_valid() || cols == 0 || rows == 0 {
            return None;
        }

        let (width, height) = (frame.width() as usize, frame.height() as usize);
        let pixels = frame.pixels();
        self.buffer.resize(cols, rows);
        let out = self.buffer.data_mut();

        for row in 0..rows {
            let (y0, y1) = block(row, rows, height);
            for col in 0..cols {
                let source_col = if mirror { cols - 1 - col } else { col };
                let (x0, x1) = block(source_col, cols, width);

                let mut sum = [0u64; 3];
                for y in y0..y1 {
                    let line = &pixels[(y * width + x0) * FRAME_CHANNELS..(y * width + x1) * FRAME_CHANNELS];
                    for px in line.chunks_exact(FRAME_CHANNELS) {
                        sum[0] += u64::from(px[0]);
                        sum[1] += u64::from(px[1]);
                        sum[2] += u64::from(px[2]);
                    }
                }

                let count = ((y1 - y0) * (x1 - x0)) as u64;
                let i = (row * cols + col) * SAMPLE_CHANNELS;
                for c in 0..3 {
                    out[i + c] = ((sum[c] + count / 2) / count) as u8;
                }
                out[i + 3] = 255;
            }
        }

        tracing::trace!(sequence = frame.sequence(), cols, rows, mirror, "Sampled frame");
        Some(&self.buffer)
    }

    /// The most recent sample.
    pub fn last(&self) -> &SampleBuffer {
        &self.buffer
    }
}
