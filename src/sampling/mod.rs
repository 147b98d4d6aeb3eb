//! Frame downsampling.
//!
//! Converts live camera frames of any resolution into a grid-sized RGBA
//! buffer, optionally mirrored so the output behaves like a mirror.

mod buffer;
mod downsample;

pub use buffer::{SampleBuffer, SAMPLE_CHANNELS};
pub use downsample::Sampler;
