//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame};
use rand_chacha::ChaCha8Rng;
use rand_core::{RngCore, SeedableRng};
use std::collections::VecDeque;
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    /// The user or platform refused access.
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),
    /// No device matched the requested index.
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    /// The device exists but could not be opened.
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    /// The device rejected the requested format.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// The stream could not be started or broke while running.
    #[error("camera stream failed: {0}")]
    StreamFailed(String),
    /// A frame was read but could not be decoded.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// A frame was requested before the device was opened.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens the camera and starts streaming with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Returns the latest decodable frame.
    ///
    /// `Ok(None)` means the stream is live but has nothing decodable yet.
    fn poll_frame(&mut self) -> Result<Option<Frame>, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Number of live streams held on the device.
    fn active_streams(&self) -> usize {
        usize::from(self.is_open())
    }

    /// Stops every stream and releases the device. Safe to call repeatedly.
    fn close(&mut self);
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        (**self).open(config)
    }

    fn poll_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        (**self).poll_frame()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn active_streams(&self) -> usize {
        (**self).active_streams()
    }

    fn close(&mut self) {
        (**self).close()
    }
}

enum Scene {
    /// Bright square orbiting over a gradient, with seeded sensor noise.
    Synthetic { rng: ChaCha8Rng, noise: u8 },
    /// Plays frames in order, then repeats the last one.
    Scripted {
        frames: VecDeque<Frame>,
        last: Option<Frame>,
    },
}

/// Mock camera that generates synthetic or scripted frames.
///
/// Every `open` starts another stream, just like a real device would if the
/// caller forgot to check whether one is already running. Open failures and
/// warm-up ticks can be injected for testing error paths.
pub struct MockCamera {
    config: Option<CaptureConfig>,
    scene: Scene,
    sequence: u64,
    streams: usize,
    streams_opened: u64,
    warmup_ticks: u32,
    pending_warmup: u32,
    open_failures: VecDeque<CameraError>,
}

impl MockCamera {
    /// Creates a synthetic camera with seed 0.
    pub fn new() -> Self {
        Self::with_seed(0)
    }

    /// Creates a synthetic camera with a specific noise seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_scene(Scene::Synthetic {
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise: 6,
        })
    }

    /// Creates a camera that replays `frames`, repeating the final one.
    pub fn scripted(frames: impl IntoIterator<Item = Frame>) -> Self {
        Self::from_scene(Scene::Scripted {
            frames: frames.into_iter().collect(),
            last: None,
        })
    }

    fn from_scene(scene: Scene) -> Self {
        Self {
            config: None,
            scene,
            sequence: 0,
            streams: 0,
            streams_opened: 0,
            warmup_ticks: 0,
            pending_warmup: 0,
            open_failures: VecDeque::new(),
        }
    }

    /// Number of polls after each open that yield no decodable frame.
    pub fn with_warmup(mut self, ticks: u32) -> Self {
        self.warmup_ticks = ticks;
        self
    }

    /// Makes the next `open` fail with `error`. Calls queue up.
    pub fn fail_next_open(&mut self, error: CameraError) {
        self.open_failures.push_back(error);
    }

    /// Total successful opens over the camera's lifetime.
    pub fn streams_opened(&self) -> u64 {
        self.streams_opened
    }

    fn synthesize(config: &CaptureConfig, sequence: u64, rng: &mut ChaCha8Rng, noise: u8) -> Frame {
        let (w, h) = (config.width as usize, config.height as usize);
        let side = (w.min(h) / 4).max(1) as f64;
        let angle = sequence as f64 * 0.05;
        let cx = w as f64 / 2.0 + angle.cos() * w as f64 / 4.0;
        let cy = h as f64 / 2.0 + angle.sin() * h as f64 / 4.0;

        let span = u32::from(noise) * 2 + 1;
        let mut jitter = |c: u8| {
            if noise == 0 {
                return c;
            }
            let delta = (rng.next_u32() % span) as i32 - i32::from(noise);
            (i32::from(c) + delta).clamp(0, 255) as u8
        };

        let mut pixels = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let inside = (x as f64 - cx).abs() <= side / 2.0 && (y as f64 - cy).abs() <= side / 2.0;
                let rgb = if inside {
                    [250, 250, 250]
                } else {
                    [(x * 255 / w.max(1)) as u8, (y * 255 / h.max(1)) as u8, 96]
                };
                pixels.extend(rgb.map(&mut jitter));
            }
        }
        Frame::new(pixels, config.width, config.height, sequence)
    }
}

impl Default for MockCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCamera")
            .field("open", &self.config.is_some())
            .field("sequence", &self.sequence)
            .field("streams", &self.streams)
            .finish()
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        if let Some(error) = self.open_failures.pop_front() {
            return Err(error);
        }
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        self.streams += 1;
        self.streams_opened += 1;
        self.pending_warmup = self.warmup_ticks;
        tracing::info!(streams = self.streams, "MockCamera opened with config: {:?}", config);
        Ok(())
    }

    fn poll_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;

        if self.pending_warmup > 0 {
            self.pending_warmup -= 1;
            return Ok(None);
        }

        self.sequence += 1;
        let frame = match &mut self.scene {
            Scene::Synthetic { rng, noise } => Self::synthesize(config, self.sequence, rng, *noise),
            Scene::Scripted { frames, last } => {
                if let Some(next) = frames.pop_front() {
                    *last = Some(next);
                }
                match last {
                    Some(frame) => frame.clone(),
                    None => return Ok(None),
                }
            }
        };
        Ok(Some(frame))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn active_streams(&self) -> usize {
        self.streams
    }

    fn close(&mut self) {
        if self.config.take().is_some() {
            tracing::info!(streams = self.streams, "MockCamera closed");
        }
        self.streams = 0;
    }
}
