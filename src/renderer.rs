//! The motion grid renderer.
//!
//! Ties capture, sampling, motion estimation and rasterization together and
//! owns all per-session state. One call to [`MotionGridRenderer::tick`] runs
//! one synchronous pass of the pipeline.

use crate::analysis::GridStatistics;
use crate::capture::{Camera, CaptureConfig, CaptureError, CaptureManager, CaptureStatus};
use crate::config::{ConfigError, FileConfig};
use crate::grid::{CellGrid, GridConfig};
use crate::motion::{MotionEstimator, MotionTuning};
use crate::render::{Rasterizer, ShadingTuning, Surface};
use crate::sampling::Sampler;
use std::sync::mpsc::Receiver;

/// Lifecycle of a renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RendererState {
    /// Created, camera not yet requested.
    Idle,
    /// Waiting on camera access.
    Requesting,
    /// Streaming; ticks render.
    Ready,
    /// Camera access failed; call [`MotionGridRenderer::request_access`] to retry.
    Error(CaptureError),
    /// Torn down; camera released.
    Stopped,
}

/// Why a tick did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The camera is not streaming.
    NotReady,
    /// No display surface is attached, or it has no pixels.
    NoDisplay,
    /// The camera had no decodable frame this tick.
    FrameUnavailable,
}

/// Result of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The pipeline ran and the surface holds a new frame.
    Rendered,
    /// Nothing happened; the next tick will try again.
    Skipped(SkipReason),
}

/// Running totals since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderCounters {
    /// Ticks that produced a frame.
    pub frames_rendered: u64,
    /// Ticks that were skipped.
    pub ticks_skipped: u64,
    /// Failed camera access requests.
    pub capture_errors: u64,
}

/// Webcam-driven pseudo-3D pixel grid.
pub struct MotionGridRenderer<C: Camera> {
    config: GridConfig,
    capture: CaptureManager<C>,
    sampler: Sampler,
    estimator: MotionEstimator,
    rasterizer: Rasterizer,
    grid: CellGrid,
    surface: Option<Surface>,
    state: RendererState,
    counters: RenderCounters,
}

impl<C: Camera> MotionGridRenderer<C> {
    /// Creates an idle renderer with default tuning.
    pub fn new(camera: C, capture: CaptureConfig, config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        capture.validate()?;
        Ok(Self {
            grid: CellGrid::new(config.cols, config.rows),
            config,
            capture: CaptureManager::new(camera, capture),
            sampler: Sampler::new(),
            estimator: MotionEstimator::default(),
            rasterizer: Rasterizer::default(),
            surface: None,
            state: RendererState::Idle,
            counters: RenderCounters::default(),
        })
    }

    /// Creates an idle renderer from a loaded configuration file, with the
    /// display surface already attached.
    pub fn from_file_config(camera: C, file: &FileConfig) -> Result<Self, ConfigError> {
        file.validate()?;
        let mut renderer = Self::new(camera, file.capture.clone(), file.grid.clone())?
            .with_motion_tuning(file.motion)
            .with_shading(file.shading);
        renderer.attach_display(
            file.display.width,
            file.display.height,
            file.display.device_pixel_ratio,
        );
        Ok(renderer)
    }

    /// Replaces the motion smoothing constants.
    pub fn with_motion_tuning(mut self, tuning: MotionTuning) -> Self {
        self.estimator = MotionEstimator::new(tuning);
        self
    }

    /// Replaces the shading constants.
    pub fn with_shading(mut self, shading: ShadingTuning) -> Self {
        self.rasterizer = Rasterizer::new(shading);
        self
    }

    /// Requests camera access. Safe to call again after a failure (retry) or
    /// while already streaming (no-op).
    ///
    /// A fresh stream starts a new session: the grid and the previous-frame
    /// buffer are reset.
    pub fn request_access(&mut self) -> Result<(), CaptureError> {
        let was_ready = self.state == RendererState::Ready && self.capture.is_ready();
        self.state = RendererState::Requesting;

        match self.capture.request_access() {
            Ok(()) => {
                if !was_ready {
                    self.reset_session();
                }
                self.state = RendererState::Ready;
                Ok(())
            }
            Err(err) => {
                self.counters.capture_errors += 1;
                self.state = RendererState::Error(err.clone());
                Err(err)
            }
        }
    }

    /// Releases the camera. Idempotent; the renderer then skips every tick
    /// until access is requested again.
    pub fn stop(&mut self) {
        self.capture.stop();
        if self.state != RendererState::Stopped {
            tracing::info!(
                frames = self.counters.frames_rendered,
                skipped = self.counters.ticks_skipped,
                "Renderer stopped"
            );
        }
        self.state = RendererState::Stopped;
    }

    /// Attaches a display surface of the given logical size, or resizes the
    /// attached one.
    pub fn attach_display(&mut self, width: f32, height: f32, device_pixel_ratio: f32) {
        match &mut self.surface {
            Some(surface) => surface.resize(width, height, device_pixel_ratio),
            None => self.surface = Some(Surface::new(width, height, device_pixel_ratio)),
        }
        tracing::debug!(width, height, device_pixel_ratio, "Display attached");
    }

    /// Detaches the display surface. Ticks skip until one is attached.
    pub fn detach_display(&mut self) -> Option<Surface> {
        self.surface.take()
    }

    /// Replaces the grid configuration.
    ///
    /// Changing `cols` or `rows` reinitializes every cell; other changes take
    /// effect on the next tick without disturbing motion state.
    pub fn reconfigure(&mut self, config: GridConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if !self.grid.has_dimensions(config.cols, config.rows) {
            tracing::info!(
                cols = config.cols,
                rows = config.rows,
                "Grid resized, resetting cells"
            );
            self.grid.reset(config.cols, config.rows);
            self.estimator.reset();
        }
        self.config = config;
        Ok(())
    }

    /// Runs one pass: sample, estimate, draw.
    ///
    /// Skips silently when the camera is not streaming, no display is
    /// attached, or no frame is decodable yet.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.run_pipeline();
        match outcome {
            TickOutcome::Rendered => self.counters.frames_rendered += 1,
            TickOutcome::Skipped(reason) => {
                self.counters.ticks_skipped += 1;
                tracing::trace!(?reason, "Tick skipped");
            }
        }
        outcome
    }

    fn run_pipeline(&mut self) -> TickOutcome {
        if self.state != RendererState::Ready {
            return TickOutcome::Skipped(SkipReason::NotReady);
        }
        let Some(surface) = self.surface.as_mut().filter(|s| !s.is_empty()) else {
            return TickOutcome::Skipped(SkipReason::NoDisplay);
        };

        let frame = match self.capture.poll_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return TickOutcome::Skipped(SkipReason::FrameUnavailable),
            Err(e) => {
                tracing::trace!(error = %e, "Frame read failed");
                return TickOutcome::Skipped(SkipReason::FrameUnavailable);
            }
        };

        let Some(sample) =
            self.sampler
                .sample(&frame, self.config.cols, self.config.rows, self.config.mirror)
        else {
            return TickOutcome::Skipped(SkipReason::FrameUnavailable);
        };

        self.estimator.update(&mut self.grid, sample, &self.config);
        self.rasterizer.draw(&self.grid, &self.config, surface);
        TickOutcome::Rendered
    }

    fn reset_session(&mut self) {
        self.grid.reset(self.config.cols, self.config.rows);
        self.estimator.reset();
    }

    /// Registers for [`CaptureStatus`] notifications.
    pub fn subscribe(&mut self) -> Receiver<CaptureStatus> {
        self.capture.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &RendererState {
        &self.state
    }

    /// Grid configuration in use.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Current cell grid.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Attached display surface, if any.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Summary of the current grid.
    pub fn statistics(&self) -> GridStatistics {
        GridStatistics::analyze(&self.grid, self.rasterizer.shading().raise_threshold)
    }

    /// Running totals.
    pub fn counters(&self) -> RenderCounters {
        self.counters
    }

    /// Live camera streams.
    pub fn active_streams(&self) -> usize {
        self.capture.active_streams()
    }

    /// The capture manager.
    pub fn capture(&self) -> &CaptureManager<C> {
        &self.capture
    }
}

impl<C: Camera> Drop for MotionGridRenderer<C> {
    fn drop(&mut self) {
        self.stop();
    }
}
