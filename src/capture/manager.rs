//! Camera lifecycle management.
//!
//! Owns the camera, turns device errors into user-facing [`CaptureError`]s and
//! publishes [`CaptureStatus`] notifications to subscribers.

use super::{Camera, CameraError, CaptureConfig, Frame};
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

/// Broad category of a capture failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureErrorKind {
    /// The user or platform refused camera access.
    PermissionDenied,
    /// No usable camera device exists.
    NoDevice,
    /// The device exists but the stream could not be started or failed.
    StreamError,
}

/// A human-readable capture failure, surfaced to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CaptureError {
    /// Failure category.
    pub kind: CaptureErrorKind,
    /// Human-readable reason.
    pub message: String,
}

impl CaptureError {
    /// Creates an error of the given kind.
    pub fn new(kind: CaptureErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<CameraError> for CaptureError {
    fn from(err: CameraError) -> Self {
        let kind = match &err {
            CameraError::PermissionDenied(_) => CaptureErrorKind::PermissionDenied,
            CameraError::DeviceNotFound(_) => CaptureErrorKind::NoDevice,
            CameraError::OpenFailed(_)
            | CameraError::ConfigFailed(_)
            | CameraError::StreamFailed(_)
            | CameraError::CaptureFailed(_)
            | CameraError::NotInitialized => CaptureErrorKind::StreamError,
        };
        Self::new(kind, err.to_string())
    }
}

/// Notification published whenever a capture request settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureStatus {
    /// The camera is streaming.
    Ready,
    /// Access failed; the host should offer a retry.
    Error(CaptureError),
}

/// Lifecycle state of the capture manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    /// Nothing requested yet.
    Idle,
    /// Access request in progress.
    Requesting,
    /// Streaming.
    Ready,
    /// Last request failed.
    Failed(CaptureError),
    /// Streams released by teardown.
    Stopped,
}

/// Acquires and releases a camera stream.
pub struct CaptureManager<C> {
    camera: C,
    config: CaptureConfig,
    state: CaptureState,
    subscribers: Vec<Sender<CaptureStatus>>,
}

impl<C: Camera> CaptureManager<C> {
    /// Creates a manager for `camera`. Nothing is opened until
    /// [`request_access`](Self::request_access).
    pub fn new(camera: C, config: CaptureConfig) -> Self {
        Self {
            camera,
            config,
            state: CaptureState::Idle,
            subscribers: Vec::new(),
        }
    }

    /// Requests camera access.
    ///
    /// A no-op when already streaming, so retry buttons can call it freely.
    pub fn request_access(&mut self) -> Result<(), CaptureError> {
        if self.is_ready() && self.camera.is_open() {
            tracing::debug!("Capture already active, ignoring request");
            return Ok(());
        }

        self.state = CaptureState::Requesting;
        tracing::debug!(device = self.config.device_id, "Requesting camera access");

        match self.camera.open(&self.config) {
            Ok(()) => {
                tracing::info!(
                    device = self.config.device_id,
                    width = self.config.width,
                    height = self.config.height,
                    "Camera ready"
                );
                self.state = CaptureState::Ready;
                self.publish(CaptureStatus::Ready);
                Ok(())
            }
            Err(err) => {
                let err = CaptureError::from(err);
                tracing::warn!(kind = ?err.kind, error = %err, "Camera access failed");
                self.state = CaptureState::Failed(err.clone());
                self.publish(CaptureStatus::Error(err.clone()));
                Err(err)
            }
        }
    }

    /// Releases all camera streams. Idempotent.
    pub fn stop(&mut self) {
        if self.camera.is_open() || self.camera.active_streams() > 0 {
            self.camera.close();
            tracing::info!("Camera released");
        }
        self.state = CaptureState::Stopped;
    }

    /// Returns the newest decodable frame, or `None` when not streaming or the
    /// device has nothing decodable yet.
    pub fn poll_frame(&mut self) -> Result<Option<Frame>, CameraError> {
        if !self.is_ready() {
            return Ok(None);
        }
        self.camera.poll_frame()
    }

    /// Registers a new status subscriber.
    pub fn subscribe(&mut self) -> Receiver<CaptureStatus> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&mut self, status: CaptureStatus) {
        self.subscribers.retain(|tx| tx.send(status.clone()).is_ok());
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Returns true while streaming.
    pub fn is_ready(&self) -> bool {
        self.state == CaptureState::Ready
    }

    /// Live streams currently held on the device.
    pub fn active_streams(&self) -> usize {
        self.camera.active_streams()
    }

    /// Capture settings.
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Borrows the underlying camera.
    pub fn camera(&self) -> &C {
        &self.camera
    }

    /// Mutably borrows the underlying camera.
    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }
}
