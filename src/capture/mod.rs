//! Camera input and frame handling.
//!
//! This module provides abstractions for capturing frames from a camera,
//! managing the stream lifecycle, and reporting access failures to the host.

mod camera;
mod config;
mod frame;
mod manager;
#[cfg(feature = "camera")]
mod native;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::CaptureConfig;
pub use frame::{Frame, FRAME_CHANNELS};
pub use manager::{CaptureError, CaptureErrorKind, CaptureManager, CaptureState, CaptureStatus};
#[cfg(feature = "camera")]
pub use native::NativeCamera;
