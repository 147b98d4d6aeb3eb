//! Prometheus metrics for the motion grid renderer.
//!
//! # Metrics Exposed
//!
//! ## Capture
//! - `motion_grid_capture_ready` - Camera streaming status (1=ready, 0=not ready)
//! - `motion_grid_active_streams` - Live camera streams held on the device
//! - `motion_grid_capture_errors_total` - Failed camera access requests
//!
//! ## Frame Loop
//! - `motion_grid_frames_rendered_total` - Ticks that rendered a frame
//! - `motion_grid_ticks_skipped_total` - Ticks skipped
//!
//! ## Grid
//! - `motion_grid_mean_motion` / `motion_grid_peak_motion` - Smoothed motion
//! - `motion_grid_peak_elevation` - Highest cell elevation
//! - `motion_grid_raised_cells` - Cells drawn raised
//! - `motion_grid_cells` - Grid size
//!
//! With the `metrics` feature, [`MetricsServer`] serves them over HTTP.
//!
//! # Example
//!
//! ```no_run
//! use motion_grid::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//! registry.update(&MetricsSnapshot {
//!     capture_ready: true,
//!     frames_rendered: 600,
//!     ..MetricsSnapshot::default()
//! });
//! println!("{}", registry.encode().unwrap());
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, MetricsState, ServerError};
