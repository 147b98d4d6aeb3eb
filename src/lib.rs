//! Motion Grid Library
//!
//! Turns a live camera feed into a grid of colored tiles that rise toward
//! the viewer wherever the scene is moving. Each tick samples the newest
//! frame down to one color per cell, compares it with the previous sample,
//! and draws every cell as a pseudo-3D tile whose height follows a smoothed
//! motion estimate.
//!
//! # Architecture
//!
//! The system follows an explicit data flow, driven one tick at a time:
//!
//! ```text
//! capture → sampling → motion → render
//!                        ↓
//!                     analysis (grid statistics, metrics)
//! ```
//!
//! [`MotionGridRenderer`] owns one instance of each stage and the
//! [`schedule::FrameLoop`] calls its `tick` at the display refresh rate.
//!
//! # Example
//!
//! ```no_run
//! use motion_grid::{
//!     capture::{CaptureConfig, MockCamera},
//!     grid::GridConfig,
//!     MotionGridRenderer, TickOutcome,
//! };
//!
//! let mut renderer = MotionGridRenderer::new(
//!     MockCamera::new(),
//!     CaptureConfig::default(),
//!     GridConfig::default(),
//! )
//! .unwrap();
//! renderer.attach_display(1280.0, 720.0, 2.0);
//!
//! if let Err(e) = renderer.request_access() {
//!     eprintln!("Camera access needed: {}", e);
//! }
//!
//! for _ in 0..60 {
//!     if renderer.tick() == TickOutcome::Rendered {
//!         let stats = renderer.statistics();
//!         println!("{} cells raised", stats.raised_cells);
//!     }
//! }
//!
//! renderer.stop();
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod capture;
pub mod config;
pub mod grid;
pub mod metrics;
pub mod motion;
pub mod render;
pub mod renderer;
pub mod sampling;
pub mod schedule;

// Re-export commonly used types at crate root
pub use analysis::GridStatistics;
pub use capture::{Camera, CaptureConfig, CaptureError, CaptureErrorKind, CaptureStatus, Frame, MockCamera};
pub use config::{ConfigError, FileConfig};
pub use grid::{CellGrid, ColorMode, GridConfig, Rgb};
pub use render::Surface;
pub use renderer::{MotionGridRenderer, RendererState, SkipReason, TickOutcome};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
