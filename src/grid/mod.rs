//! Grid model: cell state, colors and grid configuration.
//!
//! The grid is a single contiguous buffer owned by the renderer and mutated
//! in place every tick.

mod cell;
mod color;
mod config;

pub use cell::{Cell, CellGrid, BASELINE_COLOR};
pub use color::{ParseColorError, Rgb, Rgba};
pub use config::{ColorMode, GridConfig};
