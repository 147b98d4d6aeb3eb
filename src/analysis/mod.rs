//! Grid analysis.
//!
//! Summary statistics of the motion grid for diagnostics and metrics.

mod statistics;

pub use statistics::GridStatistics;
