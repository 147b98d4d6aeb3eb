//! Per-cell motion estimation.
//!
//! Turns successive grid samples into smoothed motion intensities, display
//! colors and elevations. The smoothing constants are empirical tuning values
//! exposed through [`MotionTuning`].

mod estimator;
mod transform;
mod tuning;

pub use estimator::{raw_motion, MotionEstimator};
pub use transform::ColorTransform;
pub use tuning::MotionTuning;
