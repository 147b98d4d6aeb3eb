//! Empirical motion smoothing constants.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Tuning for the per-cell motion filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Weight kept from the previous smoothed motion each tick, in `[0, 1)`.
    /// The fresh measurement gets `1 - retention`.
    pub retention: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self { retention: 0.7 }
    }
}

impl MotionTuning {
    /// Weight given to this tick's raw measurement.
    #[inline]
    pub fn fresh_weight(&self) -> f32 {
        1.0 - self.retention
    }

    /// Validates the tuning values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..1.0).contains(&self.retention) {
            return Err(ConfigError::out_of_range(
                "motion.retention",
                self.retention,
                "in [0, 1)",
            ));
        }
        Ok(())
    }
}
