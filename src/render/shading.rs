//! Pseudo-3D shading constants.
//!
//! These are cosmetic values tuned by eye, kept configurable rather than
//! derived from any lighting model.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Tuning for the raised-tile look.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingTuning {
    /// Elevations at or below this are drawn flat (no shadow or sides).
    pub raise_threshold: f32,
    /// Horizontal top-face shift per unit of elevation (negative is left).
    pub skew_x: f32,
    /// Vertical top-face shift per unit of elevation (negative is up).
    pub skew_y: f32,
    /// Shadow offset to the right per unit of elevation.
    pub shadow_offset_x: f32,
    /// Shadow offset downward per unit of elevation.
    pub shadow_offset_y: f32,
    /// Shadow opacity per unit of elevation.
    pub shadow_alpha_per_unit: f32,
    /// Shadow opacity cap.
    pub shadow_alpha_max: f32,
    /// Amount subtracted from each channel of the right face.
    pub right_face_shade: u8,
    /// Amount subtracted from each channel of the bottom face.
    pub bottom_face_shade: u8,
    /// Top-face brightening per unit of elevation.
    pub brightness_per_unit: f32,
    /// Border opacity added per unit of elevation.
    pub border_alpha_per_unit: f32,
    /// Border line width in logical pixels.
    pub border_width: f32,
}

impl Default for ShadingTuning {
    fn default() -> Self {
        Self {
            raise_threshold: 0.5,
            skew_x: -1.2,
            skew_y: -1.8,
            shadow_offset_x: 1.5,
            shadow_offset_y: 2.0,
            shadow_alpha_per_unit: 0.04,
            shadow_alpha_max: 0.6,
            right_face_shade: 80,
            bottom_face_shade: 50,
            brightness_per_unit: 0.05,
            border_alpha_per_unit: 0.008,
            border_width: 0.5,
        }
    }
}

impl ShadingTuning {
    /// Validates the tuning values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("shading.raise_threshold", self.raise_threshold),
            ("shading.skew_x", self.skew_x),
            ("shading.skew_y", self.skew_y),
            ("shading.shadow_offset_x", self.shadow_offset_x),
            ("shading.shadow_offset_y", self.shadow_offset_y),
            ("shading.brightness_per_unit", self.brightness_per_unit),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::out_of_range(field, value, "finite"));
            }
        }

        let non_negative = [
            ("shading.shadow_alpha_per_unit", self.shadow_alpha_per_unit),
            ("shading.border_alpha_per_unit", self.border_alpha_per_unit),
            ("shading.border_width", self.border_width),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::out_of_range(field, value, ">= 0"));
            }
        }

        if !(0.0..=1.0).contains(&self.shadow_alpha_max) {
            return Err(ConfigError::out_of_range(
                "shading.shadow_alpha_max",
                self.shadow_alpha_max,
                "in [0, 1]",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shading_valid() {
        assert!(ShadingTuning::default().validate().is_ok());
    }

    #[test]
    fn test_non_finite_rejected() {
        let shading = ShadingTuning {
            skew_y: f32::NAN,
            ..ShadingTuning::default()
        };
        assert!(matches!(
            shading.validate(),
            Err(ConfigError::OutOfRange { field: "shading.skew_y", .. })
        ));

        let shading = ShadingTuning {
            border_width: f32::INFINITY,
            ..ShadingTuning::default()
        };
        assert!(shading.validate().is_err());
    }

    #[test]
    fn test_shadow_alpha_max_range() {
        for bad in [-0.1, 1.5, f32::NAN] {
            let shading = ShadingTuning {
                shadow_alpha_max: bad,
                ..ShadingTuning::default()
            };
            assert!(matches!(
                shading.validate(),
                Err(ConfigError::OutOfRange { field: "shading.shadow_alpha_max", .. })
            ));
        }

        let opaque = ShadingTuning {
            shadow_alpha_max: 1.0,
            ..ShadingTuning::default()
        };
        assert!(opaque.validate().is_ok());
    }
}
