//! Grid and appearance configuration.

use super::color::Rgb;
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// How cell colors are derived from the sampled camera pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Use the sampled camera color.
    #[default]
    Webcam,
    /// Tint the sample's luminance with `monochrome_color`.
    Monochrome,
}

/// Configuration of the motion grid.
///
/// Fixed for the lifetime of a capture session. Replacing it with different
/// `cols`/`rows` reinitializes every cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns.
    pub cols: usize,
    /// Number of rows.
    pub rows: usize,
    /// Peak raised height in logical pixels.
    pub max_elevation: f32,
    /// Divisor dampening raw pixel differences.
    pub motion_sensitivity: f32,
    /// Exponential approach factor for elevation, in `(0, 1]`.
    pub elevation_smoothing: f32,
    /// Color derivation mode.
    pub color_mode: ColorMode,
    /// Tint used in monochrome mode.
    pub monochrome_color: Rgb,
    /// Surface fill behind the cells.
    pub background_color: Rgb,
    /// Flip the camera horizontally before sampling.
    pub mirror: bool,
    /// Fraction of the cell size reserved as inter-cell gap.
    pub gap_ratio: f32,
    /// Invert every channel after color-mode mapping.
    pub invert_colors: bool,
    /// Darkening fraction in `[0, 1]`.
    pub darken: f32,
    /// Color of the top-face outline.
    pub border_color: Rgb,
    /// Base outline opacity.
    pub border_opacity: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 64,
            rows: 48,
            max_elevation: 15.0,
            motion_sensitivity: 0.4,
            elevation_smoothing: 0.1,
            color_mode: ColorMode::Webcam,
            monochrome_color: Rgb::new(0x00, 0xff, 0x88),
            background_color: Rgb::gray(0x0a),
            mirror: true,
            gap_ratio: 0.1,
            invert_colors: false,
            darken: 0.0,
            border_color: Rgb::WHITE,
            border_opacity: 0.08,
        }
    }
}

impl GridConfig {
    /// Creates a default configuration with the given grid size.
    pub fn with_dimensions(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            ..Default::default()
        }
    }

    /// Number of cells in the grid.
    pub fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(ConfigError::InvalidGridSize {
                cols: self.cols,
                rows: self.rows,
            });
        }
        if !(self.max_elevation.is_finite() && self.max_elevation >= 0.0) {
            return Err(ConfigError::out_of_range(
                "max_elevation",
                self.max_elevation,
                ">= 0",
            ));
        }
        if !(self.motion_sensitivity.is_finite() && self.motion_sensitivity > 0.0) {
            return Err(ConfigError::out_of_range(
                "motion_sensitivity",
                self.motion_sensitivity,
                "> 0",
            ));
        }
        if !(self.elevation_smoothing > 0.0 && self.elevation_smoothing <= 1.0) {
            return Err(ConfigError::out_of_range(
                "elevation_smoothing",
                self.elevation_smoothing,
                "in (0, 1]",
            ));
        }
        if !(0.0..1.0).contains(&self.gap_ratio) {
            return Err(ConfigError::out_of_range("gap_ratio", self.gap_ratio, "in [0, 1)"));
        }
        if !(0.0..=1.0).contains(&self.darken) {
            return Err(ConfigError::out_of_range("darken", self.darken, "in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.border_opacity) {
            return Err(ConfigError::out_of_range(
                "border_opacity",
                self.border_opacity,
                "in [0, 1]",
            ));
        }
        Ok(())
    }
}
