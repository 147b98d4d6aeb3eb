//! Configuration file format and validation errors.
//!
//! Every section is optional; missing fields fall back to their defaults.
//!
//! ```toml
//! [grid]
//! cols = 80
//! color_mode = "monochrome"
//! monochrome_color = "#00ff88"
//!
//! [capture]
//! device_id = 0
//!
//! [display]
//! width = 1280.0
//! height = 720.0
//! device_pixel_ratio = 2.0
//!
//! [output]
//! frame_count = 0
//! fps = 60
//! ```

use crate::capture::CaptureConfig;
use crate::grid::GridConfig;
use crate::motion::MotionTuning;
use crate::render::ShadingTuning;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Capture width or height is zero.
    #[error("invalid capture dimensions")]
    InvalidDimensions,
    /// Frame rate outside 1-240.
    #[error("invalid frame rate (must be 1-240 fps)")]
    InvalidFrameRate,
    /// Grid has zero columns or rows.
    #[error("invalid grid size {cols}x{rows}")]
    InvalidGridSize {
        /// Requested columns.
        cols: usize,
        /// Requested rows.
        rows: usize,
    },
    /// A numeric setting is non-finite or outside its range.
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        /// Dotted setting name, e.g. `grid.darken`.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable accepted range.
        expected: &'static str,
    },
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    /// The file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub(crate) fn out_of_range(field: &'static str, value: f32, expected: &'static str) -> Self {
        Self::OutOfRange {
            field,
            value: f64::from(value),
            expected,
        }
    }
}

/// Size of the display surface in logical (CSS) pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Logical width.
    pub width: f32,
    /// Logical height.
    pub height: f32,
    /// Physical pixels per logical pixel.
    pub device_pixel_ratio: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
            device_pixel_ratio: 1.0,
        }
    }
}

impl DisplayConfig {
    /// Validates the display size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(ConfigError::out_of_range("display.width", self.width, "> 0"));
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(ConfigError::out_of_range("display.height", self.height, "> 0"));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(ConfigError::out_of_range(
                "display.device_pixel_ratio",
                self.device_pixel_ratio,
                "> 0",
            ));
        }
        Ok(())
    }
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Number of frames to render; 0 runs until interrupted.
    pub frame_count: u32,
    /// Refresh rate of the render loop.
    pub fps: u32,
    /// Metrics server port (0 to disable).
    pub metrics_port: u16,
    /// Where to write a PNG of the last rendered frame.
    pub snapshot: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frame_count: 0,
            fps: 60,
            metrics_port: 0,
            snapshot: None,
        }
    }
}

impl OutputConfig {
    /// Validates the output settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 || self.fps > 240 {
            return Err(ConfigError::InvalidFrameRate);
        }
        Ok(())
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// `[grid]`: layout and color options.
    #[serde(default)]
    pub grid: GridConfig,
    /// `[capture]`: camera device and format.
    #[serde(default)]
    pub capture: CaptureConfig,
    /// `[display]`: surface size.
    #[serde(default)]
    pub display: DisplayConfig,
    /// `[motion]`: smoothing constants.
    #[serde(default)]
    pub motion: MotionTuning,
    /// `[shading]`: tile shading constants.
    #[serde(default)]
    pub shading: ShadingTuning,
    /// `[output]`: run length, snapshot and metrics.
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.capture.validate()?;
        self.display.validate()?;
        self.motion.validate()?;
        self.shading.validate()?;
        self.output.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{ColorMode, Rgb};

    #[test]
    fn test_empty_file_is_default() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.output.fps, 60);
        assert!(config.output.snapshot.is_none());
    }

    #[test]
    fn test_sections_parse() {
        let config = FileConfig::from_toml(
            r##"
            [grid]
            cols = 16
            rows = 9
            color_mode = "monochrome"
            background_color = "#101010"

            [display]
            width = 320.0
            height = 180.0
            device_pixel_ratio = 2.0

            [motion]
            retention = 0.5

            [output]
            frame_count = 10
            snapshot = "out.png"
            "##,
        )
        .unwrap();

        assert_eq!(config.grid.cols, 16);
        assert_eq!(config.grid.color_mode, ColorMode::Monochrome);
        assert_eq!(config.grid.background_color, Rgb::gray(0x10));
        assert_eq!(config.display.device_pixel_ratio, 2.0);
        assert_eq!(config.motion.retention, 0.5);
        assert_eq!(config.output.frame_count, 10);
        assert_eq!(config.output.snapshot, Some(PathBuf::from("out.png")));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            FileConfig::from_toml("[grid]\ndarken = 2.0"),
            Err(ConfigError::OutOfRange { field: "darken", .. })
        ));
        assert!(matches!(
            FileConfig::from_toml("[output]\nfps = 0"),
            Err(ConfigError::InvalidFrameRate)
        ));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        assert!(matches!(
            FileConfig::from_toml("[grid]\nborder_color = \"white\""),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FileConfig::from_file("/nonexistent/motion-grid.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }

    #[test]
    fn test_shading_section_validated() {
        assert!(matches!(
            FileConfig::from_toml("[shading]\nshadow_alpha_max = 1.5"),
            Err(ConfigError::OutOfRange { field: "shading.shadow_alpha_max", .. })
        ));
        assert!(FileConfig::from_toml("[shading]\nshadow_alpha_max = 0.3").is_ok());
    }
}
