//! Display color derivation.
//!
//! Applied in a fixed order: color mode, then inversion, then darkening.

use crate::grid::{ColorMode, GridConfig, Rgb};

/// Maps sampled pixels to display colors for one configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransform {
    mode: ColorMode,
    tint: Rgb,
    invert: bool,
    darken: f64,
}

impl ColorTransform {
    /// Captures the color settings of `config`.
    pub fn new(config: &GridConfig) -> Self {
        Self {
            mode: config.color_mode,
            tint: config.monochrome_color,
            invert: config.invert_colors,
            darken: f64::from(config.darken),
        }
    }

    /// Transforms one sampled pixel.
    pub fn apply(&self, [r, g, b]: [u8; 3]) -> Rgb {
        let mut rgb = match self.mode {
            ColorMode::Webcam => [r, g, b],
            ColorMode::Monochrome => {
                let luminance = (u32::from(r) + u32::from(g) + u32::from(b)) as f64 / 3.0 / 255.0;
                [self.tint.r, self.tint.g, self.tint.b].map(|c| (f64::from(c) * luminance).round() as u8)
            }
        };

        if self.invert {
            rgb = rgb.map(|c| 255 - c);
        }

        if self.darken > 0.0 {
            let factor = 1.0 - self.darken;
            rgb = rgb.map(|c| (f64::from(c) * factor).round() as u8);
        }

        Rgb::new(rgb[0], rgb[1], rgb[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(edit: impl FnOnce(&mut GridConfig)) -> ColorTransform {
        let mut config = GridConfig::default();
        edit(&mut config);
        ColorTransform::new(&config)
    }

    #[test]
    fn test_webcam_passthrough() {
        let t = transform(|_| {});
        assert_eq!(t.apply([200, 100, 50]), Rgb::new(200, 100, 50));
    }

    #[test]
    fn test_monochrome_then_darken() {
        let t = transform(|c| {
            c.color_mode = ColorMode::Monochrome;
            c.monochrome_color = Rgb::new(0, 0, 0xff);
            c.darken = 0.5;
        });

        // luminance 350 / 3 / 255 ~= 0.458 -> blue 117 -> darkened ~58
        let out = t.apply([200, 100, 50]);
        assert_eq!((out.r, out.g), (0, 0));
        assert!((i32::from(out.b) - 58).abs() <= 1, "blue = {}", out.b);
    }

    #[test]
    fn test_invert_applies_after_monochrome() {
        let t = transform(|c| {
            c.color_mode = ColorMode::Monochrome;
            c.monochrome_color = Rgb::new(0, 0, 0xff);
            c.invert_colors = true;
        });
        assert_eq!(t.apply([200, 100, 50]), Rgb::new(255, 255, 255 - 117));
    }

    #[test]
    fn test_full_darken_is_black() {
        let t = transform(|c| c.darken = 1.0);
        assert_eq!(t.apply([255, 128, 1]), Rgb::BLACK);
    }
}
