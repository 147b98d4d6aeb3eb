//! RGB color values and `#rrggbb` parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque 8-bit RGB color.
///
/// Serialized as a `#rrggbb` hex string so configuration files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// White.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a gray with all channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Subtracts `amount` from every channel, saturating at zero.
    pub fn shade(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_sub(amount),
            self.g.saturating_sub(amount),
            self.b.saturating_sub(amount),
        )
    }

    /// Multiplies every channel by `factor`, rounding and clamping to 255.
    pub fn scale(self, factor: f32) -> Self {
        let apply = |c: u8| (c as f32 * factor).round().clamp(0.0, 255.0) as u8;
        Self::new(apply(self.r), apply(self.g), apply(self.b))
    }

    /// Attaches an alpha value.
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba::new(self, alpha)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a color string is not `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected #rrggbb")]
pub struct ParseColorError(String);

impl FromStr for Rgb {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseColorError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseColorError(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

/// An RGB color with straight (non-premultiplied) alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Color channels.
    pub rgb: Rgb,
    /// Opacity, clamped to `[0, 1]`.
    pub alpha: f32,
}

impl Rgba {
    /// Creates a color, clamping alpha into `[0, 1]`.
    pub fn new(rgb: Rgb, alpha: f32) -> Self {
        let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        Self { rgb, alpha }
    }

    /// Fully opaque color.
    pub fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#00ff88".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 136));
        assert_eq!("0A0A0A".parse::<Rgb>().unwrap(), Rgb::gray(10));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#ééé".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_string() {
        let color = Rgb::new(18, 52, 86);
        assert_eq!(color.to_string(), "#123456");
        assert_eq!(Rgb::try_from(String::from(color)).unwrap(), color);
    }

    #[test]
    fn test_shade_saturates() {
        assert_eq!(Rgb::new(100, 60, 10).shade(80), Rgb::new(20, 0, 0));
    }

    #[test]
    fn test_scale_clamps() {
        assert_eq!(Rgb::new(200, 100, 0).scale(1.5), Rgb::new(255, 150, 0));
    }

    #[test]
    fn test_alpha_clamped() {
        assert_eq!(Rgb::BLACK.with_alpha(3.0).alpha, 1.0);
        assert_eq!(Rgb::BLACK.with_alpha(-1.0).alpha, 0.0);
        assert_eq!(Rgb::BLACK.with_alpha(f32::NAN).alpha, 0.0);
    }
}
