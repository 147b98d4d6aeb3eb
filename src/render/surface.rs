//! Software RGBA display surface.
//!
//! A surface has a logical (CSS pixel) size and a device pixel ratio; its
//! backing store is `round(logical * ratio)` physical pixels. All drawing
//! calls take logical coordinates.
//!
//! Axis-aligned rectangles are antialiased by exact area coverage. Polygons
//! are filled by pixel-centre scanline without antialiasing. Blending is
//! straight-alpha source-over.

use crate::grid::{Rgb, Rgba};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when exporting a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The surface has zero physical width or height.
    #[error("surface has no pixels")]
    Empty,
    /// Encoding or writing the PNG failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// A point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Horizontal offset from the left edge.
    pub x: f32,
    /// Vertical offset from the top edge.
    pub y: f32,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width; may be zero.
    pub width: f32,
    /// Height; may be zero.
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same rectangle shifted by `(dx, dy)`.
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Right edge, exclusive.
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge, exclusive.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Length of `[a0, a1)` that falls inside pixel `[p, p + 1)`.
#[inline]
fn overlap(a0: f32, a1: f32, p: usize) -> f32 {
    let p = p as f32;
    (a1.min(p + 1.0) - a0.max(p)).clamp(0.0, 1.0)
}

/// An RGBA8 framebuffer.
#[derive(Clone)]
pub struct Surface {
    logical_width: f32,
    logical_height: f32,
    scale: f32,
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Surface {
    /// Creates a transparent surface.
    pub fn new(logical_width: f32, logical_height: f32, device_pixel_ratio: f32) -> Self {
        let mut surface = Self {
            logical_width: 0.0,
            logical_height: 0.0,
            scale: 1.0,
            width: 0,
            height: 0,
            pixels: Vec::new(),
        };
        surface.resize(logical_width, logical_height, device_pixel_ratio);
        surface
    }

    /// Changes the logical size or pixel ratio, reallocating if the physical
    /// size changes. Contents are undefined afterwards.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, device_pixel_ratio: f32) {
        let sanitize = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        self.logical_width = sanitize(logical_width);
        self.logical_height = sanitize(logical_height);
        self.scale = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        let width = (self.logical_width * self.scale).round() as usize;
        let height = (self.logical_height * self.scale).round() as usize;
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
        }
    }

    /// Logical size in CSS pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        (self.logical_width, self.logical_height)
    }

    /// Physical pixels per logical pixel.
    pub fn device_pixel_ratio(&self) -> f32 {
        self.scale
    }

    /// Physical width.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Physical height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if the surface has no physical pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA at physical pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Fills the whole surface with an opaque color.
    pub fn clear(&mut self, color: Rgb) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    #[inline]
    fn blend(&mut self, x: usize, y: usize, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let i = (y * self.width + x) * 4;
        let px = &mut self.pixels[i..i + 4];
        if alpha >= 1.0 {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
            return;
        }
        let keep = 1.0 - alpha;
        for (dst, src) in px[..3].iter_mut().zip([color.r, color.g, color.b]) {
            *dst = (f32::from(src) * alpha + f32::from(*dst) * keep).round() as u8;
        }
        px[3] = (255.0 * alpha + f32::from(px[3]) * keep).round() as u8;
    }

    /// Fills a rectangle with area-coverage antialiasing.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let s = self.scale;
        let (x0, x1) = (rect.x * s, rect.right() * s);
        let (y0, y1) = (rect.y * s, rect.bottom() * s);
        if !(x1 > x0 && y1 > y0) || color.alpha <= 0.0 {
            return;
        }

        let col_start = x0.floor().max(0.0) as usize;
        let col_end = (x1.ceil().max(0.0) as usize).min(self.width);
        let row_start = y0.floor().max(0.0) as usize;
        let row_end = (y1.ceil().max(0.0) as usize).min(self.height);

        for py in row_start..row_end {
            let cover_y = overlap(y0, y1, py);
            if cover_y <= 0.0 {
                continue;
            }
            for px in col_start..col_end {
                let cover = overlap(x0, x1, px) * cover_y;
                self.blend(px, py, color.rgb, color.alpha * cover);
            }
        }
    }

    /// Strokes the outline of `rect`, centred on its edges.
    pub fn stroke_rect(&mut self, rect: Rect, line_width: f32, color: Rgba) {
        if !(line_width > 0.0) {
            return;
        }
        let half = line_width / 2.0;
        let outer = Rect::new(
            rect.x - half,
            rect.y - half,
            rect.width + line_width,
            rect.height + line_width,
        );

        // Bands are disjoint so corners are not blended twice.
        self.fill_rect(Rect::new(outer.x, outer.y, outer.width, line_width), color);
        self.fill_rect(
            Rect::new(outer.x, rect.bottom() - half, outer.width, line_width),
            color,
        );
        let side_height = outer.height - 2.0 * line_width;
        if side_height > 0.0 {
            let side_y = outer.y + line_width;
            self.fill_rect(Rect::new(outer.x, side_y, line_width, side_height), color);
            self.fill_rect(
                Rect::new(rect.right() - half, side_y, line_width, side_height),
                color,
            );
        }
    }

    /// Fills a simple polygon. Pixels whose centres fall inside are painted.
    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        if points.len() < 3 || color.alpha <= 0.0 || self.is_empty() {
            return;
        }
        let s = self.scale;
        let scaled: Vec<(f32, f32)> = points.iter().map(|p| (p.x * s, p.y * s)).collect();

        let (min_y, max_y) = scaled
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &(_, y)| (lo.min(y), hi.max(y)));
        if !(max_y > min_y) {
            return;
        }

        let row_start = (min_y - 0.5).ceil().max(0.0) as usize;
        let row_end = ((max_y - 0.5).ceil().max(0.0) as usize).min(self.height);
        let mut crossings: Vec<f32> = Vec::with_capacity(scaled.len());

        for py in row_start..row_end {
            let cy = py as f32 + 0.5;
            crossings.clear();
            for (i, &(ax, ay)) in scaled.iter().enumerate() {
                let (bx, by) = scaled[(i + 1) % scaled.len()];
                if (ay <= cy && by > cy) || (by <= cy && ay > cy) {
                    crossings.push(ax + (cy - ay) * (bx - ax) / (by - ay));
                }
            }
            crossings.sort_by(f32::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = (span[0] - 0.5).ceil().max(0.0) as usize;
                let end = ((span[1] - 0.5).ceil().max(0.0) as usize).min(self.width);
                for px in start..end {
                    self.blend(px, py, color.rgb, color.alpha);
                }
            }
        }
    }

    /// Copies the surface into an `image` buffer.
    pub fn to_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels.clone())
    }

    /// Writes the surface to a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SurfaceError> {
        if self.is_empty() {
            return Err(SurfaceError::Empty);
        }
        let image = self.to_image().ok_or(SurfaceError::Empty)?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("logical", &(self.logical_width, self.logical_height))
            .field("scale", &self.scale)
            .field("physical", &(self.width, self.height))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);

    #[test]
    fn test_physical_size_follows_ratio() {
        let surface = Surface::new(100.0, 50.0, 2.0);
        assert_eq!((surface.width(), surface.height()), (200, 100));
        assert_eq!(surface.logical_size(), (100.0, 50.0));
        assert_eq!(surface.pixels().len(), 200 * 100 * 4);
    }

    #[test]
    fn test_invalid_sizes_are_empty() {
        assert!(Surface::new(0.0, 10.0, 1.0).is_empty());
        assert!(Surface::new(f32::NAN, 10.0, 1.0).is_empty());
        assert_eq!(Surface::new(10.0, 10.0, -3.0).device_pixel_ratio(), 1.0);
    }

    #[test]
    fn test_fill_rect_scaled() {
        let mut surface = Surface::new(4.0, 4.0, 2.0);
        surface.clear(Rgb::BLACK);
        surface.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0), Rgba::opaque(RED));

        assert_eq!(surface.pixel(2, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(3, 3), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(4, 4), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_fill_rect_partial_coverage() {
        let mut surface = Surface::new(2.0, 1.0, 1.0);
        surface.clear(Rgb::BLACK);
        surface.fill_rect(Rect::new(0.5, 0.0, 1.0, 1.0), Rgba::opaque(Rgb::WHITE));

        // each pixel half covered
        assert_eq!(surface.pixel(0, 0), Some([128, 128, 128, 255]));
        assert_eq!(surface.pixel(1, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_fill_rect_clips_to_surface() {
        let mut surface = Surface::new(2.0, 2.0, 1.0);
        surface.fill_rect(Rect::new(-5.0, -5.0, 100.0, 100.0), Rgba::opaque(RED));
        assert!(surface.pixels().chunks_exact(4).all(|px| px == [255, 0, 0, 255]));
    }

    #[test]
    fn test_alpha_blend() {
        let mut surface = Surface::new(1.0, 1.0, 1.0);
        surface.clear(Rgb::WHITE);
        surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgb::BLACK.with_alpha(0.5));
        assert_eq!(surface.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut surface = Surface::new(4.0, 4.0, 1.0);
        surface.clear(Rgb::BLACK);
        let triangle = [Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 4.0)];
        surface.fill_polygon(&triangle, Rgba::opaque(RED));

        assert_eq!(surface.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(3, 3), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_degenerate_polygon_noop() {
        let mut surface = Surface::new(4.0, 4.0, 1.0);
        surface.clear(Rgb::BLACK);
        let line = [Point::new(0.0, 1.0), Point::new(4.0, 1.0), Point::new(2.0, 1.0)];
        surface.fill_polygon(&line, Rgba::opaque(RED));
        assert!(surface.pixels().chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }

    #[test]
    fn test_stroke_leaves_interior() {
        let mut surface = Surface::new(10.0, 10.0, 1.0);
        surface.clear(Rgb::BLACK);
        surface.stroke_rect(Rect::new(2.0, 2.0, 6.0, 6.0), 2.0, Rgba::opaque(RED));

        assert_eq!(surface.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(5, 2), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(5, 5), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_to_image_dimensions() {
        let surface = Surface::new(3.0, 2.0, 1.0);
        let image = surface.to_image().unwrap();
        assert_eq!(image.dimensions(), (3, 2));
    }

    #[test]
    fn test_save_empty_fails() {
        let surface = Surface::new(0.0, 0.0, 1.0);
        assert!(matches!(
            surface.save_png("unused.png"),
            Err(SurfaceError::Empty)
        ));
    }
}
