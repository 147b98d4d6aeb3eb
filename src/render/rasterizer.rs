//! Draws the cell grid as raised, shaded tiles.

use super::layout::GridLayout;
use super::shading::ShadingTuning;
use super::surface::{Point, Rect, Surface};
use crate::grid::{Cell, CellGrid, GridConfig, Rgb, Rgba};

/// Rasterizes a [`CellGrid`] onto a [`Surface`].
///
/// Each raised cell gets, in order: a drop shadow, a right and a bottom side
/// face connecting the shifted top face to its footprint, the top face, and
/// an outline. Flat cells only get the top face and outline.
#[derive(Debug, Clone, Default)]
pub struct Rasterizer {
    shading: ShadingTuning,
}

impl Rasterizer {
    /// Creates a rasterizer with the given shading constants.
    pub fn new(shading: ShadingTuning) -> Self {
        Self { shading }
    }

    /// Shading constants in use.
    pub fn shading(&self) -> &ShadingTuning {
        &self.shading
    }

    /// Clears `surface` to the background and draws every cell.
    ///
    /// Returns the layout used, or `None` if there was nothing to draw on.
    pub fn draw(&self, grid: &CellGrid, config: &GridConfig, surface: &mut Surface) -> Option<GridLayout> {
        if surface.is_empty() {
            return None;
        }
        surface.clear(config.background_color);

        let (width, height) = surface.logical_size();
        let layout = GridLayout::compute(width, height, grid.cols(), grid.rows(), config.gap_ratio)?;

        for (row, col, cell) in grid.iter() {
            self.draw_cell(surface, layout.tile(row, col), cell, config);
        }
        Some(layout)
    }

    fn draw_cell(&self, surface: &mut Surface, tile: Rect, cell: &Cell, config: &GridConfig) {
        let t = &self.shading;
        let elevation = cell.current_elevation;
        let (dx, dy) = (elevation * t.skew_x, elevation * t.skew_y);

        if elevation > t.raise_threshold {
            let shadow_alpha = (elevation * t.shadow_alpha_per_unit).min(t.shadow_alpha_max);
            surface.fill_rect(
                tile.translate(elevation * t.shadow_offset_x, elevation * t.shadow_offset_y),
                Rgb::BLACK.with_alpha(shadow_alpha),
            );

            let (left, top, right, bottom) = (tile.x, tile.y, tile.right(), tile.bottom());
            surface.fill_polygon(
                &[
                    Point::new(right + dx, top + dy),
                    Point::new(right, top),
                    Point::new(right, bottom),
                    Point::new(right + dx, bottom + dy),
                ],
                Rgba::opaque(cell.color.shade(t.right_face_shade)),
            );
            surface.fill_polygon(
                &[
                    Point::new(left + dx, bottom + dy),
                    Point::new(left, bottom),
                    Point::new(right, bottom),
                    Point::new(right + dx, bottom + dy),
                ],
                Rgba::opaque(cell.color.shade(t.bottom_face_shade)),
            );
        }

        let face = tile.translate(dx, dy);
        let brightness = 1.0 + elevation * t.brightness_per_unit;
        surface.fill_rect(face, Rgba::opaque(cell.color.scale(brightness)));

        let border_alpha = config.border_opacity + elevation * t.border_alpha_per_unit;
        surface.stroke_rect(face, t.border_width, config.border_color.with_alpha(border_alpha));
    }
}
