//! Placement of the grid on the display surface.

use super::surface::Rect;

/// Square-cell layout that covers the display.
///
/// Cells are sized so the grid fills the display on both axes, overflowing
/// one of them rather than letterboxing. The overflow is split evenly, so the
/// grid is always centred.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    /// Side of one cell including its gap.
    pub cell_size: f32,
    /// Space between neighbouring tiles.
    pub gap: f32,
    /// Left edge of column 0 (negative when the grid overflows).
    pub origin_x: f32,
    /// Top edge of row 0 (negative when the grid overflows).
    pub origin_y: f32,
}

impl GridLayout {
    /// Computes the layout for a `cols × rows` grid on a display of the given
    /// logical size. Returns `None` for an empty grid or display.
    pub fn compute(
        display_width: f32,
        display_height: f32,
        cols: usize,
        rows: usize,
        gap_ratio: f32,
    ) -> Option<Self> {
        if cols == 0 || rows == 0 || !(display_width > 0.0 && display_height > 0.0) {
            return None;
        }
        let cell_size = (display_width / cols as f32).max(display_height / rows as f32);
        Some(Self {
            cell_size,
            gap: cell_size * gap_ratio,
            origin_x: (display_width - cell_size * cols as f32) / 2.0,
            origin_y: (display_height - cell_size * rows as f32) / 2.0,
        })
    }

    /// Unraised tile footprint of the cell at `(row, col)`, inset by half the
    /// gap on every side.
    pub fn tile(&self, row: usize, col: usize) -> Rect {
        let inset = self.gap / 2.0;
        Rect::new(
            self.origin_x + col as f32 * self.cell_size + inset,
            self.origin_y + row as f32 * self.cell_size + inset,
            self.cell_size - self.gap,
            self.cell_size - self.gap,
        )
    }
}
