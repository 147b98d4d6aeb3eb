//! Per-cell state and the flat cell grid.

use super::color::Rgb;

/// Color given to every cell before the first sample arrives.
pub const BASELINE_COLOR: Rgb = Rgb::gray(30);

/// State of one grid position, carried across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Display color after color-mode, invert and darken transforms.
    pub color: Rgb,
    /// Smoothed motion intensity in `[0, 1]`.
    pub motion: f32,
    /// Desired raised height for this tick.
    pub target_elevation: f32,
    /// Raised height actually rendered.
    pub current_elevation: f32,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            color: BASELINE_COLOR,
            motion: 0.0,
            target_elevation: 0.0,
            current_elevation: 0.0,
        }
    }
}

/// Row-major grid of cells stored contiguously, indexed `row * cols + col`.
#[derive(Debug, Clone)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Allocates a grid filled with baseline cells.
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    /// All cells in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable access to all cells in row-major order.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterates `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i / cols, i % cols, cell))
    }

    /// Returns true if the grid already has the given dimensions.
    pub fn has_dimensions(&self, cols: usize, rows: usize) -> bool {
        self.cols == cols && self.rows == rows
    }

    /// Reinitializes every cell to the baseline, reallocating if the
    /// dimensions change.
    pub fn reset(&mut self, cols: usize, rows: usize) {
        if self.has_dimensions(cols, rows) {
            self.cells.fill(Cell::default());
        } else {
            *self = Self::new(cols, rows);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_baseline() {
        let grid = CellGrid::new(4, 3);
        assert_eq!(grid.len(), 12);
        assert!(grid.cells().iter().all(|c| *c == Cell::default()));
        assert_eq!(grid.get(2, 3).unwrap().color, BASELINE_COLOR);
        assert!(grid.get(3, 0).is_none());
        assert!(grid.get(0, 4).is_none());
    }

    #[test]
    fn test_iter_is_row_major() {
        let grid = CellGrid::new(3, 2);
        let coords: Vec<_> = grid.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(coords, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn test_reset_zeroes_and_resizes() {
        let mut grid = CellGrid::new(2, 2);
        grid.cells_mut()[3].motion = 0.9;
        grid.cells_mut()[3].current_elevation = 4.0;

        grid.reset(2, 2);
        assert_eq!(grid.cells()[3], Cell::default());

        grid.reset(5, 1);
        assert_eq!((grid.cols(), grid.rows(), grid.len()), (5, 1, 5));
    }
}
