//! Grid-wide motion statistics.
//!
//! A cheap per-tick summary of the cell grid, used for logging and metrics.

use crate::grid::CellGrid;

/// Summary of one grid state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GridStatistics {
    /// Mean smoothed motion over all cells.
    pub mean_motion: f32,
    /// Highest smoothed motion of any cell.
    pub peak_motion: f32,
    /// Mean rendered elevation.
    pub mean_elevation: f32,
    /// Highest rendered elevation.
    pub peak_elevation: f32,
    /// Cells raised above the flat-drawing threshold.
    pub raised_cells: usize,
    /// Number of cells analyzed.
    pub cell_count: usize,
}

impl GridStatistics {
    /// Summarizes `grid`, counting cells with elevation above `raise_threshold`
    /// as raised.
    pub fn analyze(grid: &CellGrid, raise_threshold: f32) -> Self {
        let cells = grid.cells();
        if cells.is_empty() {
            return Self::default();
        }

        let mut stats = Self {
            cell_count: cells.len(),
            ..Self::default()
        };
        let mut motion_sum = 0.0f64;
        let mut elevation_sum = 0.0f64;

        for cell in cells {
            motion_sum += f64::from(cell.motion);
            elevation_sum += f64::from(cell.current_elevation);
            stats.peak_motion = stats.peak_motion.max(cell.motion);
            stats.peak_elevation = stats.peak_elevation.max(cell.current_elevation);
            if cell.current_elevation > raise_threshold {
                stats.raised_cells += 1;
            }
        }

        let n = cells.len() as f64;
        stats.mean_motion = (motion_sum / n) as f32;
        stats.mean_elevation = (elevation_sum / n) as f32;
        stats
    }

    /// Fraction of cells that are raised, in `[0, 1]`.
    pub fn raised_fraction(&self) -> f32 {
        if self.cell_count == 0 {
            return 0.0;
        }
        self.raised_cells as f32 / self.cell_count as f32
    }

    /// Returns true if nothing in the grid is moving.
    pub fn is_still(&self) -> bool {
        self.peak_motion == 0.0 && self.peak_elevation == 0.0
    }
}
