//! Temporal motion estimation via frame differencing.
//!
//! Each tick the current sample is compared with the previous one cell by
//! cell. The absolute RGB difference becomes a raw motion value, which is
//! low-pass filtered into the cell's motion, which in turn drives its
//! elevation through a second one-pole filter.

use super::transform::ColorTransform;
use super::tuning::MotionTuning;
use crate::grid::{CellGrid, GridConfig};
use crate::sampling::SampleBuffer;

/// Raw motion for one cell: summed channel difference, normalized and
/// dampened by `sensitivity`, clamped to `[0, 1]`.
#[inline]
pub fn raw_motion(current: [u8; 3], previous: [u8; 3], sensitivity: f32) -> f32 {
    let diff: u32 = current
        .iter()
        .zip(previous.iter())
        .map(|(&c, &p)| u32::from(c.abs_diff(p)))
        .sum();
    (diff as f32 / 255.0 / sensitivity).clamp(0.0, 1.0)
}

/// Updates cell motion, color and elevation from successive samples.
#[derive(Debug, Default)]
pub struct MotionEstimator {
    tuning: MotionTuning,
    /// Previous tick's sample for differencing.
    previous: Option<SampleBuffer>,
}

impl MotionEstimator {
    /// Creates an estimator with no previous sample.
    pub fn new(tuning: MotionTuning) -> Self {
        Self {
            tuning,
            previous: None,
        }
    }

    /// Folds `sample` into `grid`.
    ///
    /// Cells without a matching sample are left untouched; cells without a
    /// matching previous sample (first tick, or the grid was resized) get zero
    /// raw motion.
    pub fn update(&mut self, grid: &mut CellGrid, sample: &SampleBuffer, config: &GridConfig) {
        let transform = ColorTransform::new(config);
        let retention = self.tuning.retention;
        let fresh = self.tuning.fresh_weight();
        let max_elevation = config.max_elevation.max(0.0);
        let cols = grid.cols();

        let previous = self
            .previous
            .as_ref()
            .filter(|prev| prev.has_dimensions(sample.cols(), sample.rows()));

        for (index, cell) in grid.cells_mut().iter_mut().enumerate() {
            let (row, col) = (index / cols, index % cols);
            let Some(rgb) = sample.rgb_at(row, col) else {
                continue;
            };

            let raw = previous
                .and_then(|prev| prev.rgb_at(row, col))
                .map_or(0.0, |prev| raw_motion(rgb, prev, config.motion_sensitivity));

            cell.motion = (cell.motion * retention + raw * fresh).clamp(0.0, 1.0);
            cell.color = transform.apply(rgb);
            cell.target_elevation = cell.motion * max_elevation;
            cell.current_elevation += (cell.target_elevation - cell.current_elevation)
                * config.elevation_smoothing;
            cell.current_elevation = cell.current_elevation.clamp(0.0, max_elevation);
        }

        match &mut self.previous {
            Some(prev) => prev.copy_from(sample),
            None => self.previous = Some(sample.clone()),
        }
    }

    /// Forgets the previous sample so the next tick starts from zero motion.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Returns true if a previous sample is available for differencing.
    pub fn is_primed(&self) -> bool {
        self.previous.is_some()
    }

    /// Motion tuning in use.
    pub fn tuning(&self) -> &MotionTuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn solid(cols: usize, rows: usize, rgb: [u8; 3]) -> SampleBuffer {
        let data = (0..cols * rows).flat_map(|_| [rgb[0], rgb[1], rgb[2], 255]).collect();
        SampleBuffer::from_rgba(cols, rows, data).unwrap()
    }

    #[test]
    fn test_first_tick_has_zero_motion() {
        let config = GridConfig::with_dimensions(4, 3);
        let mut grid = CellGrid::new(4, 3);
        let mut estimator = MotionEstimator::default();

        estimator.update(&mut grid, &solid(4, 3, [255, 255, 255]), &config);

        assert!(estimator.is_primed());
        assert!(grid.cells().iter().all(|c| c.motion == 0.0 && c.current_elevation == 0.0));
        assert!(grid.cells().iter().all(|c| c.color.r == 255));
    }

    #[test]
    fn test_change_produces_motion() {
        let config = GridConfig::with_dimensions(2, 2);
        let mut grid = CellGrid::new(2, 2);
        let mut estimator = MotionEstimator::default();

        estimator.update(&mut grid, &solid(2, 2, [0, 0, 0]), &config);
        estimator.update(&mut grid, &solid(2, 2, [255, 255, 255]), &config);

        let cell = grid.get(0, 0).unwrap();
        // raw motion saturates at 1, smoothed by 0.3
        assert!((cell.motion - 0.3).abs() < 1e-6);
        assert!((cell.target_elevation - 0.3 * 15.0).abs() < 1e-5);
        assert!((cell.current_elevation - 0.3 * 15.0 * 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_raw_motion_scaling() {
        // diff 51 / 255 / 0.4 = 0.5
        assert!((raw_motion([51, 0, 0], [0, 0, 0], 0.4) - 0.5).abs() < 1e-6);
        assert_eq!(raw_motion([255, 255, 255], [0, 0, 0], 0.4), 1.0);
        assert_eq!(raw_motion([9, 9, 9], [9, 9, 9], 0.4), 0.0);
    }

    #[test]
    fn test_resized_sample_does_not_crash() {
        let config = GridConfig::with_dimensions(3, 3);
        let mut grid = CellGrid::new(3, 3);
        let mut estimator = MotionEstimator::default();

        estimator.update(&mut grid, &solid(2, 2, [0, 0, 0]), &config);
        estimator.update(&mut grid, &solid(3, 3, [255, 255, 255]), &config);

        // previous sample had other dimensions: treated as no motion
        assert!(grid.cells().iter().all(|c| c.motion == 0.0));
    }

    #[test]
    fn test_reset_forgets_previous() {
        let config = GridConfig::with_dimensions(1, 1);
        let mut grid = CellGrid::new(1, 1);
        let mut estimator = MotionEstimator::default();

        estimator.update(&mut grid, &solid(1, 1, [0, 0, 0]), &config);
        estimator.reset();
        assert!(!estimator.is_primed());

        estimator.update(&mut grid, &solid(1, 1, [255, 0, 0]), &config);
        assert_eq!(grid.cells()[0].motion, 0.0);
    }

    #[test]
    fn test_constant_motion_converges_without_overshoot() {
        let config = GridConfig::with_dimensions(1, 1);
        let mut grid = CellGrid::new(1, 1);
        let mut estimator = MotionEstimator::default();
        let (dark, light) = (solid(1, 1, [0, 0, 0]), solid(1, 1, [10, 10, 10]));

        // alternating frames give a constant raw motion of 30/255/0.4
        let raw = raw_motion([10, 10, 10], [0, 0, 0], config.motion_sensitivity);
        let mut last_motion = 0.0;
        let mut last_elevation = 0.0;
        for tick in 0..400 {
            let sample = if tick % 2 == 0 { &dark } else { &light };
            estimator.update(&mut grid, sample, &config);
            let cell = grid.cells()[0];

            assert!(cell.motion <= raw + 1e-6);
            assert!(cell.motion >= last_motion - 1e-6);
            assert!(cell.current_elevation <= raw * config.max_elevation + 1e-4);
            assert!(cell.current_elevation >= last_elevation - 1e-6);
            last_motion = cell.motion;
            last_elevation = cell.current_elevation;
        }

        assert!((last_motion - raw).abs() < 1e-4);
        assert!((last_elevation - raw * config.max_elevation).abs() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_motion_and_elevation_stay_bounded(
            frames in prop::collection::vec(prop::collection::vec(any::<u8>(), 4 * 3 * 4), 1..12),
            sensitivity in 0.01f32..4.0,
            smoothing in 0.01f32..=1.0,
            max_elevation in 0.0f32..50.0,
        ) {
            let config = GridConfig {
                motion_sensitivity: sensitivity,
                elevation_smoothing: smoothing,
                max_elevation,
                ..GridConfig::with_dimensions(4, 3)
            };
            let mut grid = CellGrid::new(4, 3);
            let mut estimator = MotionEstimator::default();

            for data in frames {
                let sample = SampleBuffer::from_rgba(4, 3, data).unwrap();
                estimator.update(&mut grid, &sample, &config);
                for cell in grid.cells() {
                    prop_assert!((0.0..=1.0).contains(&cell.motion));
                    prop_assert!(cell.current_elevation >= 0.0);
                    prop_assert!(cell.current_elevation <= max_elevation);
                }
            }
        }

        #[test]
        fn prop_first_tick_is_motionless(data in prop::collection::vec(any::<u8>(), 5 * 2 * 4)) {
            let config = GridConfig::with_dimensions(5, 2);
            let mut grid = CellGrid::new(5, 2);
            let mut estimator = MotionEstimator::default();

            estimator.update(&mut grid, &SampleBuffer::from_rgba(5, 2, data).unwrap(), &config);
            prop_assert!(grid.cells().iter().all(|c| c.motion == 0.0));
        }
    }
}
