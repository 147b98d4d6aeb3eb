//! Metrics collection and registry.

use crate::analysis::GridStatistics;
use crate::capture::Camera;
use crate::renderer::{MotionGridRenderer, RendererState};
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Registering or encoding a metric failed.
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of renderer state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether the camera is streaming.
    pub capture_ready: bool,
    /// Live camera streams.
    pub active_streams: usize,
    /// Ticks that produced a frame.
    pub frames_rendered: u64,
    /// Ticks that were skipped.
    pub ticks_skipped: u64,
    /// Failed camera access requests.
    pub capture_errors: u64,
    /// Grid summary from the latest tick.
    pub statistics: GridStatistics,
}

/// Prometheus metrics registry for the motion grid.
pub struct MetricsRegistry {
    registry: Registry,

    // Capture
    capture_ready: IntGauge,
    active_streams: IntGauge,
    capture_errors_total: IntCounter,

    // Frame loop
    frames_rendered_total: IntCounter,
    ticks_skipped_total: IntCounter,

    // Grid
    mean_motion: Gauge,
    peak_motion: Gauge,
    peak_elevation: Gauge,
    raised_cells: IntGauge,
    cell_count: IntGauge,
}

impl MetricsRegistry {
    /// Creates a new registry with all motion grid metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let capture_ready = IntGauge::new(
            "motion_grid_capture_ready",
            "Camera streaming status (1=ready, 0=not ready)",
        )?;
        let active_streams = IntGauge::new(
            "motion_grid_active_streams",
            "Live camera streams held on the device",
        )?;
        let capture_errors_total = IntCounter::new(
            "motion_grid_capture_errors_total",
            "Total failed camera access requests",
        )?;

        let frames_rendered_total = IntCounter::new(
            "motion_grid_frames_rendered_total",
            "Total ticks that rendered a frame",
        )?;
        let ticks_skipped_total = IntCounter::new(
            "motion_grid_ticks_skipped_total",
            "Total ticks skipped (not ready, no display or no frame)",
        )?;

        let mean_motion = Gauge::new("motion_grid_mean_motion", "Mean smoothed motion per cell")?;
        let peak_motion = Gauge::new("motion_grid_peak_motion", "Highest smoothed cell motion")?;
        let peak_elevation = Gauge::new(
            "motion_grid_peak_elevation",
            "Highest rendered cell elevation in pixels",
        )?;
        let raised_cells = IntGauge::new(
            "motion_grid_raised_cells",
            "Cells drawn raised above the flat threshold",
        )?;
        let cell_count = IntGauge::new("motion_grid_cells", "Number of cells in the grid")?;

        registry.register(Box::new(capture_ready.clone()))?;
        registry.register(Box::new(active_streams.clone()))?;
        registry.register(Box::new(capture_errors_total.clone()))?;
        registry.register(Box::new(frames_rendered_total.clone()))?;
        registry.register(Box::new(ticks_skipped_total.clone()))?;
        registry.register(Box::new(mean_motion.clone()))?;
        registry.register(Box::new(peak_motion.clone()))?;
        registry.register(Box::new(peak_elevation.clone()))?;
        registry.register(Box::new(raised_cells.clone()))?;
        registry.register(Box::new(cell_count.clone()))?;

        Ok(Self {
            registry,
            capture_ready,
            active_streams,
            capture_errors_total,
            frames_rendered_total,
            ticks_skipped_total,
            mean_motion,
            peak_motion,
            peak_elevation,
            raised_cells,
            cell_count,
        })
    }

    /// Updates all metrics from a snapshot.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.capture_ready.set(i64::from(snapshot.capture_ready));
        self.active_streams.set(snapshot.active_streams as i64);

        // Counters only move forward; catch up to the snapshot totals
        advance(&self.capture_errors_total, snapshot.capture_errors);
        advance(&self.frames_rendered_total, snapshot.frames_rendered);
        advance(&self.ticks_skipped_total, snapshot.ticks_skipped);

        let stats = &snapshot.statistics;
        self.mean_motion.set(f64::from(stats.mean_motion));
        self.peak_motion.set(f64::from(stats.peak_motion));
        self.peak_elevation.set(f64::from(stats.peak_elevation));
        self.raised_cells.set(stats.raised_cells as i64);
        self.cell_count.set(stats.cell_count as i64);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

impl MetricsSnapshot {
    /// Captures the current state of a renderer.
    pub fn from_renderer<C: Camera>(renderer: &MotionGridRenderer<C>) -> Self {
        let counters = renderer.counters();
        Self {
            capture_ready: *renderer.state() == RendererState::Ready,
            active_streams: renderer.active_streams(),
            frames_rendered: counters.frames_rendered,
            ticks_skipped: counters.ticks_skipped,
            capture_errors: counters.capture_errors,
            statistics: renderer.statistics(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureConfig, MockCamera};
    use crate::grid::GridConfig;

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            capture_ready: true,
            active_streams: 1,
            frames_rendered: 120,
            ticks_skipped: 3,
            capture_errors: 1,
            statistics: GridStatistics {
                raised_cells: 42,
                cell_count: 2400,
                ..GridStatistics::default()
            },
        };

        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("motion_grid_capture_ready 1"));
        assert!(output.contains("motion_grid_frames_rendered_total 120"));
        assert!(output.contains("motion_grid_raised_cells 42"));
        assert!(output.contains("motion_grid_cells 2400"));
    }

    #[test]
    fn test_counters_never_go_backwards() {
        let registry = MetricsRegistry::new().unwrap();
        registry.update(&MetricsSnapshot {
            frames_rendered: 10,
            ..MetricsSnapshot::default()
        });
        registry.update(&MetricsSnapshot {
            frames_rendered: 4,
            ..MetricsSnapshot::default()
        });

        let output = registry.encode().unwrap();
        assert!(output.contains("motion_grid_frames_rendered_total 10"));
    }

    #[test]
    fn test_snapshot_from_renderer() {
        let mut renderer = MotionGridRenderer::new(
            MockCamera::new(),
            CaptureConfig::with_dimensions(32, 24),
            GridConfig::with_dimensions(8, 6),
        )
        .unwrap();
        renderer.attach_display(64.0, 48.0, 1.0);
        renderer.tick();
        renderer.request_access().unwrap();
        renderer.tick();

        let snapshot = MetricsSnapshot::from_renderer(&renderer);
        assert!(snapshot.capture_ready);
        assert_eq!(snapshot.active_streams, 1);
        assert_eq!(snapshot.frames_rendered, 1);
        assert_eq!(snapshot.ticks_skipped, 1);
        assert_eq!(snapshot.statistics.cell_count, 48);
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("motion_grid_capture_ready"));
        assert!(output.contains("motion_grid_peak_elevation"));
        assert!(output.contains("motion_grid_ticks_skipped_total"));
    }
}
