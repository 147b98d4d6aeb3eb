//! Motion Grid CLI
//!
//! Runs the renderer headless against a camera (or the synthetic source),
//! logs grid statistics and optionally writes the final frame as a PNG.

use chrono::Local;
use clap::Parser;
use motion_grid::{
    capture::{Camera, MockCamera},
    config::{ConfigError, FileConfig},
    grid::{ColorMode, Rgb},
    render::{Surface, SurfaceError},
    schedule::{CancelHandle, FrameLoop},
    CaptureError, MotionGridRenderer, TickOutcome,
};
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "motion-grid", version, about = "Webcam motion rendered as a pseudo-3D pixel grid")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// frames to render (0 = until Ctrl-C)
    #[arg(long)]
    frames: Option<u32>,

    /// ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// grid columns
    #[arg(long)]
    cols: Option<usize>,

    /// grid rows
    #[arg(long)]
    rows: Option<usize>,

    /// display width in logical pixels
    #[arg(long)]
    width: Option<f32>,

    /// display height in logical pixels
    #[arg(long)]
    height: Option<f32>,

    /// device pixel ratio
    #[arg(long)]
    dpr: Option<f32>,

    /// single-hue tiles, optionally with a tint like "#00ff88"
    #[arg(long, value_name = "COLOR", num_args = 0..=1)]
    monochrome: Option<Option<Rgb>>,

    /// do not mirror horizontally
    #[arg(long)]
    no_mirror: bool,

    /// invert tile colors
    #[arg(long)]
    invert: bool,

    /// darken factor in [0, 1]
    #[arg(long)]
    darken: Option<f32>,

    /// camera device index
    #[arg(long)]
    device: Option<u32>,

    /// use the synthetic camera even if a real one is available
    #[arg(long)]
    synthetic: bool,

    /// write the final frame as PNG (a directory gets a timestamped file)
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// serve Prometheus metrics on this port
    #[cfg(feature = "metrics")]
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("snapshot failed: {0}")]
    Snapshot(#[from] SurfaceError),

    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    #[error("failed to read from stdin: {0}")]
    Io(#[from] io::Error),

    #[error("camera access dismissed: {0}")]
    Dismissed(CaptureError),

    #[cfg(feature = "metrics")]
    #[error(transparent)]
    Metrics(#[from] motion_grid::metrics::MetricsError),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Exiting");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), CliError> {
    info!("Motion Grid v{}", motion_grid::VERSION);

    let config = load_config(args)?;
    let camera = select_camera(args.synthetic);
    let mut renderer = MotionGridRenderer::from_file_config(camera, &config)?;

    acquire_camera(&mut renderer, &mut io::stdin().lock())?;

    let cancel = CancelHandle::new();
    let handler = cancel.clone();
    ctrlc::set_handler(move || handler.cancel())?;

    #[cfg(feature = "metrics")]
    let metrics = match config.output.metrics_port {
        0 => None,
        port => Some(start_metrics_server(port)?),
    };
    #[cfg(not(feature = "metrics"))]
    if config.output.metrics_port != 0 {
        tracing::warn!("Built without the `metrics` feature, ignoring metrics_port");
    }

    let limit = u64::from(config.output.frame_count);
    let log_every = u64::from(config.output.fps);
    let frame_loop = FrameLoop::new(config.output.fps);
    info!(
        cols = config.grid.cols,
        rows = config.grid.rows,
        fps = config.output.fps,
        frames = limit,
        "Rendering (Ctrl-C to stop)"
    );

    frame_loop.run(&cancel, |tick| {
        let outcome = renderer.tick();

        if tick.index % log_every == 0 {
            let stats = renderer.statistics();
            info!(
                tick = tick.index,
                mean_motion = stats.mean_motion,
                peak_elevation = stats.peak_elevation,
                raised = stats.raised_cells,
                "Grid"
            );

            #[cfg(feature = "metrics")]
            if let Some(state) = &metrics {
                let snapshot = motion_grid::metrics::MetricsSnapshot::from_renderer(&renderer);
                state.blocking_read().update(&snapshot);
            }
        }

        let rendered = renderer.counters().frames_rendered;
        if outcome == TickOutcome::Rendered && limit > 0 && rendered >= limit {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    let counters = renderer.counters();
    info!(
        rendered = counters.frames_rendered,
        skipped = counters.ticks_skipped,
        "Done"
    );

    let snapshot = match (&config.output.snapshot, renderer.surface()) {
        (Some(path), Some(surface)) => Some(write_snapshot(surface, path)),
        _ => None,
    };
    renderer.stop();

    if let Some(written) = snapshot {
        let path = written?;
        println!("Snapshot: {}", path.display());
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<FileConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };

    let grid = &mut config.grid;
    if let Some(cols) = args.cols {
        grid.cols = cols;
    }
    if let Some(rows) = args.rows {
        grid.rows = rows;
    }
    if let Some(tint) = args.monochrome {
        grid.color_mode = ColorMode::Monochrome;
        if let Some(color) = tint {
            grid.monochrome_color = color;
        }
    }
    if args.no_mirror {
        grid.mirror = false;
    }
    if args.invert {
        grid.invert_colors = true;
    }
    if let Some(darken) = args.darken {
        grid.darken = darken;
    }

    if let Some(width) = args.width {
        config.display.width = width;
    }
    if let Some(height) = args.height {
        config.display.height = height;
    }
    if let Some(dpr) = args.dpr {
        config.display.device_pixel_ratio = dpr;
    }
    if let Some(device) = args.device {
        config.capture.device_id = device;
    }
    if let Some(frames) = args.frames {
        config.output.frame_count = frames;
    }
    if let Some(fps) = args.fps {
        config.output.fps = fps;
    }
    if let Some(path) = &args.snapshot {
        config.output.snapshot = Some(path.clone());
    }
    #[cfg(feature = "metrics")]
    if let Some(port) = args.metrics_port {
        config.output.metrics_port = port;
    }

    config.validate()?;
    Ok(config)
}

fn select_camera(synthetic: bool) -> Box<dyn Camera> {
    if synthetic {
        info!("Using synthetic camera");
        return Box::new(MockCamera::new());
    }
    native_camera()
}

#[cfg(feature = "camera")]
fn native_camera() -> Box<dyn Camera> {
    Box::new(motion_grid::capture::NativeCamera::new())
}

#[cfg(not(feature = "camera"))]
fn native_camera() -> Box<dyn Camera> {
    tracing::warn!("Built without the `camera` feature, using synthetic camera");
    Box::new(MockCamera::new())
}

/// Requests camera access until it succeeds or the user gives up. End of
/// input counts as giving up.
fn acquire_camera<C: Camera>(
    renderer: &mut MotionGridRenderer<C>,
    input: &mut impl BufRead,
) -> Result<(), CliError> {
    loop {
        let err = match renderer.request_access() {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        eprintln!("Camera access needed: {}", err);
        eprint!("Press Enter to retry, or q to quit: ");
        io::stderr().flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        if read == 0 || line.trim().eq_ignore_ascii_case("q") {
            return Err(CliError::Dismissed(err));
        }
    }
}

fn write_snapshot(surface: &Surface, path: &Path) -> Result<PathBuf, SurfaceError> {
    let path = if path.is_dir() {
        path.join(format!("motion-grid-{}.png", Local::now().format("%Y%m%d-%H%M%S")))
    } else {
        path.to_path_buf()
    };
    surface.save_png(&path)?;
    Ok(path)
}

#[cfg(feature = "metrics")]
fn start_metrics_server(
    port: u16,
) -> Result<std::sync::Arc<tokio::sync::RwLock<motion_grid::metrics::MetricsState>>, CliError> {
    use motion_grid::metrics::{MetricsRegistry, MetricsServer, MetricsServerConfig};

    let server = MetricsServer::new(MetricsServerConfig::with_port(port), MetricsRegistry::new()?);
    let state = server.state();

    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "Failed to start metrics runtime");
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            error!(error = %e, "Metrics server stopped");
        }
    });

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use motion_grid::{capture::CameraError, CaptureConfig, CaptureErrorKind, GridConfig, RendererState};

    fn denied_renderer(failures: usize) -> MotionGridRenderer<MockCamera> {
        let mut camera = MockCamera::new();
        for _ in 0..failures {
            camera.fail_next_open(CameraError::PermissionDenied("blocked".into()));
        }
        MotionGridRenderer::new(
            camera,
            CaptureConfig::with_dimensions(16, 12),
            GridConfig::with_dimensions(4, 3),
        )
        .unwrap()
    }

    #[test]
    fn test_end_of_input_dismisses() {
        let mut renderer = denied_renderer(1);
        let result = acquire_camera(&mut renderer, &mut &b""[..]);

        match result {
            Err(CliError::Dismissed(err)) => assert_eq!(err.kind, CaptureErrorKind::PermissionDenied),
            other => panic!("expected dismissal, got {:?}", other),
        }
        assert!(matches!(renderer.state(), RendererState::Error(_)));
    }

    #[test]
    fn test_quit_dismisses() {
        let mut renderer = denied_renderer(2);
        let result = acquire_camera(&mut renderer, &mut &b"Q\n"[..]);
        assert!(matches!(result, Err(CliError::Dismissed(_))));
        assert_eq!(renderer.counters().capture_errors, 1);
    }

    #[test]
    fn test_enter_retries_until_granted() {
        let mut renderer = denied_renderer(2);
        let result = acquire_camera(&mut renderer, &mut &b"\n\n"[..]);
        assert!(result.is_ok());
        assert_eq!(*renderer.state(), RendererState::Ready);
        assert_eq!(renderer.counters().capture_errors, 2);
    }
}
