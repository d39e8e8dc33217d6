// File: crates/demo/src/main.rs
// Summary: Demo loads a tide CSV into a chart, optionally hovers a point, and renders the scene to PNG.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tiden_core::{ChartConfig, CsvSource, HighlightState, TidenChart, Viewport};
use tiden_render_skia::{scene_surface, theme, RasterOptions, Rasterizer};
use tracing_subscriber::{fmt, EnvFilter};

/// Render a tide chart to PNG.
#[derive(Parser, Debug)]
#[command(name = "tiden-demo")]
#[command(about = "Render an interactive tide chart scene to PNG")]
struct Args {
    /// Chart config (JSON/TOML/YAML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV data; overrides the config's baseurl + data
    data: Option<PathBuf>,

    /// Container width in pixels
    #[arg(long, default_value_t = 960.0)]
    width: f64,

    /// Window height in pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Simulate the pointer at X Y (surface coordinates)
    #[arg(long, num_args = 2, value_names = ["X", "Y"])]
    hover: Option<Vec<f64>>,

    /// Palette name (light, dark)
    #[arg(long, default_value = "light")]
    theme: String,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Outline the hit cells
    #[arg(long)]
    show_cells: bool,

    /// Capture mid-reveal after this many milliseconds instead of the settled frame
    #[arg(long)]
    reveal_ms: Option<u64>,

    /// Output PNG
    #[arg(short, long, default_value = "target/out/tiden.png")]
    out: PathBuf,
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChartConfig::from_file(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => ChartConfig::default(),
    };
    let data = args.data.clone().unwrap_or_else(|| PathBuf::from(config.data_location()));
    tracing::info!(data = %data.display(), "loading");

    let mut chart = TidenChart::new(scene_surface(), config);
    let mut source = CsvSource::from_path(&data);
    chart
        .init_with(Viewport::new(args.width, args.height), &mut source)
        .with_context(|| format!("failed to load CSV '{}'", data.display()))?;

    if chart.series().is_empty() {
        tracing::warn!("no series found; check the header row");
    }

    match args.reveal_ms {
        Some(ms) => chart.surface_mut().advance(Duration::from_millis(ms)),
        None => chart.surface_mut().advance(tiden_core::animate::REVEAL_DURATION),
    }

    if let Some(&[x, y]) = args.hover.as_deref() {
        chart.pointer_move(x, y);
        match chart.state() {
            HighlightState::Focused(p) => tracing::info!(series = %p.series, date = %p.date, value = p.value, "hovering"),
            HighlightState::Idle => tracing::info!(x, y, "pointer is outside every cell"),
        }
    }

    let opts = RasterOptions { theme: theme::find(&args.theme), scale: args.scale, show_cells: args.show_cells };
    Rasterizer::new().render_png(chart.surface(), &opts, &args.out)?;
    println!("Wrote {}", args.out.display());
    Ok(())
}
