// File: crates/tiden-render-skia/tests/smoke.rs
// Purpose: Rasterize a laid-out chart and verify the PNG decodes at the expected size.

use tiden_core::{ChartConfig, SceneSurface, Table, TidenChart, Viewport};
use tiden_render_skia::{scene_surface, RasterOptions, Rasterizer, Theme};

fn chart_with(surface: SceneSurface) -> TidenChart<SceneSurface> {
    let cfg = ChartConfig { animate_line: true, ..ChartConfig::default() };
    let mut chart = TidenChart::new(surface, cfg);
    chart.init(Viewport::new(640.0, 400.0));
    let table = Table::new(["name", "1990-01-01", "1995-01-01", "2000-01-01", "2005-01-01"])
        .with_row(["Hamburg", "498", "510", "505", "512"])
        .with_row(["Cuxhaven", "402", "405", "399", "410"]);
    chart.finish_load(Ok(table)).expect("in-memory table loads");
    chart
}

#[test]
fn renders_png_of_outer_size() -> anyhow::Result<()> {
    let mut chart = chart_with(scene_surface());
    let m = chart.layout().insets;
    chart.pointer_move(m.left + 10.0, m.top + 10.0);

    let bytes = Rasterizer::new().render_png_bytes(chart.surface(), &RasterOptions::default())?;
    let img = image::load_from_memory(&bytes)?;
    assert_eq!((img.width(), img.height()), (640, 400));
    Ok(())
}

#[test]
fn device_scale_and_dark_theme() -> anyhow::Result<()> {
    let chart = chart_with(SceneSurface::new());
    let opts = RasterOptions { theme: tiden_render_skia::theme::find("dark"), scale: 2.0, show_cells: true };
    let bytes = Rasterizer::new().render_png_bytes(chart.surface(), &opts)?;
    let img = image::load_from_memory(&bytes)?.to_rgba8();
    assert_eq!(img.dimensions(), (1280, 800));
    // Corner pixel is background.
    let bg = Theme::dark().background;
    let px = img.get_pixel(0, 0);
    assert_eq!((px[0], px[1], px[2]), (bg.r(), bg.g(), bg.b()));
    Ok(())
}

#[test]
fn unsized_scene_is_an_error() {
    let chart = TidenChart::new(SceneSurface::new(), ChartConfig::default());
    assert!(Rasterizer::new().render_png_bytes(chart.surface(), &RasterOptions::default()).is_err());
}

#[test]
fn writes_png_file() -> anyhow::Result<()> {
    let chart = chart_with(SceneSurface::new());
    let path = std::env::temp_dir().join(format!("tiden-smoke-{}", std::process::id())).join("chart.png");
    Rasterizer::new().render_png(chart.surface(), &RasterOptions::default(), &path)?;
    let img = image::open(&path)?;
    assert_eq!(img.width(), 640);
    std::fs::remove_dir_all(path.parent().unwrap()).ok();
    Ok(())
}

#[test]
fn theme_lookup_falls_back_to_light() {
    assert_eq!(tiden_render_skia::theme::find("DARK").name, "dark");
    assert_eq!(tiden_render_skia::theme::find("sepia").name, "light");
}
