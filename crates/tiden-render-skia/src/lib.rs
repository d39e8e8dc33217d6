// File: crates/tiden-render-skia/src/lib.rs
// Summary: Skia backend for tiden charts: font-backed text measurement and PNG rasterization.

pub mod raster;
pub mod text;
pub mod theme;

pub use raster::{RasterOptions, Rasterizer};
pub use text::{Anchor, SkiaTextMeasure, TextShaper};
pub use theme::Theme;

use tiden_core::SceneSurface;

/// Scene surface whose label widths come from Skia font metrics.
pub fn scene_surface() -> SceneSurface {
    SceneSurface::with_measure(Box::new(SkiaTextMeasure::new()))
}
