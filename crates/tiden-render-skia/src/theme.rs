// File: crates/tiden-render-skia/src/theme.rs
// Summary: Light/Dark palettes for the tide chart raster.

use skia_safe as skia;

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub axis_line: skia::Color,
    pub axis_label: skia::Color,
    pub tick: skia::Color,
    pub line: skia::Color,
    pub line_active: skia::Color,
    pub guideline: skia::Color,
    pub focus: skia::Color,
    pub focus_label: skia::Color,
    /// Halo painted behind the focus label.
    pub shadow: skia::Color,
    /// Outline for hit cells when they are made visible.
    pub cell_debug: skia::Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 255, 255, 255),
            axis_line: skia::Color::from_argb(255, 0, 0, 0),
            axis_label: skia::Color::from_argb(255, 20, 20, 30),
            tick: skia::Color::from_argb(255, 60, 60, 70),
            line: skia::Color::from_argb(255, 204, 204, 210),
            line_active: skia::Color::from_argb(255, 0, 90, 160),
            guideline: skia::Color::from_argb(255, 150, 150, 160),
            focus: skia::Color::from_argb(255, 0, 90, 160),
            focus_label: skia::Color::from_argb(255, 20, 20, 30),
            shadow: skia::Color::from_argb(230, 255, 255, 255),
            cell_debug: skia::Color::from_argb(90, 220, 80, 80),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            axis_label: skia::Color::from_argb(255, 235, 235, 245),
            tick: skia::Color::from_argb(255, 150, 150, 160),
            line: skia::Color::from_argb(255, 70, 70, 80),
            line_active: skia::Color::from_argb(255, 64, 160, 255),
            guideline: skia::Color::from_argb(255, 110, 110, 120),
            focus: skia::Color::from_argb(255, 255, 230, 70),
            focus_label: skia::Color::from_argb(255, 235, 235, 245),
            shadow: skia::Color::from_argb(230, 18, 18, 20),
            cell_debug: skia::Color::from_argb(90, 220, 80, 80),
        }
    }
}

/// Built-in palettes.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets().into_iter().find(|t| t.name.eq_ignore_ascii_case(name)).unwrap_or_else(Theme::light)
}
