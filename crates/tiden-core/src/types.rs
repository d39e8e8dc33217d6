// File: crates/tiden-core/src/types.rs
// Summary: Shared layout types and constants (margins, viewport, plot layout).

use serde::Deserialize;

/// Default height-to-width ratio used for responsive sizing.
pub const DEFAULT_SIZE_RATIO: f64 = 1.66;

/// Screen margins reserved around the plot for axes, in pixels.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    /// Create new insets; negative inputs are clamped to zero.
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top: top.max(0.0), right: right.max(0.0), bottom: bottom.max(0.0), left: left.max(0.0) }
    }
    /// Total horizontal inset (left + right).
    pub fn hsum(&self) -> f64 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub fn vsum(&self) -> f64 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(20.0, 40.0, 30.0, 40.0)
    }
}

/// Host-supplied sizing: the container's width and the window's inner height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub container_width: f64,
    pub window_height: f64,
}

impl Viewport {
    pub const fn new(container_width: f64, window_height: f64) -> Self {
        Self { container_width, window_height }
    }
}

/// Per-instance mutable layout: margins plus the current drawable extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub insets: Insets,
    /// Plot width (inside the margins).
    pub width: f64,
    /// Plot height (inside the margins).
    pub height: f64,
}

impl Layout {
    pub fn new(insets: Insets) -> Self {
        Self { insets, width: 0.0, height: 0.0 }
    }

    /// Recompute plot extents from the viewport. Height follows the size ratio
    /// but never exceeds the window height.
    pub fn fit(&mut self, viewport: Viewport, size_ratio: f64) {
        let w = viewport.container_width.max(0.0);
        let h = (w * size_ratio).min(viewport.window_height.max(0.0));
        self.width = (w - self.insets.hsum()).max(0.0);
        self.height = (h - self.insets.vsum()).max(0.0);
    }

    /// Full surface width including margins.
    pub fn outer_width(&self) -> f64 { self.width + self.insets.hsum() }
    /// Full surface height including margins.
    pub fn outer_height(&self) -> f64 { self.height + self.insets.vsum() }
}
