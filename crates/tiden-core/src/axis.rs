// File: crates/tiden-core/src/axis.rs
// Summary: Axis model: orientation, tick positions and labels derived from the current scales.

use crate::scale::{ScaleManager, DEFAULT_TICKS};

/// Tick mark length in pixels.
pub const TICK_SIZE: f64 = 6.0;
/// Gap between tick mark and label in pixels.
pub const TICK_PADDING: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orient {
    Bottom,
    Left,
}

impl Orient {
    /// Sign that points ticks away from the plot.
    pub fn outward(&self) -> f64 {
        match self {
            Orient::Bottom => 1.0,
            Orient::Left => -1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tick {
    /// Pixel position along the axis.
    pub pos: f64,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub orient: Orient,
    pub ticks: Vec<Tick>,
    /// Pixel extent of the axis line.
    pub range: (f64, f64),
}

impl Axis {
    /// Bottom time axis; empty when the x domain is undefined.
    pub fn bottom(scales: &ScaleManager) -> Self {
        let ticks = scales
            .x
            .ticks(DEFAULT_TICKS)
            .into_iter()
            .filter_map(|(d, label)| scales.x.map(d).map(|pos| Tick { pos, label }))
            .collect();
        Self { orient: Orient::Bottom, ticks, range: scales.x.range() }
    }

    /// Left value axis; empty when the y domain is undefined.
    pub fn left(scales: &ScaleManager) -> Self {
        let fmt = scales.y.tick_format(DEFAULT_TICKS);
        let ticks = scales
            .y
            .ticks(DEFAULT_TICKS)
            .into_iter()
            .filter_map(|v| scales.y.map(v).map(|pos| Tick { pos, label: fmt(v) }))
            .collect();
        Self { orient: Orient::Left, ticks, range: scales.y.range() }
    }
}
