// File: crates/tiden-core/src/lib.rs
// Summary: Core library entry point; exports the tide chart pipeline (series, scales, hit index, renderer, highlight).

pub mod animate;
pub mod axis;
pub mod chart;
pub mod config;
pub mod curve;
pub mod error;
pub mod events;
pub mod geometry;
pub mod highlight;
pub mod render;
pub mod scale;
pub mod series;
pub mod source;
pub mod surface;
pub mod types;
pub mod voronoi;

pub use chart::TidenChart;
pub use config::{ChartConfig, Labels};
pub use error::{ConfigError, SourceError};
pub use events::{EventRouter, HighlightEvent, Subscription};
pub use geometry::{ScreenPoint, ScreenRect};
pub use highlight::{HighlightController, HighlightState};
pub use render::Renderer;
pub use scale::{LinearScale, ScaleManager, TimeScale};
pub use series::{build_series, Point, Series, SeriesId, SeriesSet};
pub use source::{CsvSource, DataSource, Row, Table};
pub use surface::{Attr, AttrKey, ElementKind, NodeId, PointerKind, SceneSurface, Surface, TextMeasure};
pub use types::{Insets, Layout, Viewport};
pub use voronoi::{Cell, CellKey, HitIndex};
