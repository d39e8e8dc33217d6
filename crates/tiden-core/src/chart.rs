// File: crates/tiden-core/src/chart.rs
// Summary: TidenChart owns data, scales, hit index and view state; exposes the lifecycle entry points.

use crate::animate::RevealAnimator;
use crate::config::ChartConfig;
use crate::error::SourceError;
use crate::events::{EventRouter, HighlightEvent};
use crate::geometry::{ScreenPoint, ScreenRect};
use crate::highlight::{HighlightController, HighlightState, HighlightView};
use crate::render::Renderer;
use crate::scale::ScaleManager;
use crate::series::{build_series, SeriesSet};
use crate::source::{DataSource, Table};
use crate::surface::{NodeId, PointerKind, Surface};
use crate::types::{Layout, Viewport};
use crate::voronoi::HitIndex;

pub struct TidenChart<S: Surface> {
    config: ChartConfig,
    surface: S,
    layout: Layout,
    scales: ScaleManager,
    data: SeriesSet,
    renderer: Renderer,
    hit: HitIndex,
    router: EventRouter,
    highlight: HighlightController,
}

impl<S: Surface> TidenChart<S> {
    /// Build the static scaffold on `surface`. Nothing is loaded yet.
    pub fn new(mut surface: S, config: ChartConfig) -> Self {
        let animator = RevealAnimator::new(config.animate_line);
        let renderer = Renderer::new(&mut surface, &config.labels.y_axis, animator);
        let highlight = HighlightController::new(config.labels.unit.clone());
        Self {
            layout: Layout::new(config.margin),
            config,
            surface,
            scales: ScaleManager::new(),
            data: SeriesSet::default(),
            renderer,
            hit: HitIndex::empty(),
            router: EventRouter::new(),
            highlight,
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scales(&self) -> &ScaleManager {
        &self.scales
    }

    pub fn series(&self) -> &SeriesSet {
        &self.data
    }

    pub fn hit_index(&self) -> &HitIndex {
        &self.hit
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn router(&self) -> &EventRouter {
        &self.router
    }

    pub fn state(&self) -> &HighlightState {
        self.highlight.state()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// First layout with empty data. Loading completes via `finish_load`.
    pub fn init(&mut self, viewport: Viewport) {
        self.resize(viewport);
        self.redraw();
    }

    /// `init` followed by a synchronous load from `source`.
    pub fn init_with(&mut self, viewport: Viewport, source: &mut dyn DataSource) -> Result<(), SourceError> {
        self.init(viewport);
        self.finish_load(source.load())
    }

    /// Completion of the one-shot data load. A failure leaves the chart empty
    /// and is returned to the caller.
    pub fn finish_load(&mut self, result: Result<Table, SourceError>) -> Result<(), SourceError> {
        let table = result.map_err(|e| {
            tracing::error!(error = %e, location = %self.config.data_location(), "data load failed");
            e
        })?;
        let set = build_series(&table);
        tracing::info!(series = set.len(), points = set.point_count(), "data loaded");
        self.redata(set);
        self.redraw();
        Ok(())
    }

    /// Recompute ranges from the viewport. Does not repaint.
    pub fn resize(&mut self, viewport: Viewport) {
        self.layout.fit(viewport, self.config.size_ratio);
        self.scales.set_ranges(self.layout.width, self.layout.height);
        self.renderer.resize(&mut self.surface, &self.layout);
        tracing::debug!(width = self.layout.width, height = self.layout.height, "resized");
    }

    /// Replace the data and recompute domains. Does not repaint.
    pub fn redata(&mut self, set: SeriesSet) {
        self.release_focus();
        self.scales.set_domains(&set);
        self.data = set;
    }

    /// Repaint axes and lines, rebuild the tessellation and its hit cells.
    pub fn redraw(&mut self) {
        self.hit = HitIndex::build(&self.data, &self.scales, self.clip_box());
        self.renderer.draw(&mut self.surface, &self.data, &self.scales, &self.hit, &mut self.router);
        let mut view = HighlightView {
            surface: &mut self.surface,
            renderer: &self.renderer,
            scales: &self.scales,
            width: self.layout.width,
        };
        self.highlight.refresh(&mut view, &self.data);
    }

    /// Resize notification from the host: relayout and repaint.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        self.resize(viewport);
        self.redraw();
    }

    /// Pointer event delivered by the surface for a listened node.
    pub fn handle_pointer(&mut self, node: NodeId, kind: PointerKind) {
        let Some(event) = self.router.route(node, kind) else { return };
        self.dispatch(event);
    }

    /// Pointer moved to `(x, y)` in surface coordinates (margins included).
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.hit.is_stale(&self.scales) {
            tracing::debug!("hit index stale; rebuilding before lookup");
            self.hit = HitIndex::build(&self.data, &self.scales, self.clip_box());
        }
        let local = ScreenPoint::new(x - self.layout.insets.left, y - self.layout.insets.top);
        match self.hit.locate(local).map(|c| c.point.clone()) {
            Some(p) => self.dispatch(HighlightEvent::Enter(p)),
            None => self.pointer_exit(),
        }
    }

    /// Pointer left the chart.
    pub fn pointer_exit(&mut self) {
        if let Some(p) = self.highlight.focused().cloned() {
            self.dispatch(HighlightEvent::Leave(p));
        }
    }

    fn dispatch(&mut self, event: HighlightEvent) {
        let mut view = HighlightView {
            surface: &mut self.surface,
            renderer: &self.renderer,
            scales: &self.scales,
            width: self.layout.width,
        };
        self.highlight.handle(&mut view, event);
    }

    fn release_focus(&mut self) {
        let mut view = HighlightView {
            surface: &mut self.surface,
            renderer: &self.renderer,
            scales: &self.scales,
            width: self.layout.width,
        };
        self.highlight.release(&mut view);
    }

    /// Plot box padded by the margins.
    fn clip_box(&self) -> ScreenRect {
        let m = self.layout.insets;
        ScreenRect::from_ltrb(-m.left, -m.top, self.layout.width + m.right, self.layout.height + m.bottom)
    }
}
