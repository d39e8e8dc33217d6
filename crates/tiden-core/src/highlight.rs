// File: crates/tiden-core/src/highlight.rs
// Summary: Idle/Focused state machine driving focus label, active-line styling and the guideline.

use chrono::Datelike;

use crate::events::HighlightEvent;
use crate::render::{class, Renderer, FOCUS_PARK};
use crate::scale::ScaleManager;
use crate::series::{Point, SeriesSet};
use crate::surface::{Attr, Surface};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum HighlightState {
    #[default]
    Idle,
    Focused(Point),
}

/// Rounds half up, like JavaScript's `Math.round`.
pub fn round_half_up(v: f64) -> f64 {
    // `v + 0.5` can itself round up, e.g. for 0.49999999999999994.
    let f = v.floor();
    if v - f >= 0.5 { f + 1.0 } else { f }
}

/// `"<series> (<year>, <rounded value> <unit>)"`
pub fn label_text(p: &Point, unit: &str) -> String {
    format!("{} ({}, {} {})", p.series, p.date.year(), round_half_up(p.value) as i64, unit)
}

/// Horizontal shift keeping a label of `text_width` inside `[0, width]`
/// when anchored at `px`.
pub fn label_offset(px: f64, width: f64, text_width: f64) -> f64 {
    px.min(width - text_width).max(0.0) - px
}

/// Everything the controller needs to mutate the view.
pub struct HighlightView<'a, S: Surface + ?Sized> {
    pub surface: &'a mut S,
    pub renderer: &'a Renderer,
    pub scales: &'a ScaleManager,
    /// Plot width.
    pub width: f64,
}

#[derive(Debug)]
pub struct HighlightController {
    state: HighlightState,
    unit: String,
}

impl HighlightController {
    pub fn new(unit: impl Into<String>) -> Self {
        Self { state: HighlightState::Idle, unit: unit.into() }
    }

    pub fn state(&self) -> &HighlightState {
        &self.state
    }

    pub fn focused(&self) -> Option<&Point> {
        match &self.state {
            HighlightState::Focused(p) => Some(p),
            HighlightState::Idle => None,
        }
    }

    pub fn handle<S: Surface + ?Sized>(&mut self, view: &mut HighlightView<'_, S>, event: HighlightEvent) {
        match event {
            HighlightEvent::Enter(p) => self.enter(view, p),
            HighlightEvent::Leave(p) => self.leave(view, &p),
        }
    }

    /// Focus `p`. Re-entering the focused point is a no-op; entering another
    /// point releases the current one first.
    pub fn enter<S: Surface + ?Sized>(&mut self, view: &mut HighlightView<'_, S>, p: Point) {
        if let HighlightState::Focused(current) = &self.state {
            if *current == p {
                return;
            }
            let current = current.clone();
            self.leave(view, &current);
        }
        if view.scales.project(&p).is_none() {
            return;
        }
        if let Some(line) = view.renderer.line(&p.series) {
            view.surface.set_class(line.node, class::ACTIVE, true);
            view.surface.raise(line.node);
        }
        place_focus(view, &p, &self.unit);
        tracing::trace!(series = %p.series, date = %p.date, "focus");
        self.state = HighlightState::Focused(p);
    }

    /// Release `p` if it is the focused point; stale leaves are ignored.
    pub fn leave<S: Surface + ?Sized>(&mut self, view: &mut HighlightView<'_, S>, p: &Point) {
        match &self.state {
            HighlightState::Focused(current) if current == p => {}
            _ => return,
        }
        self.release(view);
    }

    /// Unconditionally return to idle.
    pub fn release<S: Surface + ?Sized>(&mut self, view: &mut HighlightView<'_, S>) {
        let HighlightState::Focused(p) = std::mem::take(&mut self.state) else { return };
        if let Some(line) = view.renderer.line(&p.series) {
            view.surface.set_class(line.node, class::ACTIVE, false);
        }
        let layers = view.renderer.layers();
        view.surface.set(layers.focus, Attr::Translate(FOCUS_PARK.0, FOCUS_PARK.1));
        view.surface.set(layers.guideline, Attr::Display(false));
    }

    /// Re-place the focus after a relayout; drops to idle when the point is gone.
    pub fn refresh<S: Surface + ?Sized>(&mut self, view: &mut HighlightView<'_, S>, set: &SeriesSet) {
        let Some(p) = self.focused().cloned() else { return };
        if !set.contains_point(&p) || view.scales.project(&p).is_none() {
            self.release(view);
            return;
        }
        if let Some(line) = view.renderer.line(&p.series) {
            view.surface.set_class(line.node, class::ACTIVE, true);
        }
        place_focus(view, &p, &self.unit);
    }
}

fn place_focus<S: Surface + ?Sized>(view: &mut HighlightView<'_, S>, p: &Point, unit: &str) {
    let Some(at) = view.scales.project(p) else { return };
    let layers = *view.renderer.layers();
    let surface = &mut *view.surface;

    surface.set(layers.focus, Attr::Translate(at.x, at.y));
    let text = label_text(p, unit);
    surface.set(layers.focus_shadow, Attr::Text(text.clone()));
    surface.set(layers.focus_text, Attr::Text(text));
    let offset = label_offset(at.x, view.width, surface.text_width(layers.focus_text));
    surface.set(layers.focus_shadow, Attr::X(offset));
    surface.set(layers.focus_text, Attr::X(offset));

    surface.set(layers.guideline, Attr::Y1(at.y));
    surface.set(layers.guideline, Attr::X2(view.width));
    surface.set(layers.guideline, Attr::Y2(at.y));
    surface.set(layers.guideline, Attr::Display(true));
}
