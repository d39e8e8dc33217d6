// File: crates/tiden-core/src/render.rs
// Summary: Scaffold construction and keyed redraw of axes, series lines and hit cells on a Surface.

use std::collections::{HashMap, HashSet};

use crate::animate::{RevealAnimator, RevealToken};
use crate::axis::{Axis, Orient, TICK_PADDING, TICK_SIZE};
use crate::curve::monotone_path;
use crate::events::EventRouter;
use crate::geometry::ScreenPoint;
use crate::scale::ScaleManager;
use crate::series::{SeriesId, SeriesSet};
use crate::surface::{Attr, ElementKind, NodeId, PathData, Surface};
use crate::types::Layout;
use crate::voronoi::{CellKey, HitIndex};

/// Class names the core assigns; styling backends key off these.
pub mod class {
    pub const AXIS_X: &str = "axis axis--x";
    pub const AXIS_Y: &str = "axis axis--y";
    pub const AXIS_LABEL: &str = "axis-label";
    pub const DOMAIN: &str = "domain";
    pub const TICK: &str = "tick";
    pub const TIDEN: &str = "tiden";
    pub const LINE: &str = "line";
    pub const ACTIVE: &str = "tide--hover";
    pub const GUIDELINE: &str = "guideline";
    pub const FOCUS: &str = "focus";
    pub const SHADOW: &str = "shadow";
    pub const VORONOI: &str = "voronoi";
}

/// Where the focus marker rests while nothing is highlighted.
pub const FOCUS_PARK: (f64, f64) = (-100.0, -100.0);
pub const FOCUS_RADIUS: f64 = 3.5;
/// Focus label offset above the marker.
pub const FOCUS_LABEL_Y: f64 = -30.0;

/// Handles to the long-lived scaffold elements.
#[derive(Clone, Copy, Debug)]
pub struct Layers {
    pub svg: NodeId,
    pub plot: NodeId,
    pub axis_x: NodeId,
    pub axis_y: NodeId,
    pub axis_label: NodeId,
    pub tiden: NodeId,
    pub guideline: NodeId,
    pub focus: NodeId,
    pub focus_circle: NodeId,
    pub focus_shadow: NodeId,
    pub focus_text: NodeId,
    pub voronoi: NodeId,
}

/// Drawing element for one series line, plus its pending reveal.
#[derive(Debug)]
pub struct LineHandle {
    pub node: NodeId,
    reveal: Option<RevealToken>,
}

impl LineHandle {
    pub fn reveal_pending(&self) -> bool {
        self.reveal.is_some()
    }
}

pub struct Renderer {
    layers: Layers,
    lines: HashMap<SeriesId, LineHandle>,
    cells: HashMap<CellKey, NodeId>,
    axis_nodes: Vec<NodeId>,
    animator: RevealAnimator,
}

impl Renderer {
    /// Build the scaffold in its fixed z-order.
    pub fn new<S: Surface + ?Sized>(surface: &mut S, y_label: &str, animator: RevealAnimator) -> Self {
        let svg = surface.root();
        let plot = surface.append(svg, ElementKind::Group, "");

        let axis_x = surface.append(plot, ElementKind::Group, class::AXIS_X);
        let axis_y = surface.append(plot, ElementKind::Group, class::AXIS_Y);
        let axis_label = surface.append(axis_y, ElementKind::Text, class::AXIS_LABEL);
        surface.set(axis_label, Attr::X(4.0));
        surface.set(axis_label, Attr::Dy(0.32));
        surface.set(axis_label, Attr::Text(y_label.to_string()));

        let tiden = surface.append(plot, ElementKind::Group, class::TIDEN);

        let guideline = surface.append(plot, ElementKind::Line, class::GUIDELINE);
        surface.set(guideline, Attr::Display(false));
        surface.set(guideline, Attr::X1(0.0));

        let focus = surface.append(plot, ElementKind::Group, class::FOCUS);
        surface.set(focus, Attr::Translate(FOCUS_PARK.0, FOCUS_PARK.1));
        let focus_circle = surface.append(focus, ElementKind::Circle, "");
        surface.set(focus_circle, Attr::Radius(FOCUS_RADIUS));
        let focus_shadow = surface.append(focus, ElementKind::Text, class::SHADOW);
        surface.set(focus_shadow, Attr::Y(FOCUS_LABEL_Y));
        let focus_text = surface.append(focus, ElementKind::Text, "");
        surface.set(focus_text, Attr::Y(FOCUS_LABEL_Y));

        let voronoi = surface.append(plot, ElementKind::Group, class::VORONOI);

        Self {
            layers: Layers {
                svg,
                plot,
                axis_x,
                axis_y,
                axis_label,
                tiden,
                guideline,
                focus,
                focus_circle,
                focus_shadow,
                focus_text,
                voronoi,
            },
            lines: HashMap::new(),
            cells: HashMap::new(),
            axis_nodes: Vec::new(),
            animator,
        }
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn line(&self, series: &str) -> Option<&LineHandle> {
        self.lines.get(series)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cell_node(&self, key: &CellKey) -> Option<NodeId> {
        self.cells.get(key).copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Apply the current layout to the scaffold.
    pub fn resize<S: Surface + ?Sized>(&mut self, surface: &mut S, layout: &Layout) {
        surface.set(self.layers.svg, Attr::Width(layout.outer_width()));
        surface.set(self.layers.svg, Attr::Height(layout.outer_height()));
        surface.set(self.layers.plot, Attr::Translate(layout.insets.left, layout.insets.top));
        surface.set(self.layers.axis_x, Attr::Translate(0.0, layout.height));
    }

    /// Repaint axes, lines and hit cells against the current scales.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        set: &SeriesSet,
        scales: &ScaleManager,
        hit: &HitIndex,
        router: &mut EventRouter,
    ) {
        self.draw_axes(surface, scales);
        self.draw_lines(surface, set, scales);
        self.draw_cells(surface, hit, router);
    }

    fn draw_axes<S: Surface + ?Sized>(&mut self, surface: &mut S, scales: &ScaleManager) {
        for node in self.axis_nodes.drain(..) {
            surface.remove(node);
        }
        let x = Axis::bottom(scales);
        let y = Axis::left(scales);
        let mut created = draw_axis(surface, self.layers.axis_x, &x);
        created.extend(draw_axis(surface, self.layers.axis_y, &y));
        self.axis_nodes = created;
    }

    fn draw_lines<S: Surface + ?Sized>(&mut self, surface: &mut S, set: &SeriesSet, scales: &ScaleManager) {
        let stale = self.lines.keys().filter(|name| !set.contains(name)).cloned().collect::<Vec<_>>();
        for name in stale {
            if let Some(handle) = self.lines.remove(&name) {
                surface.remove(handle.node);
            }
        }

        for series in &set.series {
            if !self.lines.contains_key(&series.name) {
                let node = surface.append(self.layers.tiden, ElementKind::Path, class::LINE);
                let reveal = self.animator.issue();
                self.lines.insert(series.name.clone(), LineHandle { node, reveal });
            }
            let Some(handle) = self.lines.get_mut(&series.name) else { continue };
            let pts = series.points.iter().filter_map(|p| scales.project(p)).collect::<Vec<ScreenPoint>>();
            surface.set(handle.node, Attr::Path(monotone_path(&pts)));
            if !self.animator.reveal(surface, handle.node, &mut handle.reveal) {
                self.animator.refit(surface, handle.node);
            }
        }
    }

    fn draw_cells<S: Surface + ?Sized>(&mut self, surface: &mut S, hit: &HitIndex, router: &mut EventRouter) {
        let live = hit.cells().iter().map(|c| &c.key).collect::<HashSet<_>>();
        self.cells.retain(|key, node| {
            if live.contains(key) {
                return true;
            }
            router.unsubscribe(surface, *node);
            surface.remove(*node);
            false
        });

        for cell in hit.cells() {
            let node = match self.cells.get(&cell.key) {
                Some(node) => *node,
                None => {
                    let node = surface.append(self.layers.voronoi, ElementKind::Path, "");
                    self.cells.insert(cell.key.clone(), node);
                    node
                }
            };
            surface.set(node, Attr::Path(cell.path()));
            router.subscribe(surface, node, cell.point.clone());
        }
    }
}

/// Domain line plus one tick group per tick. Returns the created nodes.
fn draw_axis<S: Surface + ?Sized>(surface: &mut S, group: NodeId, axis: &Axis) -> Vec<NodeId> {
    let mut created = Vec::with_capacity(axis.ticks.len() + 1);
    let out = axis.orient.outward() * TICK_SIZE;
    let (r0, r1) = axis.range;

    let domain = surface.append(group, ElementKind::Path, class::DOMAIN);
    let mut d = PathData::new();
    match axis.orient {
        Orient::Bottom => {
            d.move_to(ScreenPoint::new(r0, out));
            d.line_to(ScreenPoint::new(r0, 0.0));
            d.line_to(ScreenPoint::new(r1, 0.0));
            d.line_to(ScreenPoint::new(r1, out));
        }
        Orient::Left => {
            d.move_to(ScreenPoint::new(out, r0));
            d.line_to(ScreenPoint::new(0.0, r0));
            d.line_to(ScreenPoint::new(0.0, r1));
            d.line_to(ScreenPoint::new(out, r1));
        }
    }
    surface.set(domain, Attr::Path(d));
    created.push(domain);

    let label_offset = axis.orient.outward() * (TICK_SIZE + TICK_PADDING);
    for tick in &axis.ticks {
        let g = surface.append(group, ElementKind::Group, class::TICK);
        let line = surface.append(g, ElementKind::Line, "");
        let text = surface.append(g, ElementKind::Text, "");
        surface.set(line, Attr::X1(0.0));
        surface.set(line, Attr::Y1(0.0));
        match axis.orient {
            Orient::Bottom => {
                surface.set(g, Attr::Translate(tick.pos, 0.0));
                surface.set(line, Attr::X2(0.0));
                surface.set(line, Attr::Y2(out));
                surface.set(text, Attr::Y(label_offset));
                surface.set(text, Attr::Dy(0.71));
            }
            Orient::Left => {
                surface.set(g, Attr::Translate(0.0, tick.pos));
                surface.set(line, Attr::X2(out));
                surface.set(line, Attr::Y2(0.0));
                surface.set(text, Attr::X(label_offset));
                surface.set(text, Attr::Dy(0.32));
            }
        }
        surface.set(text, Attr::Text(tick.label.clone()));
        created.push(g);
    }
    created
}
