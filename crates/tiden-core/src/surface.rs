// File: crates/tiden-core/src/surface.rs
// Summary: Abstract drawing surface (append/attributes/classes/events/transitions) and an in-memory scene implementation.
// Notes:
// - The core only talks to `Surface`; any retained 2D vector backend that can
//   satisfy it is interchangeable. `SceneSurface` is the reference
//   implementation and is what the Skia backend rasterizes.

use std::fmt::Write as _;
use std::time::Duration;

use crate::geometry::ScreenPoint;

/// Handle to an element on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Svg,
    Group,
    Path,
    Circle,
    Line,
    Text,
}

/// Path segment in plot-local pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    MoveTo(ScreenPoint),
    LineTo(ScreenPoint),
    CubicTo(ScreenPoint, ScreenPoint, ScreenPoint),
    Close,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    pub segs: Vec<PathSeg>,
}

impl PathData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    pub fn move_to(&mut self, p: ScreenPoint) {
        self.segs.push(PathSeg::MoveTo(p));
    }

    pub fn line_to(&mut self, p: ScreenPoint) {
        self.segs.push(PathSeg::LineTo(p));
    }

    pub fn cubic_to(&mut self, c1: ScreenPoint, c2: ScreenPoint, p: ScreenPoint) {
        self.segs.push(PathSeg::CubicTo(c1, c2, p));
    }

    pub fn close(&mut self) {
        self.segs.push(PathSeg::Close);
    }

    /// Closed polygon path (`M..L..Z`).
    pub fn polygon(points: &[ScreenPoint]) -> Self {
        let mut d = Self::new();
        let mut it = points.iter();
        if let Some(&first) = it.next() {
            d.move_to(first);
            for &p in it {
                d.line_to(p);
            }
            d.close();
        }
        d
    }

    /// Arc length; cubics are flattened.
    pub fn length(&self) -> f64 {
        const STEPS: usize = 16;
        let mut len = 0.0;
        let mut start = None;
        let mut cur: Option<ScreenPoint> = None;
        for seg in &self.segs {
            match *seg {
                PathSeg::MoveTo(p) => {
                    start = Some(p);
                    cur = Some(p);
                }
                PathSeg::LineTo(p) => {
                    if let Some(c) = cur {
                        len += c.distance_sq(p).sqrt();
                    }
                    cur = Some(p);
                }
                PathSeg::CubicTo(c1, c2, p) => {
                    if let Some(p0) = cur {
                        let mut prev = p0;
                        for i in 1..=STEPS {
                            let t = i as f64 / STEPS as f64;
                            let q = cubic_point(p0, c1, c2, p, t);
                            len += prev.distance_sq(q).sqrt();
                            prev = q;
                        }
                    }
                    cur = Some(p);
                }
                PathSeg::Close => {
                    if let (Some(c), Some(s)) = (cur, start) {
                        len += c.distance_sq(s).sqrt();
                    }
                    cur = start;
                }
            }
        }
        len
    }

    /// SVG path syntax.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for seg in &self.segs {
            let _ = match *seg {
                PathSeg::MoveTo(p) => write!(out, "M{},{}", p.x, p.y),
                PathSeg::LineTo(p) => write!(out, "L{},{}", p.x, p.y),
                PathSeg::CubicTo(a, b, p) => write!(out, "C{},{},{},{},{},{}", a.x, a.y, b.x, b.y, p.x, p.y),
                PathSeg::Close => write!(out, "Z"),
            };
        }
        out
    }
}

pub(crate) fn cubic_point(p0: ScreenPoint, c1: ScreenPoint, c2: ScreenPoint, p1: ScreenPoint, t: f64) -> ScreenPoint {
    let u = 1.0 - t;
    let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
    ScreenPoint::new(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

/// Element attributes. Setting an attribute replaces the previous value of the same key.
#[derive(Clone, Debug, PartialEq)]
pub enum Attr {
    Width(f64),
    Height(f64),
    Translate(f64, f64),
    Path(PathData),
    Radius(f64),
    X(f64),
    Y(f64),
    /// Vertical text offset in em.
    Dy(f64),
    X1(f64),
    Y1(f64),
    X2(f64),
    Y2(f64),
    Text(String),
    Display(bool),
    StrokeDashArray(f64, f64),
    StrokeDashOffset(f64),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrKey {
    Width,
    Height,
    Translate,
    Path,
    Radius,
    X,
    Y,
    Dy,
    X1,
    Y1,
    X2,
    Y2,
    Text,
    Display,
    StrokeDashArray,
    StrokeDashOffset,
}

impl Attr {
    pub fn key(&self) -> AttrKey {
        match self {
            Attr::Width(_) => AttrKey::Width,
            Attr::Height(_) => AttrKey::Height,
            Attr::Translate(..) => AttrKey::Translate,
            Attr::Path(_) => AttrKey::Path,
            Attr::Radius(_) => AttrKey::Radius,
            Attr::X(_) => AttrKey::X,
            Attr::Y(_) => AttrKey::Y,
            Attr::Dy(_) => AttrKey::Dy,
            Attr::X1(_) => AttrKey::X1,
            Attr::Y1(_) => AttrKey::Y1,
            Attr::X2(_) => AttrKey::X2,
            Attr::Y2(_) => AttrKey::Y2,
            Attr::Text(_) => AttrKey::Text,
            Attr::Display(_) => AttrKey::Display,
            Attr::StrokeDashArray(..) => AttrKey::StrokeDashArray,
            Attr::StrokeDashOffset(_) => AttrKey::StrokeDashOffset,
        }
    }

    /// Numeric interpolation between two values of the same key.
    pub fn lerp(&self, to: &Attr, t: f64) -> Option<Attr> {
        let f = |a: f64, b: f64| a + (b - a) * t;
        Some(match (self, to) {
            (Attr::StrokeDashOffset(a), Attr::StrokeDashOffset(b)) => Attr::StrokeDashOffset(f(*a, *b)),
            (Attr::X(a), Attr::X(b)) => Attr::X(f(*a, *b)),
            (Attr::Y(a), Attr::Y(b)) => Attr::Y(f(*a, *b)),
            (Attr::Radius(a), Attr::Radius(b)) => Attr::Radius(f(*a, *b)),
            (Attr::Translate(ax, ay), Attr::Translate(bx, by)) => Attr::Translate(f(*ax, *bx), f(*ay, *by)),
            _ => return None,
        })
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Attr::Width(v)
            | Attr::Height(v)
            | Attr::Radius(v)
            | Attr::X(v)
            | Attr::Y(v)
            | Attr::Dy(v)
            | Attr::X1(v)
            | Attr::Y1(v)
            | Attr::X2(v)
            | Attr::Y2(v)
            | Attr::StrokeDashOffset(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    PointerEnter,
    PointerLeave,
    TouchStart,
    TouchEnd,
}

impl PointerKind {
    pub const ALL: [PointerKind; 4] =
        [PointerKind::PointerEnter, PointerKind::PointerLeave, PointerKind::TouchStart, PointerKind::TouchEnd];

    /// Enter-like events focus; leave-like events release.
    pub fn is_enter(&self) -> bool {
        matches!(self, PointerKind::PointerEnter | PointerKind::TouchStart)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ease {
    Linear,
}

impl Ease {
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
        }
    }
}

/// Timed transition of one attribute from its current value to `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub target: Attr,
    pub duration: Duration,
    pub ease: Ease,
}

/// Text measurement hook; backends provide real font metrics.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Rough average-advance estimate used when no font backend is available.
#[derive(Clone, Copy, Debug)]
pub struct ApproxTextMeasure {
    pub advance: f64,
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.advance
    }
}

/// Drawing-surface contract consumed by the renderer and highlight controller.
pub trait Surface {
    fn root(&self) -> NodeId;
    /// Append a child element carrying the given class list (space separated).
    fn append(&mut self, parent: NodeId, kind: ElementKind, class: &str) -> NodeId;
    /// Remove a node and its subtree.
    fn remove(&mut self, node: NodeId);
    fn set(&mut self, node: NodeId, attr: Attr);
    /// Drop an attribute so the element falls back to its default.
    fn unset(&mut self, node: NodeId, key: AttrKey);
    fn get(&self, node: NodeId, key: AttrKey) -> Option<Attr>;
    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool);
    fn has_class(&self, node: NodeId, class: &str) -> bool;
    /// Move a node to the end of its parent's children (draws on top).
    fn raise(&mut self, node: NodeId);
    /// Rendered width of a text node's content.
    fn text_width(&self, node: NodeId) -> f64;
    fn listen(&mut self, node: NodeId, events: &[PointerKind]);
    fn unlisten(&mut self, node: NodeId);
    fn transition(&mut self, node: NodeId, transition: Transition);

    /// Total drawn length of a path node.
    fn path_length(&self, node: NodeId) -> f64 {
        match self.get(node, AttrKey::Path) {
            Some(Attr::Path(d)) => d.length(),
            _ => 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: ElementKind,
    pub classes: Vec<String>,
    pub attrs: Vec<Attr>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub listeners: Vec<PointerKind>,
}

impl Node {
    fn new(kind: ElementKind, class: &str, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            classes: class.split_whitespace().map(str::to_string).collect(),
            attrs: Vec::new(),
            children: Vec::new(),
            parent,
            listeners: Vec::new(),
        }
    }

    pub fn attr(&self, key: AttrKey) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.key() == key)
    }

    pub fn num(&self, key: AttrKey) -> Option<f64> {
        self.attr(key).and_then(Attr::as_f64)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Hidden via `display: none`.
    pub fn is_hidden(&self) -> bool {
        matches!(self.attr(AttrKey::Display), Some(Attr::Display(false)))
    }

    pub fn translate(&self) -> (f64, f64) {
        match self.attr(AttrKey::Translate) {
            Some(Attr::Translate(x, y)) => (*x, *y),
            _ => (0.0, 0.0),
        }
    }
}

#[derive(Clone, Debug)]
struct Active {
    node: NodeId,
    from: Attr,
    transition: Transition,
    elapsed: Duration,
}

/// Font size assumed for text measurement, in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 10.0;

/// Retained in-memory scene graph. Removed nodes leave a tombstone so ids stay unique.
pub struct SceneSurface {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    transitions: Vec<Active>,
    measure: Box<dyn TextMeasure>,
    font_size: f64,
}

impl Default for SceneSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneSurface {
    pub fn new() -> Self {
        Self::with_measure(Box::new(ApproxTextMeasure::default()))
    }

    pub fn with_measure(measure: Box<dyn TextMeasure>) -> Self {
        Self {
            nodes: vec![Some(Node::new(ElementKind::Svg, "", None))],
            root: NodeId(0),
            transitions: Vec::new(),
            measure,
            font_size: DEFAULT_FONT_SIZE,
        }
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Number of live nodes (including the root).
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Live nodes carrying `class`, in creation order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().filter(|n| n.has_class(class)).map(|_| NodeId(i)))
            .collect()
    }

    pub fn is_animating(&self) -> bool {
        !self.transitions.is_empty()
    }

    /// Progress running transitions by `dt`; finished ones land on their target.
    pub fn advance(&mut self, dt: Duration) {
        let mut updates = Vec::with_capacity(self.transitions.len());
        self.transitions.retain_mut(|a| {
            a.elapsed += dt;
            let total = a.transition.duration.as_secs_f64();
            let t = if total <= 0.0 { 1.0 } else { (a.elapsed.as_secs_f64() / total).min(1.0) };
            let eased = a.transition.ease.apply(t);
            let value = a.from.lerp(&a.transition.target, eased).unwrap_or_else(|| a.transition.target.clone());
            updates.push((a.node, value));
            t < 1.0
        });
        for (node, value) in updates {
            if let Some(n) = self.node_mut(node) {
                set_attr(n, value);
            }
        }
    }

    fn detach(&mut self, node: NodeId) {
        let parent = self.node(node).and_then(|n| n.parent);
        if let Some(p) = parent.and_then(|p| self.node_mut(p)) {
            p.children.retain(|c| *c != node);
        }
    }
}

fn set_attr(node: &mut Node, attr: Attr) {
    let key = attr.key();
    match node.attrs.iter_mut().find(|a| a.key() == key) {
        Some(slot) => *slot = attr,
        None => node.attrs.push(attr),
    }
}

impl Surface for SceneSurface {
    fn root(&self) -> NodeId {
        self.root
    }

    fn append(&mut self, parent: NodeId, kind: ElementKind, class: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(kind, class, Some(parent))));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    fn remove(&mut self, node: NodeId) {
        if node == self.root {
            return;
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.get_mut(id.0).and_then(Option::take) {
                stack.extend(n.children);
            }
        }
        self.transitions.retain(|a| self.nodes.get(a.node.0).map_or(false, Option::is_some));
    }

    fn set(&mut self, node: NodeId, attr: Attr) {
        // An explicit set wins over a running transition on the same attribute.
        let key = attr.key();
        self.transitions.retain(|a| !(a.node == node && a.transition.target.key() == key));
        if let Some(n) = self.node_mut(node) {
            set_attr(n, attr);
        }
    }

    fn unset(&mut self, node: NodeId, key: AttrKey) {
        self.transitions.retain(|a| !(a.node == node && a.transition.target.key() == key));
        if let Some(n) = self.node_mut(node) {
            n.attrs.retain(|a| a.key() != key);
        }
    }

    fn get(&self, node: NodeId, key: AttrKey) -> Option<Attr> {
        self.node(node).and_then(|n| n.attr(key)).cloned()
    }

    fn set_class(&mut self, node: NodeId, class: &str, enabled: bool) {
        let Some(n) = self.node_mut(node) else { return };
        let present = n.has_class(class);
        if enabled && !present {
            n.classes.push(class.to_string());
        } else if !enabled && present {
            n.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node).map_or(false, |n| n.has_class(class))
    }

    fn raise(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else { return };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|c| *c != node);
            p.children.push(node);
        }
    }

    fn text_width(&self, node: NodeId) -> f64 {
        match self.get(node, AttrKey::Text) {
            Some(Attr::Text(s)) => self.measure.text_width(&s, self.font_size),
            _ => 0.0,
        }
    }

    fn listen(&mut self, node: NodeId, events: &[PointerKind]) {
        if let Some(n) = self.node_mut(node) {
            for e in events {
                if !n.listeners.contains(e) {
                    n.listeners.push(*e);
                }
            }
        }
    }

    fn unlisten(&mut self, node: NodeId) {
        if let Some(n) = self.node_mut(node) {
            n.listeners.clear();
        }
    }

    fn transition(&mut self, node: NodeId, transition: Transition) {
        let key = transition.target.key();
        let Some(from) = self.get(node, key) else {
            self.set(node, transition.target);
            return;
        };
        self.transitions.retain(|a| !(a.node == node && a.transition.target.key() == key));
        self.transitions.push(Active { node, from, transition, elapsed: Duration::ZERO });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_length_includes_closing_edge() {
        let d = PathData::polygon(&[
            ScreenPoint::new(0.0, 0.0),
            ScreenPoint::new(3.0, 0.0),
            ScreenPoint::new(3.0, 4.0),
        ]);
        assert!((d.length() - 12.0).abs() < 1e-9);
        assert_eq!(d.to_svg(), "M0,0L3,0L3,4Z");
    }

    #[test]
    fn raise_moves_to_end() {
        let mut s = SceneSurface::new();
        let g = s.append(s.root(), ElementKind::Group, "g");
        let a = s.append(g, ElementKind::Path, "a");
        let b = s.append(g, ElementKind::Path, "b");
        s.raise(a);
        assert_eq!(s.children(g), &[b, a]);
    }

    #[test]
    fn transition_reaches_target() {
        let mut s = SceneSurface::new();
        let p = s.append(s.root(), ElementKind::Path, "");
        s.set(p, Attr::StrokeDashOffset(100.0));
        s.transition(p, Transition { target: Attr::StrokeDashOffset(0.0), duration: Duration::from_secs(1), ease: Ease::Linear });
        s.advance(Duration::from_millis(500));
        assert_eq!(s.get(p, AttrKey::StrokeDashOffset), Some(Attr::StrokeDashOffset(50.0)));
        s.advance(Duration::from_millis(600));
        assert_eq!(s.get(p, AttrKey::StrokeDashOffset), Some(Attr::StrokeDashOffset(0.0)));
        assert!(!s.is_animating());
    }

    #[test]
    fn unset_drops_attr_and_its_transition() {
        let mut s = SceneSurface::new();
        let p = s.append(s.root(), ElementKind::Path, "");
        s.set(p, Attr::StrokeDashOffset(100.0));
        s.transition(p, Transition { target: Attr::StrokeDashOffset(0.0), duration: Duration::from_secs(1), ease: Ease::Linear });
        s.unset(p, AttrKey::StrokeDashOffset);
        assert!(s.get(p, AttrKey::StrokeDashOffset).is_none());
        assert!(!s.is_animating());
        s.advance(Duration::from_millis(500));
        assert!(s.get(p, AttrKey::StrokeDashOffset).is_none());
    }
}
