// File: crates/tiden-core/src/events.rs
// Summary: Pointer subscriptions for hit cells; routes surface events to an immutable point payload.

use std::collections::HashMap;

use crate::series::Point;
use crate::surface::{NodeId, PointerKind, Surface};

/// Pointer event the highlight controller consumes.
#[derive(Clone, Debug, PartialEq)]
pub enum HighlightEvent {
    Enter(Point),
    Leave(Point),
}

/// A live listener binding: events on `node` resolve to `point`.
#[derive(Clone, Debug, PartialEq)]
pub struct Subscription {
    pub node: NodeId,
    pub point: Point,
}

/// Registry of cell subscriptions, keyed by surface node.
#[derive(Debug, Default)]
pub struct EventRouter {
    subs: HashMap<NodeId, Subscription>,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `node` to `point`, attaching listeners on first subscription.
    /// Re-subscribing replaces the payload.
    pub fn subscribe<S: Surface + ?Sized>(&mut self, surface: &mut S, node: NodeId, point: Point) {
        if !self.subs.contains_key(&node) {
            surface.listen(node, &PointerKind::ALL);
        }
        self.subs.insert(node, Subscription { node, point });
    }

    pub fn unsubscribe<S: Surface + ?Sized>(&mut self, surface: &mut S, node: NodeId) -> Option<Subscription> {
        let sub = self.subs.remove(&node)?;
        surface.unlisten(node);
        Some(sub)
    }

    pub fn subscription(&self, node: NodeId) -> Option<&Subscription> {
        self.subs.get(&node)
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    /// Translate a raw surface event into a highlight event.
    pub fn route(&self, node: NodeId, kind: PointerKind) -> Option<HighlightEvent> {
        let sub = self.subs.get(&node)?;
        let point = sub.point.clone();
        Some(if kind.is_enter() { HighlightEvent::Enter(point) } else { HighlightEvent::Leave(point) })
    }
}
