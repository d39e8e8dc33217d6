// File: crates/tiden-core/src/animate.rs
// Summary: One-shot stroke reveal for series lines on first draw.

use std::time::Duration;

use crate::surface::{Attr, AttrKey, Ease, NodeId, Surface, Transition};

pub const REVEAL_DURATION: Duration = Duration::from_secs(1);

/// Permission to animate one line once. Not `Clone`: consuming it is final.
#[derive(Debug, PartialEq, Eq)]
pub struct RevealToken(());

#[derive(Clone, Copy, Debug, Default)]
pub struct RevealAnimator {
    enabled: bool,
}

impl RevealAnimator {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Token for a newly created line, if reveals are on.
    pub fn issue(&self) -> Option<RevealToken> {
        self.enabled.then_some(RevealToken(()))
    }

    /// Start the reveal on `node` if `token` is still held and the path has
    /// length. Returns whether an animation started.
    pub fn reveal<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId, token: &mut Option<RevealToken>) -> bool {
        if token.is_none() {
            return false;
        }
        let len = surface.path_length(node);
        if !(len > 0.0) {
            return false;
        }
        token.take();
        surface.set(node, Attr::StrokeDashArray(len, len));
        surface.set(node, Attr::StrokeDashOffset(len));
        surface.transition(
            node,
            Transition { target: Attr::StrokeDashOffset(0.0), duration: REVEAL_DURATION, ease: Ease::Linear },
        );
        true
    }

    /// Bring a started reveal in line with a replaced path. A running reveal
    /// keeps its progress on the new length; a finished one loses its dash.
    pub fn refit<S: Surface + ?Sized>(&self, surface: &mut S, node: NodeId) {
        let Some(Attr::StrokeDashArray(old, _)) = surface.get(node, AttrKey::StrokeDashArray) else { return };
        let offset = surface.get(node, AttrKey::StrokeDashOffset).and_then(|a| a.as_f64()).unwrap_or(0.0);
        let remaining = if old > 0.0 { (offset / old).clamp(0.0, 1.0) } else { 0.0 };
        let len = surface.path_length(node);
        if !(remaining > 0.0) || !(len > 0.0) {
            surface.unset(node, AttrKey::StrokeDashArray);
            surface.unset(node, AttrKey::StrokeDashOffset);
            return;
        }
        surface.set(node, Attr::StrokeDashArray(len, len));
        surface.set(node, Attr::StrokeDashOffset(len * remaining));
        surface.transition(
            node,
            Transition {
                target: Attr::StrokeDashOffset(0.0),
                duration: REVEAL_DURATION.mul_f64(remaining),
                ease: Ease::Linear,
            },
        );
    }
}
