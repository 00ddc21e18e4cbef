//! Event types, subscription registry, and the frame scheduler.
//!
//! The engine is single-threaded and event-driven: the host feeds discrete
//! events into [`crate::app::App::dispatch`] and presents frames by calling
//! `run_frame`. Handlers must tolerate repeated and overlapping invocation
//! (a resize can arrive while a layout recompute is already pending), so
//! everything here is idempotent.
//!
//! ## Subscriptions
//!
//! The page registers interest during initialization and never tears down —
//! a session lasts exactly one document load. Registration is recorded
//! explicitly so re-initialization (a second gallery init pass) cannot
//! double-wire anything: window-level listeners are guarded by a flag,
//! image-load triggers are one-shot by removal, and card/link wiring is
//! keyed by node so re-inserting the same marker is a no-op.
//!
//! ## Frame scheduler
//!
//! Layout recomputes requested from routing or resize handlers are
//! deferred to the next frame, and coalesced: however many requests arrive
//! between frames, `take_layout_request` surrenders at most one.

use crate::dom::NodeId;
use std::collections::{BTreeMap, BTreeSet};

/// A discrete input to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The location hash changed (user edit, link click, host navigation).
    HashChange,
    /// History cursor moved via back/forward.
    PopState,
    /// Viewport dimensions changed.
    Resize,
    /// Device orientation changed.
    OrientationChange,
    /// An element was clicked.
    Click(NodeId),
    /// An image element finished loading.
    ImageLoaded(NodeId),
    /// Pointer pressed at horizontal position `x` over `node`.
    PointerDown { node: NodeId, x: f64 },
    /// Pointer moved to horizontal position `x`.
    PointerMove { x: f64 },
    /// Pointer released.
    PointerUp,
    /// A key was pressed (`"Escape"` etc.).
    KeyDown(String),
}

/// What the page has wired up. Registered during init, never torn down.
#[derive(Debug, Clone, Default)]
pub struct Subscriptions {
    /// Window resize / orientation-change recompute hook. Set once by
    /// gallery init; the guard that keeps repeated init from stacking
    /// duplicate listeners.
    pub window_layout: bool,
    /// Images whose load event should trigger one layout pass. Entries are
    /// removed as they fire, so each image triggers at most once.
    pub pending_image_loads: BTreeSet<NodeId>,
    /// Gallery card anchors mapped to their artwork identifier.
    pub cards: BTreeMap<NodeId, u32>,
    /// Whether the document-level hash-link delegation is active.
    pub link_delegation: bool,
}

impl Subscriptions {
    /// Register an image-load trigger. Already-registered nodes stay
    /// registered (no double counting — the set makes this idempotent).
    pub fn defer_layout_to_image(&mut self, img: NodeId) {
        self.pending_image_loads.insert(img);
    }

    /// Consume the trigger for `img`. Returns true the first time only.
    pub fn take_image_trigger(&mut self, img: NodeId) -> bool {
        self.pending_image_loads.remove(&img)
    }

    pub fn register_card(&mut self, anchor: NodeId, artwork_id: u32) {
        self.cards.insert(anchor, artwork_id);
    }

    pub fn card_id(&self, anchor: NodeId) -> Option<u32> {
        self.cards.get(&anchor).copied()
    }
}

/// Coalescing one-slot scheduler for layout recomputes.
///
/// `request` may be called any number of times between frames; the next
/// frame runs at most one recompute.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    layout_pending: bool,
}

impl Scheduler {
    pub fn request_layout(&mut self) {
        self.layout_pending = true;
    }

    pub fn layout_pending(&self) -> bool {
        self.layout_pending
    }

    /// Claim the pending request, clearing it. True at most once per
    /// request burst.
    pub fn take_layout_request(&mut self) -> bool {
        std::mem::take(&mut self.layout_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_coalesces_requests() {
        let mut s = Scheduler::default();
        s.request_layout();
        s.request_layout();
        s.request_layout();
        assert!(s.take_layout_request());
        assert!(!s.take_layout_request());
    }

    #[test]
    fn image_trigger_fires_at_most_once() {
        let mut subs = Subscriptions::default();
        let img = NodeId(7);
        subs.defer_layout_to_image(img);
        subs.defer_layout_to_image(img);
        assert!(subs.take_image_trigger(img));
        assert!(!subs.take_image_trigger(img));
    }

    #[test]
    fn card_registration_is_idempotent() {
        let mut subs = Subscriptions::default();
        let anchor = NodeId(3);
        subs.register_card(anchor, 5);
        subs.register_card(anchor, 5);
        assert_eq!(subs.card_id(anchor), Some(5));
        assert_eq!(subs.cards.len(), 1);
    }
}
