//! In-memory scroll container
//!
//! [`Viewport`] is a complete [`ScrollElement`] that keeps its state in
//! memory. Frame-based hosts (immediate-mode GUIs) wrap one per visible
//! container: each frame they apply [`Viewport::take_programmatic_write`] to
//! the native widget and publish what the widget reports through
//! [`Viewport::report`]. Tests use it directly to simulate user scrolling.

use super::element::{ListenerId, ScrollElement, ScrollListener};
use super::geometry::{Axis, Extent, ScrollMetrics, ScrollOffset};
use log::trace;
use std::cell::{Cell, RefCell};

/// When scroll listeners run relative to the change that raised them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventDelivery {
    /// Listeners run synchronously inside the mutating call
    #[default]
    Immediate,
    /// Changes are coalesced into one event, delivered by [`Viewport::flush_events`]
    Deferred,
}

#[derive(Debug, Default)]
struct ViewportState {
    metrics: ScrollMetrics,
    /// Offset last written through `set_offset` and not yet taken by the host
    programmatic: Option<ScrollOffset>,
}

/// A scroll container held entirely in memory.
pub struct Viewport {
    state: RefCell<ViewportState>,
    listeners: RefCell<Vec<(ListenerId, ScrollListener)>>,
    next_listener_id: Cell<u64>,
    delivery: EventDelivery,
    event_pending: Cell<bool>,
    disposed: Cell<bool>,
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("metrics", &self.state.borrow().metrics)
            .field("listeners", &self.listeners.borrow().len())
            .field("delivery", &self.delivery)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl Viewport {
    /// Create a viewport scrolled to the origin.
    pub fn new(content: Extent, viewport: Extent) -> Self {
        Self {
            state: RefCell::new(ViewportState {
                metrics: ScrollMetrics::new(ScrollOffset::ZERO, content, viewport),
                programmatic: None,
            }),
            listeners: RefCell::new(Vec::new()),
            next_listener_id: Cell::new(0),
            delivery: EventDelivery::Immediate,
            event_pending: Cell::new(false),
            disposed: Cell::new(false),
        }
    }

    /// Choose how scroll events are delivered.
    pub fn with_delivery(mut self, delivery: EventDelivery) -> Self {
        self.delivery = delivery;
        self
    }

    /// Current offset (zero once disposed).
    pub fn offset(&self) -> ScrollOffset {
        if self.disposed.get() {
            return ScrollOffset::ZERO;
        }
        self.state.borrow().metrics.offset
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User-driven changes
    // ─────────────────────────────────────────────────────────────────────────

    /// Scroll to `offset` as the user would, clamped into range.
    pub fn scroll_to(&self, offset: ScrollOffset) {
        if self.disposed.get() {
            return;
        }
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.metrics.offset;
            state.metrics.offset = offset;
            state.metrics = state.metrics.clamped();
            state.metrics.offset != before
        };
        if changed {
            self.emit();
        }
    }

    /// Scroll one axis as the user would.
    pub fn scroll_axis(&self, axis: Axis, value: f32) {
        let offset = self.offset().with(axis, value);
        self.scroll_to(offset);
    }

    /// Change the content size, re-clamping the offset.
    pub fn set_content_size(&self, content: Extent) {
        self.resize(|metrics| metrics.content = content);
    }

    /// Change the viewport size, re-clamping the offset.
    pub fn set_viewport_size(&self, viewport: Extent) {
        self.resize(|metrics| metrics.viewport = viewport);
    }

    fn resize(&self, apply: impl FnOnce(&mut ScrollMetrics)) {
        if self.disposed.get() {
            return;
        }
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.metrics.offset;
            apply(&mut state.metrics);
            state.metrics = state.metrics.clamped();
            state.metrics.offset != before
        };
        if changed {
            self.emit();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame-based host integration
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish the state the native widget reported this frame.
    ///
    /// Raises a scroll event if the reported offset differs from the stored one.
    pub fn report(&self, metrics: ScrollMetrics) {
        if self.disposed.get() {
            return;
        }
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.metrics.offset;
            state.metrics = metrics.clamped();
            state.metrics.offset != before
        };
        if changed {
            self.emit();
        }
    }

    /// Take the offset written by [`ScrollElement::set_offset`] since the last call.
    pub fn take_programmatic_write(&self) -> Option<ScrollOffset> {
        self.state.borrow_mut().programmatic.take()
    }

    /// Whether a programmatic write is waiting to be applied by the host.
    pub fn has_programmatic_write(&self) -> bool {
        self.state.borrow().programmatic.is_some()
    }

    /// Deliver a coalesced deferred event, if any. Returns whether one fired.
    pub fn flush_events(&self) -> bool {
        if !self.event_pending.replace(false) || self.disposed.get() {
            return false;
        }
        self.notify();
        true
    }

    /// Whether a deferred event is waiting for [`Viewport::flush_events`].
    pub fn has_pending_event(&self) -> bool {
        self.event_pending.get()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Number of registered scroll listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Mark the viewport as removed by the host. All listeners are dropped.
    pub fn dispose(&self) {
        self.disposed.set(true);
        self.event_pending.set(false);
        self.listeners.borrow_mut().clear();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn emit(&self) {
        match self.delivery {
            EventDelivery::Immediate => self.notify(),
            EventDelivery::Deferred => self.event_pending.set(true),
        }
    }

    fn notify(&self) {
        // Snapshot so listeners may touch this viewport's listener list
        let snapshot: Vec<ScrollListener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        trace!("Viewport scroll event to {} listener(s)", snapshot.len());
        for listener in snapshot {
            listener();
        }
    }
}

impl ScrollElement for Viewport {
    fn metrics(&self) -> Option<ScrollMetrics> {
        if self.disposed.get() {
            return None;
        }
        Some(self.state.borrow().metrics)
    }

    fn set_offset(&self, axis: Axis, value: f32) -> bool {
        if self.disposed.get() {
            return false;
        }
        let changed = {
            let mut state = self.state.borrow_mut();
            let clamped = state.metrics.clamp_offset(axis, value);
            if state.metrics.offset.get(axis) == clamped {
                false
            } else {
                state.metrics.offset.set(axis, clamped);
                state.programmatic = Some(state.metrics.offset);
                true
            }
        };
        if changed {
            self.emit();
        }
        true
    }

    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId {
        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        if !self.disposed.get() {
            self.listeners.borrow_mut().push((id, listener));
        }
        id
    }

    fn remove_scroll_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
