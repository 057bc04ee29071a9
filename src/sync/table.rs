//! Last-known-position table
//!
//! Keyed by generational slot keys so an entry for a detached element can
//! never be confused with one created later.

use super::element::{ElementRef, ListenerId, ScrollElement};
use super::geometry::{Axis, ScrollOffset};
use slotmap::{new_key_type, SlotMap};
use std::rc::{Rc, Weak};

new_key_type! {
    /// Identity of one registered element within a synchronizer
    pub struct ElementKey;
}

/// Per-element bookkeeping.
pub(crate) struct Tracked {
    /// Non-owning handle; the host decides the element's lifetime
    pub element: Weak<dyn ScrollElement>,
    /// Listener installed on the element at attach time
    pub listener: Option<ListenerId>,
    /// Offset last observed on, or applied to, the element
    pub last: ScrollOffset,
}

/// Registration order plus last-known offsets.
#[derive(Default)]
pub(crate) struct PositionTable {
    order: Vec<ElementKey>,
    entries: SlotMap<ElementKey, Tracked>,
}

impl PositionTable {
    /// Track `element`, seeding its entry with `initial`.
    pub fn insert(&mut self, element: &ElementRef, initial: ScrollOffset) -> ElementKey {
        let key = self.entries.insert(Tracked {
            element: Rc::downgrade(element),
            listener: None,
            last: initial,
        });
        self.order.push(key);
        key
    }

    pub fn set_listener(&mut self, key: ElementKey, listener: ListenerId) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.listener = Some(listener);
        }
    }

    pub fn last(&self, key: ElementKey) -> Option<ScrollOffset> {
        self.entries.get(key).map(|entry| entry.last)
    }

    /// Record the offset an element now holds on `axis`.
    pub fn record(&mut self, key: ElementKey, axis: Axis, value: f32) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.last.set(axis, value);
        }
    }

    /// Upgrade the element handle, if it is still alive.
    pub fn element(&self, key: ElementKey) -> Option<ElementRef> {
        self.entries.get(key).and_then(|entry| entry.element.upgrade())
    }

    /// Keys in registration order.
    pub fn keys(&self) -> &[ElementKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Remove every entry, returning them in registration order.
    pub fn drain(&mut self) -> Vec<Tracked> {
        let order = std::mem::take(&mut self.order);
        let drained = order
            .into_iter()
            .filter_map(|key| self.entries.remove(key))
            .collect();
        self.entries.clear();
        drained
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
