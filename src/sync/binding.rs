//! Host lifecycle helper
//!
//! A [`SyncBinding`] lives as long as the host component. Each time the host
//! renders it calls [`SyncBinding::bind`] with its current element list; the
//! binding only tears down and re-attaches when that list (or the options)
//! actually changed, and old listeners are always removed first.

use super::element::{ElementRef, ScrollElement};
use super::synchronizer::{attach, SyncHandle, SyncOptions, SyncStats};
use log::debug;
use std::rc::{Rc, Weak};

/// Owns at most one [`SyncHandle`] and re-binds it when its inputs change.
#[derive(Default)]
pub struct SyncBinding {
    handle: Option<SyncHandle>,
    /// Identity of the bound set; weak so the binding never extends lifetimes
    elements: Vec<Option<Weak<dyn ScrollElement>>>,
    options: Option<SyncOptions>,
    epoch: u64,
}

impl std::fmt::Debug for SyncBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncBinding")
            .field("handle", &self.handle)
            .field("elements", &self.elements.len())
            .field("options", &self.options)
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl SyncBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronize `elements` with `options`.
    ///
    /// Returns `true` if a new handle was attached.
    pub fn bind(&mut self, elements: &[Option<ElementRef>], options: SyncOptions) -> bool {
        let unchanged = self.handle.is_some()
            && same_set(&self.elements, elements)
            && self
                .options
                .as_ref()
                .is_some_and(|current| current.same_as(&options));
        if unchanged {
            return false;
        }

        // Old listeners go before new ones are installed
        self.unbind();

        self.handle = Some(attach(elements, options.clone()));
        self.elements = elements
            .iter()
            .map(|element| element.as_ref().map(Rc::downgrade))
            .collect();
        self.options = Some(options);
        self.epoch += 1;
        debug!("Scroll sync bound (epoch {})", self.epoch);
        true
    }

    /// Detach the current handle, if any.
    pub fn unbind(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.detach();
        }
        self.elements.clear();
        self.options = None;
    }

    /// Whether a handle with installed listeners is held.
    pub fn is_bound(&self) -> bool {
        self.handle.as_ref().is_some_and(SyncHandle::is_active)
    }

    /// Number of completed binds since creation.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn stats(&self) -> SyncStats {
        self.handle
            .as_ref()
            .map(SyncHandle::stats)
            .unwrap_or_default()
    }
}

fn same_set(current: &[Option<Weak<dyn ScrollElement>>], next: &[Option<ElementRef>]) -> bool {
    // The held Weak keeps the allocation, so an address cannot be reused
    current.len() == next.len()
        && current.iter().zip(next).all(|pair| match pair {
            (Some(a), Some(b)) => {
                std::ptr::eq(Weak::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
            }
            (None, None) => true,
            _ => false,
        })
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::geometry::{Axis, Extent};
    use crate::sync::timer::TimerQueue;
    use crate::sync::viewport::Viewport;

    fn viewport(height: f32) -> Rc<Viewport> {
        Rc::new(Viewport::new(
            Extent::new(100.0, height),
            Extent::new(100.0, 100.0),
        ))
    }

    fn refs(viewports: &[&Rc<Viewport>]) -> Vec<Option<ElementRef>> {
        viewports
            .iter()
            .map(|v| {
                let element: ElementRef = Rc::<Viewport>::clone(*v);
                Some(element)
            })
            .collect()
    }

    #[test]
    fn test_bind_same_set_is_noop() {
        let a = viewport(1100.0);
        let b = viewport(600.0);
        let mut binding = SyncBinding::new();

        assert!(binding.bind(&refs(&[&a, &b]), SyncOptions::default()));
        assert!(!binding.bind(&refs(&[&a, &b]), SyncOptions::default()));
        assert_eq!(binding.epoch(), 1);
        assert_eq!(a.listener_count(), 1);
    }

    #[test]
    fn test_rebind_on_new_set_drops_stale_listeners() {
        let a = viewport(1100.0);
        let b = viewport(600.0);
        let c = viewport(2100.0);
        let mut binding = SyncBinding::new();

        binding.bind(&refs(&[&a, &b]), SyncOptions::default());
        assert!(binding.bind(&refs(&[&a, &c]), SyncOptions::default()));

        assert_eq!(a.listener_count(), 1);
        assert_eq!(b.listener_count(), 0);
        assert_eq!(c.listener_count(), 1);

        a.scroll_axis(Axis::Y, 500.0);
        assert_eq!(b.offset().y, 0.0);
        assert_eq!(c.offset().y, 1000.0);
    }

    #[test]
    fn test_rebind_on_options_change() {
        let a = viewport(1100.0);
        let b = viewport(600.0);
        let queue = Rc::new(TimerQueue::new());
        let mut binding = SyncBinding::new();

        binding.bind(&refs(&[&a, &b]), SyncOptions::default());
        assert!(binding.bind(&refs(&[&a, &b]), SyncOptions::throttled(queue.clone())));
        assert_eq!(a.listener_count(), 1);

        a.scroll_axis(Axis::Y, 500.0);
        assert_eq!(b.offset().y, 0.0);
        queue.advance(std::time::Duration::from_millis(10));
        assert_eq!(b.offset().y, 250.0);
    }

    #[test]
    fn test_unbind() {
        let a = viewport(1100.0);
        let b = viewport(600.0);
        let mut binding = SyncBinding::new();
        binding.bind(&refs(&[&a, &b]), SyncOptions::default());
        assert!(binding.is_bound());

        binding.unbind();
        binding.unbind();
        assert!(!binding.is_bound());
        assert_eq!(a.listener_count(), 0);

        // Binding the same set again after unbind attaches fresh
        assert!(binding.bind(&refs(&[&a, &b]), SyncOptions::default()));
        assert_eq!(binding.epoch(), 2);
    }

    #[test]
    fn test_binding_does_not_keep_elements_alive() {
        let a = viewport(1100.0);
        let b = viewport(600.0);
        let weak_b = Rc::downgrade(&b);
        let mut binding = SyncBinding::new();
        binding.bind(&refs(&[&a, &b]), SyncOptions::default());

        drop(b);
        assert!(weak_b.upgrade().is_none());
        assert!(binding.is_bound());
    }

    #[test]
    fn test_inert_binding_is_not_bound() {
        let a = viewport(1100.0);
        let mut binding = SyncBinding::new();
        binding.bind(&refs(&[&a]), SyncOptions::default());
        assert!(!binding.is_bound());
        assert_eq!(binding.stats(), SyncStats::default());
    }
}
