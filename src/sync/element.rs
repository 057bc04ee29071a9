//! The scrollable element abstraction
//!
//! The synchronizer never knows what a container renders. It only needs to
//! read the container's scroll metrics, write its offset, and hear about
//! scroll changes. Hosts implement [`ScrollElement`] for their widget type
//! (or use [`crate::Viewport`]) and keep ownership of it.

use super::geometry::{Axis, ScrollMetrics};
use std::rc::Rc;

/// Callback invoked whenever an element's scroll offset changes.
pub type ScrollListener = Rc<dyn Fn()>;

/// Shared handle to a host-owned element.
pub type ElementRef = Rc<dyn ScrollElement>;

/// Identifies a listener registered on a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// A rectangular viewport whose content can be scrolled on two axes.
///
/// All methods take `&self`: elements are shared between the host (which
/// renders them) and the synchronizer (which corrects their offset), so
/// implementations use interior mutability.
pub trait ScrollElement {
    /// Current offset, content size and viewport size.
    ///
    /// Returns `None` once the element has been disposed by the host.
    fn metrics(&self) -> Option<ScrollMetrics>;

    /// Programmatically set the offset on one axis.
    ///
    /// Implementations clamp into the valid range and may raise a scroll
    /// event. Returns `false` if the element is gone and nothing was written.
    fn set_offset(&self, axis: Axis, value: f32) -> bool;

    /// Register a scroll listener.
    fn add_scroll_listener(&self, listener: ScrollListener) -> ListenerId;

    /// Remove a previously registered listener. Returns whether it existed.
    fn remove_scroll_listener(&self, id: ListenerId) -> bool;
}

/// Whether two element handles point at the same element.
pub fn same_element(a: &ElementRef, b: &ElementRef) -> bool {
    // Compare data pointers only; vtable pointers may differ across codegen units
    std::ptr::eq(
        Rc::as_ptr(a) as *const u8,
        Rc::as_ptr(b) as *const u8,
    )
}
