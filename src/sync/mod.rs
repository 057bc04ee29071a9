//! Scroll synchronization core for lockstep
//!
//! Keeps any number of scroll containers at the same relative scroll
//! progress. The core is single-threaded and event-driven: it reacts to
//! scroll listeners and, optionally, to a timer, and never blocks.

mod binding;
mod element;
mod geometry;
mod synchronizer;
mod table;
mod timer;
mod viewport;

pub use binding::SyncBinding;
pub use element::{same_element, ElementRef, ListenerId, ScrollElement, ScrollListener};
pub use geometry::{relative_progress, scroll_range, Axis, Extent, ScrollMetrics, ScrollOffset};
pub use synchronizer::{
    attach, Dispatch, SyncHandle, SyncOptions, SyncStats, DEFAULT_MIN_DELTA, DEFAULT_THROTTLE_DELAY,
};
pub use table::ElementKey;
pub use timer::{PendingTimer, Scheduler, TimerId, TimerQueue, TimerTask};
pub use viewport::{EventDelivery, Viewport};
