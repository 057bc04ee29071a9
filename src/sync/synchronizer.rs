//! The scroll synchronizer
//!
//! [`attach`] registers a scroll listener on every element of a set. When
//! any element scrolls, a propagation pass reads its relative progress on
//! the axes that actually moved and writes the matching offset to every
//! other element.
//!
//! # Feedback loops
//!
//! Writes made during a pass raise scroll events of their own. Those events
//! are dropped while the in-progress flag is set. Events that arrive later
//! (platforms that deliver scroll events on the next frame) find the target's
//! last-known position already equal to its offset, so no axis counts as
//! moved and nothing propagates.
//!
//! # Usage
//!
//! ```ignore
//! let handle = lockstep::attach(&[Some(left), Some(right)], SyncOptions::default());
//! // ... user scrolls either element ...
//! drop(handle); // listeners removed
//! ```

use super::element::{same_element, ElementRef, ScrollListener};
use super::geometry::{Axis, ScrollMetrics};
use super::table::{ElementKey, PositionTable};
use super::timer::{PendingTimer, Scheduler};
use log::{debug, trace};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Coalescing delay used by [`Dispatch::throttled`].
pub const DEFAULT_THROTTLE_DELAY: Duration = Duration::from_millis(10);

/// Smallest offset change (in host units) treated as real motion.
pub const DEFAULT_MIN_DELTA: f32 = 1.0;

/// When a propagation pass runs relative to the scroll event.
#[derive(Clone)]
pub enum Dispatch {
    /// Run the pass inside the scroll listener
    Immediate,
    /// Coalesce bursts: each event replaces the pending timer, and one pass
    /// runs for the most recent source once `delay` elapses
    Throttled {
        delay: Duration,
        scheduler: Rc<dyn Scheduler>,
    },
}

impl Dispatch {
    /// Throttled dispatch with the default delay.
    pub fn throttled(scheduler: Rc<dyn Scheduler>) -> Self {
        Dispatch::Throttled {
            delay: DEFAULT_THROTTLE_DELAY,
            scheduler,
        }
    }

    fn same_as(&self, other: &Dispatch) -> bool {
        match (self, other) {
            (Dispatch::Immediate, Dispatch::Immediate) => true,
            (
                Dispatch::Throttled { delay, scheduler },
                Dispatch::Throttled {
                    delay: other_delay,
                    scheduler: other_scheduler,
                },
            ) => {
                delay == other_delay
                    && std::ptr::eq(
                        Rc::as_ptr(scheduler) as *const u8,
                        Rc::as_ptr(other_scheduler) as *const u8,
                    )
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Immediate => f.write_str("Immediate"),
            Dispatch::Throttled { delay, .. } => {
                f.debug_struct("Throttled").field("delay", delay).finish()
            }
        }
    }
}

/// Tuning for one synchronizer instance.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Minimum offset change that counts as motion, and minimum correction
    /// worth writing
    pub min_delta: f32,
    /// Immediate or throttled passes
    pub dispatch: Dispatch,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            min_delta: DEFAULT_MIN_DELTA,
            dispatch: Dispatch::Immediate,
        }
    }
}

impl SyncOptions {
    /// Default options with throttled dispatch.
    pub fn throttled(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            dispatch: Dispatch::throttled(scheduler),
            ..Self::default()
        }
    }

    /// Whether two option sets would produce identical behavior.
    pub fn same_as(&self, other: &SyncOptions) -> bool {
        self.min_delta == other.min_delta && self.dispatch.same_as(&other.dispatch)
    }

    fn threshold(&self) -> f32 {
        if self.min_delta.is_finite() {
            self.min_delta.max(DEFAULT_MIN_DELTA)
        } else {
            DEFAULT_MIN_DELTA
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statistics
// ─────────────────────────────────────────────────────────────────────────────

/// Counters describing what a synchronizer has done since attach.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Propagation passes that found at least one moved axis
    pub passes: u64,
    /// Offsets written to target elements
    pub writes: u64,
    /// Writes skipped because the target was already within threshold
    pub suppressed: u64,
    /// Scroll events ignored because a pass was in progress
    pub reentrant_dropped: u64,
    /// Elements skipped because they were disposed
    pub skipped: u64,
    /// Throttled events superseded by a newer one
    pub coalesced: u64,
    /// Throttled events ignored because their source had not moved
    pub echoes_dropped: u64,
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared State
// ─────────────────────────────────────────────────────────────────────────────

/// State owned by one synchronizer. Listeners and timers hold it weakly.
struct Shared {
    options: SyncOptions,
    table: RefCell<PositionTable>,
    syncing: Cell<bool>,
    detached: Cell<bool>,
    pending: RefCell<PendingTimer>,
    stats: Cell<SyncStats>,
}

/// Holds the in-progress flag for the duration of one pass.
///
/// Released on drop, so a panicking element cannot leave the flag set.
struct PassGuard<'a>(&'a Cell<bool>);

impl<'a> PassGuard<'a> {
    fn engage(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Shared {
    fn count(&self, update: impl FnOnce(&mut SyncStats)) {
        let mut stats = self.stats.get();
        update(&mut stats);
        self.stats.set(stats);
    }

    fn on_scroll(self: &Rc<Self>, source: ElementKey) {
        if self.detached.get() {
            return;
        }
        if self.syncing.get() {
            trace!("Dropping scroll event raised during a pass");
            self.count(|s| s.reentrant_dropped += 1);
            return;
        }

        match &self.options.dispatch {
            Dispatch::Immediate => self.run_pass(source),
            Dispatch::Throttled { delay, scheduler } => {
                // A late echo of our own write must not displace a real pending scroll
                if !self.source_moved(source) {
                    trace!("Ignoring throttled event from a source that did not move");
                    self.count(|s| s.echoes_dropped += 1);
                    return;
                }
                if self.pending.borrow().is_pending() {
                    self.count(|s| s.coalesced += 1);
                }
                let weak = Rc::downgrade(self);
                let id = scheduler.schedule(
                    *delay,
                    Box::new(move || {
                        if let Some(shared) = weak.upgrade() {
                            shared.pending.borrow_mut().fired();
                            shared.run_pass(source);
                        }
                    }),
                );
                self.pending.borrow_mut().replace(scheduler.as_ref(), id);
            }
        }
    }

    /// Whether `source` moved past the threshold since its last-known position.
    fn source_moved(&self, source: ElementKey) -> bool {
        let (element, last) = {
            let table = self.table.borrow();
            (table.element(source), table.last(source))
        };
        match (element.and_then(|e| e.metrics()), last) {
            (Some(metrics), Some(last)) => {
                !moved_axes(&metrics, last.x, last.y, self.options.threshold()).is_empty()
            }
            _ => false,
        }
    }

    fn run_pass(&self, source: ElementKey) {
        if self.detached.get() {
            return;
        }
        let Some(_guard) = PassGuard::engage(&self.syncing) else {
            self.count(|s| s.reentrant_dropped += 1);
            return;
        };

        let threshold = self.options.threshold();
        let (source_element, last) = {
            let table = self.table.borrow();
            (table.element(source), table.last(source))
        };
        let (Some(metrics), Some(last)) = (source_element.and_then(|e| e.metrics()), last) else {
            debug!("Scroll source disposed before its pass ran");
            self.count(|s| s.skipped += 1);
            return;
        };

        let moved = moved_axes(&metrics, last.x, last.y, threshold);
        if moved.is_empty() {
            trace!("No axis moved past threshold, skipping pass");
            return;
        }

        let targets: Vec<(ElementKey, Option<ElementRef>)> = {
            let mut table = self.table.borrow_mut();
            for &(axis, _) in &moved {
                table.record(source, axis, metrics.offset.get(axis));
            }
            table
                .keys()
                .iter()
                .filter(|key| **key != source)
                .map(|key| (*key, table.element(*key)))
                .collect()
        };

        self.count(|s| s.passes += 1);
        trace!(
            "Propagating {:?} to {} element(s)",
            moved,
            targets.len()
        );

        for (key, element) in targets {
            if let Some(element) = element {
                self.apply(key, &element, &moved, threshold);
            } else {
                debug!("Skipping disposed element during pass");
                self.count(|s| s.skipped += 1);
            }
        }
    }

    /// Write the source's progress on each moved axis to one target.
    fn apply(&self, key: ElementKey, element: &ElementRef, moved: &[(Axis, f32)], threshold: f32) {
        let Some(metrics) = element.metrics() else {
            debug!("Target disposed between read and write");
            self.count(|s| s.skipped += 1);
            return;
        };

        for &(axis, progress) in moved {
            let Some(target) = metrics.offset_for_progress(axis, progress) else {
                continue;
            };
            let current = metrics.offset.get(axis);

            if (current - target).abs() < threshold {
                self.count(|s| s.suppressed += 1);
                self.table.borrow_mut().record(key, axis, current);
                continue;
            }

            if !element.set_offset(axis, target) {
                debug!("Target disposed while writing {} offset", axis);
                self.count(|s| s.skipped += 1);
                return;
            }
            self.count(|s| s.writes += 1);

            // The element may clamp; remember what it actually holds
            let held = element
                .metrics()
                .map(|m| m.offset.get(axis))
                .unwrap_or(target);
            self.table.borrow_mut().record(key, axis, held);
        }
    }

    fn teardown(&self) {
        self.detached.set(true);

        if let Dispatch::Throttled { scheduler, .. } = &self.options.dispatch {
            self.pending.borrow_mut().cancel(scheduler.as_ref());
        }

        let tracked = self.table.borrow_mut().drain();
        let mut removed = 0;
        for entry in tracked {
            if let (Some(element), Some(listener)) = (entry.element.upgrade(), entry.listener) {
                if element.remove_scroll_listener(listener) {
                    removed += 1;
                }
            }
        }
        debug!("Scroll sync detached, removed {} listener(s)", removed);
    }
}

/// Axes whose offset moved at least `threshold` since the last-known position,
/// paired with the source's relative progress on that axis.
///
/// Axes without scroll range never drive a pass.
fn moved_axes(metrics: &ScrollMetrics, last_x: f32, last_y: f32, threshold: f32) -> Vec<(Axis, f32)> {
    Axis::ALL
        .into_iter()
        .filter(|&axis| {
            let last = match axis {
                Axis::X => last_x,
                Axis::Y => last_y,
            };
            metrics.is_scrollable(axis) && (metrics.offset.get(axis) - last).abs() >= threshold
        })
        .map(|axis| (axis, metrics.progress(axis)))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Attach / Detach
// ─────────────────────────────────────────────────────────────────────────────

/// Start synchronizing `elements`.
///
/// Absent (`None`) and already-disposed handles are skipped, as are repeats
/// of an element already in the set. With fewer than two elements left the
/// returned handle is inert: no listeners are installed.
///
/// The synchronizer keeps only weak references; the caller owns the
/// elements. Dropping the returned handle detaches.
#[must_use = "dropping the handle detaches the synchronizer immediately"]
pub fn attach(elements: &[Option<ElementRef>], options: SyncOptions) -> SyncHandle {
    let mut present: Vec<(&ElementRef, ScrollMetrics)> = Vec::with_capacity(elements.len());
    for element in elements.iter().flatten() {
        if present.iter().any(|(seen, _)| same_element(seen, element)) {
            debug!("Ignoring duplicate element in sync set");
            continue;
        }
        if let Some(metrics) = element.metrics() {
            present.push((element, metrics));
        }
    }

    if present.len() < 2 {
        debug!(
            "Scroll sync needs at least two elements, got {}; staying inert",
            present.len()
        );
        return SyncHandle::inert();
    }

    let shared = Rc::new(Shared {
        options,
        table: RefCell::new(PositionTable::default()),
        syncing: Cell::new(false),
        detached: Cell::new(false),
        pending: RefCell::new(PendingTimer::new()),
        stats: Cell::new(SyncStats::default()),
    });

    let keys: Vec<ElementKey> = {
        let mut table = shared.table.borrow_mut();
        present
            .iter()
            .map(|(element, metrics)| table.insert(element, metrics.offset))
            .collect()
    };

    for ((element, _), key) in present.iter().zip(keys) {
        let weak = Rc::downgrade(&shared);
        let listener: ScrollListener = Rc::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_scroll(key);
            }
        });
        let id = element.add_scroll_listener(listener);
        shared.table.borrow_mut().set_listener(key, id);
    }

    debug!(
        "Scroll sync attached to {} elements ({:?})",
        present.len(),
        shared.options.dispatch
    );
    SyncHandle {
        shared: Some(shared),
    }
}

/// Detach capability returned by [`attach`].
///
/// Detaching removes every listener, cancels any pending throttle timer and
/// clears the position table. It is idempotent and also happens on drop.
pub struct SyncHandle {
    shared: Option<Rc<Shared>>,
}

impl fmt::Debug for SyncHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncHandle")
            .field("active", &self.is_active())
            .field("elements", &self.len())
            .finish()
    }
}

impl SyncHandle {
    /// A handle that synchronizes nothing.
    pub fn inert() -> Self {
        Self { shared: None }
    }

    /// Remove all listeners and clear internal state.
    pub fn detach(&mut self) {
        if let Some(shared) = self.shared.take() {
            shared.teardown();
        }
    }

    /// Whether listeners are currently installed.
    pub fn is_active(&self) -> bool {
        self.shared.is_some()
    }

    /// Number of synchronized elements.
    pub fn len(&self) -> usize {
        self.shared
            .as_ref()
            .map(|shared| shared.table.borrow().len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counters since attach. Zero for inert or detached handles.
    pub fn stats(&self) -> SyncStats {
        self.shared
            .as_ref()
            .map(|shared| shared.stats.get())
            .unwrap_or_default()
    }

    /// Options the handle was attached with.
    pub fn options(&self) -> Option<&SyncOptions> {
        self.shared.as_ref().map(|shared| &shared.options)
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.detach();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
