//! Deferred callbacks for throttled synchronization
//!
//! The synchronizer never spawns threads or blocks. When throttling is on it
//! asks a [`Scheduler`] to run a task after a short delay. [`TimerQueue`] is
//! a single-threaded virtual-clock implementation: the host advances it by
//! the elapsed frame time and due tasks run inline.

use log::trace;
use std::cell::{Cell, RefCell};
use std::time::Duration;

/// Identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// A deferred task.
pub type TimerTask = Box<dyn FnOnce()>;

/// Source of deferred execution.
pub trait Scheduler {
    /// Run `task` once `delay` has elapsed.
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancel a task that has not run yet. Returns whether it was pending.
    fn cancel(&self, id: TimerId) -> bool;
}

// ─────────────────────────────────────────────────────────────────────────────
// Timer Queue
// ─────────────────────────────────────────────────────────────────────────────

struct Entry {
    id: TimerId,
    deadline: Duration,
    task: TimerTask,
}

/// Virtual-clock timer queue.
#[derive(Default)]
pub struct TimerQueue {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    entries: RefCell<Vec<Entry>>,
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now.get())
            .field("pending", &self.entries.borrow().len())
            .finish()
    }
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of tasks waiting to run.
    pub fn pending(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Time until the next task is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        let now = self.now.get();
        self.entries
            .borrow()
            .iter()
            .map(|entry| entry.deadline.saturating_sub(now))
            .min()
    }

    /// Move the clock forward by `elapsed` and run every task that became due.
    ///
    /// Tasks run in deadline order, ties in scheduling order. A task may
    /// schedule or cancel other timers; newly scheduled tasks that are already
    /// due run in the same call. Returns the number of tasks run.
    pub fn advance(&self, elapsed: Duration) -> usize {
        let target = self.now.get() + elapsed;
        let mut ran = 0;

        while let Some(entry) = self.pop_due(target) {
            // Clock reads inside the task see its own deadline
            self.now.set(entry.deadline.max(self.now.get()));
            trace!("Running timer {:?}", entry.id);
            (entry.task)();
            ran += 1;
        }

        self.now.set(target);
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Entry> {
        let mut entries = self.entries.borrow_mut();
        let index = entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.deadline <= target)
            .min_by_key(|(_, entry)| (entry.deadline, entry.id))
            .map(|(index, _)| index)?;
        Some(entries.remove(index))
    }
}

impl Scheduler for TimerQueue {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push(Entry {
            id,
            deadline: self.now.get() + delay,
            task,
        });
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pending Timer Slot
// ─────────────────────────────────────────────────────────────────────────────

/// At most one outstanding timer; a new one supersedes the old.
#[derive(Debug, Default)]
pub struct PendingTimer {
    slot: Option<TimerId>,
}

impl PendingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `id`, cancelling whatever was pending before.
    pub fn replace(&mut self, scheduler: &dyn Scheduler, id: TimerId) {
        if let Some(previous) = self.slot.replace(id) {
            scheduler.cancel(previous);
        }
    }

    /// Cancel the pending timer, if any.
    pub fn cancel(&mut self, scheduler: &dyn Scheduler) {
        if let Some(previous) = self.slot.take() {
            scheduler.cancel(previous);
        }
    }

    /// Forget the pending timer after it fired.
    ///
    /// Superseded timers are cancelled, so the one firing is always the one
    /// held in the slot.
    pub fn fired(&mut self) -> Option<TimerId> {
        self.slot.take()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
