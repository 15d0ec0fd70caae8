//! Undo/redo history with debounced snapshot coalescing.
//!
//! The buffer stores (text, cursor) snapshots in a fixed-capacity sequence
//! split by a position pointer into a past region (undoable) and a future
//! region (redoable). Rapid edits coalesce through an explicit, clock-driven
//! debounce timer; nothing here schedules ambient callbacks, the owning
//! session polls with its own notion of now.

use ropey::Rope;
use std::time::{Duration, Instant};

/// Default number of snapshots the buffer retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Default idle window before a debounced snapshot commits.
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(150);

/// One undo/redo checkpoint.
///
/// Text is held as a [`Rope`]: snapshots share structure with the session
/// buffer they were cloned from, so a full-capacity history of a large
/// document stays cheap.
#[derive(Debug, Clone)]
pub struct HistorySnapshot {
    /// The full text at checkpoint time.
    pub text: Rope,
    /// Flat UTF-16 caret offset at checkpoint time.
    pub cursor: usize,
}

impl HistorySnapshot {
    /// Create a snapshot from borrowed text.
    pub fn new(text: &str, cursor: usize) -> Self {
        Self {
            text: Rope::from_str(text),
            cursor,
        }
    }
}

/// An explicit, cancellable one-shot timer.
///
/// Purely a deadline holder: `schedule` arms it relative to a caller-supplied
/// instant and `is_due` compares against another. Deterministic under test,
/// no thread and no callback.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    window: Duration,
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// A disarmed timer with the given idle window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the timer one window after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether the timer is armed.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the armed deadline has passed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// Fixed-capacity undo/redo buffer over [`HistorySnapshot`]s.
#[derive(Debug)]
pub struct HistoryBuffer {
    items: Vec<HistorySnapshot>,
    /// Number of past entries, current included. Zero only before seeding.
    position: usize,
    capacity: usize,
    pending: Option<HistorySnapshot>,
    timer: DebounceTimer,
}

impl HistoryBuffer {
    /// An empty buffer with the default capacity and debounce window.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// An empty buffer retaining at most `capacity` snapshots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_window(capacity, DEFAULT_DEBOUNCE_WINDOW)
    }

    /// Full control over capacity and idle window.
    pub fn with_capacity_and_window(capacity: usize, window: Duration) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            items: Vec::new(),
            position: 0,
            capacity,
            pending: None,
            timer: DebounceTimer::new(window),
        }
    }

    /// Number of retained snapshots (pending excluded).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the buffer holds no snapshots yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The retention limit.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether an uncommitted debounced snapshot is waiting.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.position > 1 || (self.pending.is_some() && self.position > 0)
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.position < self.items.len()
    }

    /// Commit a snapshot immediately.
    ///
    /// Discards the redo region, then evicts the oldest past entry once the
    /// capacity is exceeded. Any pending debounced snapshot is superseded.
    pub fn add(&mut self, snapshot: HistorySnapshot) {
        self.pending = None;
        self.timer.cancel();
        self.items.truncate(self.position);
        self.items.push(snapshot);
        if self.items.len() > self.capacity {
            self.items.remove(0);
        }
        self.position = self.items.len();
    }

    /// Stage a snapshot to commit after one idle window from `now`.
    ///
    /// Successive calls within the window replace the staged snapshot and
    /// push the deadline out, so a burst of edits commits exactly once, with
    /// the last call's arguments.
    pub fn debounced_add(&mut self, snapshot: HistorySnapshot, now: Instant) {
        self.pending = Some(snapshot);
        self.timer.schedule(now);
    }

    /// Commit the staged snapshot if its idle window has elapsed. Returns
    /// whether a commit happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.timer.is_due(now) {
            self.flush()
        } else {
            false
        }
    }

    /// Commit the staged snapshot right now, ahead of its deadline. Returns
    /// whether anything was staged.
    pub fn flush(&mut self) -> bool {
        match self.pending.take() {
            Some(snapshot) => {
                self.add(snapshot);
                true
            }
            None => false,
        }
    }

    /// Drop the staged snapshot without committing. Teardown path: a pending
    /// commit must never fire after the owning session is gone.
    pub fn cancel_pending(&mut self) {
        self.pending = None;
        self.timer.cancel();
    }

    /// Step back one snapshot and return it, or `None` at the beginning.
    ///
    /// A staged snapshot is flushed first so the undo starts from what the
    /// user last saw.
    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        self.flush();
        if self.position > 1 {
            self.position -= 1;
            self.items.get(self.position - 1)
        } else {
            None
        }
    }

    /// Step forward one snapshot and return it, or `None` at the end.
    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        self.flush();
        if self.position < self.items.len() {
            self.position += 1;
            self.items.get(self.position - 1)
        } else {
            None
        }
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}
