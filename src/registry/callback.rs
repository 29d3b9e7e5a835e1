//! Timestamped callbacks.
//!
//! A [`Callback`] pairs a due [`Time`] with an invoke-once [`Action`] and a
//! [`CallbackId`] drawn from a process-wide counter at construction. The
//! `(due, id)` pair gives every callback a strict total order: earlier due
//! time first, and among equal due times, earlier construction first.

use crate::types::{CallbackId, Time};
use core::cmp::Ordering;
use core::fmt;
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

/// The unit of deferred work: runs at most once, on the consumer.
pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// Description given to callbacks built from closures.
pub const CLOSURE_LABEL: &str = "closure";
/// Description given to callbacks built from a function pointer and data.
pub const FN_LABEL: &str = "fn";

/// Source of callback sequence numbers. Never reset: resetting would let a
/// new callback sort ahead of older ones with the same due time.
static NEXT_CALLBACK_ID: AtomicU64 = AtomicU64::new(0);

fn next_callback_id() -> CallbackId {
    CallbackId::from_raw(NEXT_CALLBACK_ID.fetch_add(1, AtomicOrdering::Relaxed))
}

/// A deferred action and the time it becomes due.
///
/// Immutable after construction apart from being consumed by
/// [`invoke`](Self::invoke) or [`into_action`](Self::into_action).
pub struct Callback {
    due: Time,
    id: CallbackId,
    label: Cow<'static, str>,
    action: Action,
}

impl Callback {
    /// Creates a callback that runs `f` once `due` has arrived.
    pub fn new<F>(due: Time, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_action(due, CLOSURE_LABEL, Box::new(f))
    }

    /// Creates a callback with a description shown in pending listings.
    pub fn with_label<F>(due: Time, label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::from_action(due, label, Box::new(f))
    }

    /// Creates a callback that calls `func(data)`.
    ///
    /// Lets plain functions carry state without being written as closures.
    pub fn from_fn<D>(due: Time, func: fn(D), data: D) -> Self
    where
        D: Send + 'static,
    {
        Self::from_action(due, FN_LABEL, Box::new(move || func(data)))
    }

    /// Creates a callback from an already boxed action.
    pub fn from_action(due: Time, label: impl Into<Cow<'static, str>>, action: Action) -> Self {
        Self {
            due,
            id: next_callback_id(),
            label: label.into(),
            action,
        }
    }

    /// Returns the time at which this callback becomes due.
    #[must_use]
    pub const fn due(&self) -> Time {
        self.due
    }

    /// Returns this callback's sequence number.
    #[must_use]
    pub const fn id(&self) -> CallbackId {
        self.id
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true if this callback is due at `at` (due time not after `at`).
    #[must_use]
    pub fn is_due_at(&self, at: Time) -> bool {
        self.due <= at
    }

    /// Runs the action, consuming the callback.
    pub fn invoke(self) {
        (self.action)();
    }

    /// Extracts the action without running it.
    #[must_use]
    pub fn into_action(self) -> Action {
        self.action
    }

    /// Read-only projection of this callback relative to `now`.
    #[must_use]
    pub fn pending(&self, now: Time) -> PendingCallback {
        PendingCallback {
            id: self.id,
            when: self.due.diff_secs(now),
            description: self.label.to_string(),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("id", &self.id)
            .field("due", &self.due)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Callback {}

impl Ord for Callback {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Callback {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Snapshot of one pending callback, for introspection.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PendingCallback {
    /// Sequence number of the callback.
    pub id: CallbackId,
    /// Seconds from the listing's "now" until the callback is due.
    /// Negative when the callback is already overdue.
    pub when: f64,
    /// Human-readable description.
    pub description: String,
}
