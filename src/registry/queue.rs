//! The priority collection behind the registry.
//!
//! [`CallbackQueue`] is a min-heap of [`Callback`]s ordered by `(due, id)`.
//! It does no locking of its own: [`CallbackRegistry`](super::CallbackRegistry)
//! owns it behind a mutex, takes the lock once per public operation, and calls
//! these helpers on the guarded value. No helper ever locks.

use super::callback::{Callback, PendingCallback};
use crate::types::Time;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Min-heap of callbacks, earliest `(due, id)` on top.
#[derive(Debug, Default)]
pub struct CallbackQueue {
    heap: BinaryHeap<Reverse<Callback>>,
}

impl CallbackQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of pending callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Inserts a callback.
    pub fn push(&mut self, callback: Callback) {
        self.heap.push(Reverse(callback));
    }

    /// Returns the earliest due time, if any.
    #[must_use]
    pub fn next_due(&self) -> Option<Time> {
        self.heap.peek().map(|Reverse(cb)| cb.due())
    }

    /// Returns true if the earliest callback is due at `at`.
    #[must_use]
    pub fn is_due(&self, at: Time) -> bool {
        self.heap.peek().is_some_and(|Reverse(cb)| cb.is_due_at(at))
    }

    /// Pops every callback due at `at`, in order, stopping after `max`
    /// callbacks when `max` is non-zero.
    pub fn take_due(&mut self, max: usize, at: Time) -> Vec<Callback> {
        let mut taken = Vec::new();
        while max == 0 || taken.len() < max {
            if !self.is_due(at) {
                break;
            }
            match self.heap.pop() {
                Some(Reverse(cb)) => taken.push(cb),
                None => break,
            }
        }
        taken
    }

    /// Projects every pending callback relative to `now`, in drain order,
    /// without removing anything.
    #[must_use]
    pub fn pending(&self, now: Time) -> Vec<PendingCallback> {
        let mut ordered: Vec<&Callback> = self.heap.iter().map(|Reverse(cb)| cb).collect();
        ordered.sort_unstable();
        ordered.into_iter().map(|cb| cb.pending(now)).collect()
    }
}
