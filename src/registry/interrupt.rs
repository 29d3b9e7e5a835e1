//! Polled interruption for long waits.
//!
//! [`CallbackRegistry::wait`](super::CallbackRegistry::wait) sleeps in
//! bounded slices and consults an [`InterruptCheck`] before each one. When
//! the check reports an interrupt the wait returns
//! [`WaitOutcome::Interrupted`](super::WaitOutcome::Interrupted) instead of
//! sleeping again.
//!
//! The check runs while the registry lock is held, so implementations must
//! be cheap and must not call back into the registry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Source of external interrupt requests.
pub trait InterruptCheck: Send + Sync {
    /// Returns true if the current wait should stop.
    fn interrupt_requested(&self) -> bool;
}

/// An interrupt source that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverInterrupt;

impl InterruptCheck for NeverInterrupt {
    fn interrupt_requested(&self) -> bool {
        false
    }
}

/// A shareable flag that any thread can raise.
///
/// Raising the flag is observed at the next slice boundary. Pair it with
/// [`CallbackRegistry::wake`](super::CallbackRegistry::wake) to cut the
/// current slice short.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Creates a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests an interrupt.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Lowers the flag so later waits run normally.
    pub fn clear(&self) {
        self.raised.store(false, Ordering::Release);
    }

    /// Returns true if the flag is raised.
    #[must_use]
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

impl InterruptCheck for InterruptFlag {
    fn interrupt_requested(&self) -> bool {
        self.is_raised()
    }
}
