//! The consumer-role precondition.
//!
//! Draining, waiting and listing are reserved for the single consumer that
//! feeds the host's cooperative execution model. The registry cannot know
//! which thread that is, so the host injects a [`ConsumerRole`] oracle.
//! A violation is a programmer error: it is logged, and in debug builds it
//! panics.

use std::thread::{self, ThreadId};

/// Answers "is the calling thread allowed to act as the consumer?".
pub trait ConsumerRole: Send + Sync {
    /// Returns true if the current thread may call consumer-only operations.
    fn is_consumer(&self) -> bool;
}

/// Every thread may act as the consumer (serially). The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyThread;

impl ConsumerRole for AnyThread {
    fn is_consumer(&self) -> bool {
        true
    }
}

/// Only one specific thread may act as the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerThread {
    owner: ThreadId,
}

impl OwnerThread {
    /// Binds the consumer role to `owner`.
    #[must_use]
    pub const fn new(owner: ThreadId) -> Self {
        Self { owner }
    }

    /// Binds the consumer role to the calling thread.
    #[must_use]
    pub fn current() -> Self {
        Self::new(thread::current().id())
    }

    /// Returns the thread that owns the consumer role.
    #[must_use]
    pub const fn owner(&self) -> ThreadId {
        self.owner
    }
}

impl ConsumerRole for OwnerThread {
    fn is_consumer(&self) -> bool {
        thread::current().id() == self.owner
    }
}
