//! Monotonic time sources.
//!
//! The registry orders callbacks by [`Time`] values drawn from a
//! [`TimeSource`]. Production code uses [`WallClock`], which is built on
//! `std::time::Instant` and therefore immune to wall-clock adjustments.
//! Tests use [`VirtualClock`], which only moves when told to.

use crate::types::Time;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

/// Time source abstraction for getting the current time.
pub trait TimeSource: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Time;
}

/// Monotonic wall clock time source for production use.
///
/// The epoch is the instant this source was created.
#[derive(Debug)]
pub struct WallClock {
    epoch: Instant,
}

impl WallClock {
    /// Creates a new wall clock time source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    /// Returns the `Instant` this clock measures from.
    #[must_use]
    pub const fn epoch(&self) -> Instant {
        self.epoch
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn now(&self) -> Time {
        let elapsed = self.epoch.elapsed();
        Time::from_nanos(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
    }
}

/// Virtual time source for deterministic tests.
///
/// # Example
///
/// ```
/// use deferral::time::{TimeSource, VirtualClock};
/// use deferral::types::Time;
///
/// let clock = VirtualClock::new();
/// assert_eq!(clock.now(), Time::ZERO);
///
/// clock.advance(1_000_000_000); // 1 second
/// assert_eq!(clock.now(), Time::from_secs(1));
/// ```
#[derive(Debug)]
pub struct VirtualClock {
    /// Current time in nanoseconds.
    now: AtomicI64,
}

impl VirtualClock {
    /// Creates a new virtual clock starting at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: AtomicI64::new(0),
        }
    }

    /// Creates a virtual clock starting at the given time.
    #[must_use]
    pub const fn starting_at(time: Time) -> Self {
        Self {
            now: AtomicI64::new(time.as_nanos()),
        }
    }

    /// Advances time by the given number of nanoseconds.
    pub fn advance(&self, nanos: u64) {
        let _ = self
            .now
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_add_unsigned(nanos))
            });
    }

    /// Advances time by a [`Duration`].
    pub fn advance_by(&self, duration: Duration) {
        self.advance(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX));
    }

    /// Advances time to the given absolute time.
    ///
    /// If the target time is in the past, this is a no-op.
    pub fn advance_to(&self, time: Time) {
        self.now.fetch_max(time.as_nanos(), Ordering::AcqRel);
    }

    /// Sets the current time, possibly moving backwards.
    pub fn set(&self, time: Time) {
        self.now.store(time.as_nanos(), Ordering::Release);
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for VirtualClock {
    fn now(&self) -> Time {
        Time::from_signed_nanos(self.now.load(Ordering::Acquire))
    }
}
