//! Identifier and timestamp types.
//!
//! - [`CallbackId`]: the process-wide sequence number assigned to every
//!   callback at construction. It breaks ties between equal due times.
//! - [`Time`]: a monotonic instant measured from a clock's epoch.

use core::fmt;

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// A unique identifier for a scheduled callback.
///
/// Identifiers are handed out in construction order from a single
/// process-wide counter, so a lower id always means "constructed earlier".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct CallbackId(u64);

impl CallbackId {
    /// Wraps a raw sequence number.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence number.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallbackId({})", self.0)
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// A monotonic timestamp.
///
/// Signed nanoseconds relative to the epoch of the
/// [`TimeSource`](crate::time::TimeSource) that produced it. With
/// [`WallClock`](crate::time::WallClock) the epoch is the moment the clock was
/// created; with [`VirtualClock`](crate::time::VirtualClock) it is virtual time
/// zero. Instants before the epoch are negative, so "now minus five seconds"
/// on a young clock stays distinct from "now minus one second". Timestamps
/// from different clocks are not comparable.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(i64);

impl Time {
    /// The zero instant (epoch).
    pub const ZERO: Self = Self(0);

    /// The earliest representable instant.
    pub const MIN: Self = Self(i64::MIN);

    /// The latest representable instant.
    pub const MAX: Self = Self(i64::MAX);

    /// Creates a new time from nanoseconds after the epoch.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self::ZERO.saturating_add_nanos(nanos)
    }

    /// Creates a new time from signed nanoseconds relative to the epoch.
    #[must_use]
    pub const fn from_signed_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Creates a new time from milliseconds after the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self::from_nanos(millis.saturating_mul(1_000_000))
    }

    /// Creates a new time from seconds after the epoch.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self::from_nanos(secs.saturating_mul(1_000_000_000))
    }

    /// Returns the time as signed nanoseconds relative to the epoch.
    #[must_use]
    pub const fn as_nanos(self) -> i64 {
        self.0
    }

    /// Returns the time as milliseconds relative to the epoch (truncated).
    #[must_use]
    pub const fn as_millis(self) -> i64 {
        self.0 / 1_000_000
    }

    /// Returns the time as seconds relative to the epoch (truncated).
    #[must_use]
    pub const fn as_secs(self) -> i64 {
        self.0 / 1_000_000_000
    }

    /// Adds a duration in nanoseconds, saturating at [`Time::MAX`].
    #[must_use]
    pub const fn saturating_add_nanos(self, nanos: u64) -> Self {
        Self(self.0.saturating_add_unsigned(nanos))
    }

    /// Subtracts a duration in nanoseconds, saturating at [`Time::MIN`].
    #[must_use]
    pub const fn saturating_sub_nanos(self, nanos: u64) -> Self {
        Self(self.0.saturating_sub_unsigned(nanos))
    }

    /// Shifts this time by a signed number of seconds.
    ///
    /// Negative offsets move backwards, past the epoch if need be. Offsets
    /// beyond the representable range clamp at [`Time::MIN`] or [`Time::MAX`].
    /// A NaN offset is treated as zero.
    #[must_use]
    pub fn saturating_add_secs_f64(self, secs: f64) -> Self {
        if secs.is_nan() {
            return self;
        }
        // `as` saturates float-to-int conversions.
        let nanos = (secs * NANOS_PER_SEC) as i64;
        Self(self.0.saturating_add(nanos))
    }

    /// Returns the duration between two times in nanoseconds.
    ///
    /// Returns 0 if `self` is before `earlier`.
    #[must_use]
    pub const fn duration_since(self, earlier: Self) -> u64 {
        if self.0 > earlier.0 {
            self.0.abs_diff(earlier.0)
        } else {
            0
        }
    }

    /// Returns `self - other` in seconds, negative when `self` is earlier.
    #[must_use]
    pub fn diff_secs(self, other: Self) -> f64 {
        (i128::from(self.0) - i128::from(other.0)) as f64 / NANOS_PER_SEC
    }
}

impl fmt::Debug for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Time({}ns)", self.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let nanos = self.0.unsigned_abs();
        if nanos >= 1_000_000_000 {
            write!(
                f,
                "{sign}{}.{:03}s",
                nanos / 1_000_000_000,
                (nanos / 1_000_000) % 1000
            )
        } else if nanos >= 1_000_000 {
            write!(f, "{sign}{}ms", nanos / 1_000_000)
        } else if nanos >= 1_000 {
            write!(f, "{sign}{}us", nanos / 1_000)
        } else {
            write!(f, "{sign}{nanos}ns")
        }
    }
}
