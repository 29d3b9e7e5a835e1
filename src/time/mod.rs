//! Time sources for the callback registry.
//!
//! The registry never reads the system clock directly. It asks a
//! [`TimeSource`] for "now", which lets production code run on a monotonic
//! [`WallClock`] and tests run on a manually advanced [`VirtualClock`].
//!
//! # Example
//!
//! ```
//! use deferral::time::{TimeSource, WallClock};
//!
//! let clock = WallClock::new();
//! let start = clock.now();
//! assert!(clock.now() >= start);
//! ```

mod source;

pub use source::{TimeSource, VirtualClock, WallClock};
