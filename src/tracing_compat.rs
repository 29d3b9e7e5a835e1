//! Tracing compatibility layer for structured logging.
//!
//! This module provides one import path for the registry's log macros that
//! works whether or not the `tracing-integration` feature is enabled:
//!
//! - **With feature enabled** (the default): re-exports from the `tracing` crate.
//! - **Without feature**: no-op macros that expand to nothing.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::tracing_compat::{debug, trace};
//!
//! trace!(id = %callback.id(), due = %callback.due(), "callback enqueued");
//! debug!(slice_ms = 2000, "waiting for next due callback");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace, warn};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    //! No-op implementations when tracing is disabled.

    /// No-op trace-level logging macro.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug-level logging macro.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info-level logging macro.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op warn-level logging macro.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op error-level logging macro.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    pub use crate::{debug, error, info, trace, warn};
}

#[cfg(not(feature = "tracing-integration"))]
pub use noop::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_accept_structured_fields() {
        let id = 7_u64;
        trace!(id = id, "trace with field");
        debug!(id = %id, "debug with display field");
        info!("plain info");
        warn!(pending = 3, "warn with field");
        error!(?id, "error with debug field");
    }
}
