//! Deferral: a thread-safe registry of timestamp-ordered deferred callbacks.
//!
//! # Overview
//!
//! Any thread may enqueue "run this action no earlier than time T". A single
//! designated consumer drains everything whose due time has arrived, in strict
//! `(due, sequence)` order, and invokes it outside the registry lock. This is
//! the queue behind an event loop whose own work runs cooperatively on one
//! thread while timers, background workers and asynchronous completions live
//! on others.
//!
//! # Core Guarantees
//!
//! - **Total order**: callbacks are ordered by due time, ties broken by a
//!   process-wide sequence number, so equal due times drain in enqueue order
//! - **Atomic drains**: [`CallbackRegistry::take`] pops every due callback
//!   (up to a cap) under a single lock acquisition
//! - **Actions run unlocked**: the registry never invokes an action while it
//!   holds its lock
//! - **Responsive waits**: [`CallbackRegistry::wait`] sleeps in bounded slices
//!   and polls an injected [`InterruptCheck`] between them
//!
//! # Module Structure
//!
//! - [`types`]: `Time` and `CallbackId`
//! - [`time`]: Monotonic time sources (wall clock and virtual clock)
//! - [`registry`]: The callback registry, its queue and its collaborators
//! - [`config`]: Registry configuration and environment overrides
//! - [`error`]: Error types
//! - [`tracing_compat`]: Logging macros that compile away without `tracing`
//!
//! # Example
//!
//! ```
//! use deferral::CallbackRegistry;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let registry = CallbackRegistry::new();
//! let hits = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&hits);
//! registry.add(move || { counter.fetch_add(1, Ordering::SeqCst); }, 0.0);
//!
//! assert!(registry.wait(1.0).is_due());
//! assert_eq!(registry.run_due(0), 1);
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]

pub mod tracing_compat;

#[cfg(test)]
#[macro_use]
mod test_utils;

pub mod config;
pub mod error;
pub mod registry;
pub mod time;
pub mod types;

pub use config::RegistryConfig;
pub use error::ConfigError;
pub use registry::{
    Action, AnyThread, Callback, CallbackRegistry, ConsumerRole, InterruptCheck, InterruptFlag,
    NeverInterrupt, OwnerThread, PendingCallback, RegistryBuilder, WaitOutcome,
};
pub use time::{TimeSource, VirtualClock, WallClock};
pub use types::{CallbackId, Time};
