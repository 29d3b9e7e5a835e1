//! Core types shared by the registry and its clocks.

pub mod id;

pub use id::{CallbackId, Time};
