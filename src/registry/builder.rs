//! Builder for [`CallbackRegistry`].
//!
//! ```
//! use deferral::{OwnerThread, RegistryBuilder, VirtualClock};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let registry = RegistryBuilder::new()
//!     .clock(Arc::new(VirtualClock::new()))
//!     .max_wait_slice(Duration::from_millis(500))
//!     .consumer_role(OwnerThread::current())
//!     .build()
//!     .unwrap();
//! assert!(registry.is_empty());
//! ```

use super::interrupt::{InterruptCheck, NeverInterrupt};
use super::role::{AnyThread, ConsumerRole};
use super::CallbackRegistry;
use crate::config::{apply_env_overrides, RegistryConfig};
use crate::error::ConfigError;
use crate::time::{TimeSource, WallClock};
use std::sync::Arc;
use std::time::Duration;

/// Move-based builder for a [`CallbackRegistry`].
///
/// Programmatic settings win over environment variables, which win over the
/// base config (defaults, or whatever [`config`](Self::config) supplied).
pub struct RegistryBuilder<T: TimeSource = WallClock> {
    clock: Arc<T>,
    config: RegistryConfig,
    from_env: bool,
    max_wait_slice: Option<Duration>,
    unbounded_wait_secs: Option<f64>,
    interrupt: Arc<dyn InterruptCheck>,
    role: Arc<dyn ConsumerRole>,
}

impl RegistryBuilder<WallClock> {
    /// Starts a builder on a fresh [`WallClock`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(WallClock::new()),
            config: RegistryConfig::default(),
            from_env: false,
            max_wait_slice: None,
            unbounded_wait_secs: None,
            interrupt: Arc::new(NeverInterrupt),
            role: Arc::new(AnyThread),
        }
    }
}

impl Default for RegistryBuilder<WallClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeSource> RegistryBuilder<T> {
    /// Uses `clock` as the registry's time source.
    #[must_use]
    pub fn clock<U: TimeSource>(self, clock: Arc<U>) -> RegistryBuilder<U> {
        RegistryBuilder {
            clock,
            config: self.config,
            from_env: self.from_env,
            max_wait_slice: self.max_wait_slice,
            unbounded_wait_secs: self.unbounded_wait_secs,
            interrupt: self.interrupt,
            role: self.role,
        }
    }

    /// Replaces the base configuration.
    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Applies `DEFERRAL_*` environment overrides at build time.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    /// Sets the longest single sleep inside `wait`.
    #[must_use]
    pub fn max_wait_slice(mut self, slice: Duration) -> Self {
        self.max_wait_slice = Some(slice);
        self
    }

    /// Sets the timeout used when `wait` is given a negative one.
    #[must_use]
    pub fn unbounded_wait_secs(mut self, secs: f64) -> Self {
        self.unbounded_wait_secs = Some(secs);
        self
    }

    /// Installs the interrupt source polled between wait slices.
    #[must_use]
    pub fn interrupt(mut self, interrupt: impl InterruptCheck + 'static) -> Self {
        self.interrupt = Arc::new(interrupt);
        self
    }

    /// Installs the oracle for consumer-only operations.
    #[must_use]
    pub fn consumer_role(mut self, role: impl ConsumerRole + 'static) -> Self {
        self.role = Arc::new(role);
        self
    }

    /// Resolves and validates the configuration, then creates the registry.
    pub fn build(self) -> Result<CallbackRegistry<T>, ConfigError> {
        let mut config = self.config;
        if self.from_env {
            apply_env_overrides(&mut config)?;
        }
        if let Some(slice) = self.max_wait_slice {
            config.max_wait_slice = slice;
        }
        if let Some(secs) = self.unbounded_wait_secs {
            config.unbounded_wait_secs = secs;
        }
        config.validate()?;
        Ok(CallbackRegistry::from_parts(
            self.clock,
            config,
            self.interrupt,
            self.role,
        ))
    }
}
