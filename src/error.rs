//! Error types.
//!
//! Scheduling itself has no error paths: an empty registry, a callback that
//! is not yet due, or an interrupted wait are all ordinary return values.
//! The only fallible surface is configuration, reported as [`ConfigError`].

use std::path::PathBuf;

/// Error raised while loading or validating a
/// [`RegistryConfig`](crate::config::RegistryConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but cannot be parsed.
    #[error("invalid value for {var}: expected {expected}, got {value:?}")]
    InvalidEnv {
        /// Name of the environment variable.
        var: &'static str,
        /// The raw value found in the environment.
        value: String,
        /// Description of what was expected.
        expected: &'static str,
    },

    /// A configuration field holds a value the registry cannot use.
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// Name of the configuration field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Creates an [`ConfigError::InvalidValue`] error.
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
