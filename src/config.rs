//! Registry configuration.
//!
//! # Defaults
//!
//! | Field | Default |
//! |-------|---------|
//! | `max_wait_slice` | 2 s |
//! | `unbounded_wait_secs` | 3e10 s (roughly a thousand years) |
//!
//! # Configuration Precedence
//!
//! Settings are resolved in this order (highest priority first):
//!
//! 1. **Programmatic**: values set via [`RegistryBuilder`](crate::RegistryBuilder) methods
//! 2. **Environment variables**: values from `DEFERRAL_*` env vars
//! 3. **Config file**: values loaded from a TOML file (requires `config-file` feature)
//! 4. **Defaults**: [`RegistryConfig::default()`]
//!
//! # Supported Environment Variables
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `DEFERRAL_MAX_WAIT_SLICE_MS` | `u64` | `max_wait_slice` |
//! | `DEFERRAL_UNBOUNDED_WAIT_SECS` | `f64` | `unbounded_wait_secs` |

use crate::error::ConfigError;
use std::time::Duration;

/// Environment variable name for the longest single wait slice, in milliseconds.
pub const ENV_MAX_WAIT_SLICE_MS: &str = "DEFERRAL_MAX_WAIT_SLICE_MS";
/// Environment variable name for the timeout used when `wait` is given a negative one.
pub const ENV_UNBOUNDED_WAIT_SECS: &str = "DEFERRAL_UNBOUNDED_WAIT_SECS";

/// Default longest single condition-variable sleep inside `wait`.
pub const DEFAULT_MAX_WAIT_SLICE: Duration = Duration::from_secs(2);
/// Default timeout substituted for a negative `wait` timeout.
pub const DEFAULT_UNBOUNDED_WAIT_SECS: f64 = 3e10;

/// Tuning knobs for a [`CallbackRegistry`](crate::CallbackRegistry).
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Longest time `wait` blocks before re-checking its interrupt source.
    pub max_wait_slice: Duration,
    /// Timeout, in seconds, that replaces a negative `wait` timeout.
    ///
    /// Finite so the wait loop still terminates in a bounded number of slices.
    pub unbounded_wait_secs: f64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_wait_slice: DEFAULT_MAX_WAIT_SLICE,
            unbounded_wait_secs: DEFAULT_UNBOUNDED_WAIT_SECS,
        }
    }
}

impl RegistryConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_wait_slice.is_zero() {
            return Err(ConfigError::invalid_value(
                "max_wait_slice",
                "must be greater than zero",
            ));
        }
        if !self.unbounded_wait_secs.is_finite() || self.unbounded_wait_secs <= 0.0 {
            return Err(ConfigError::invalid_value(
                "unbounded_wait_secs",
                format!(
                    "must be finite and positive, got {}",
                    self.unbounded_wait_secs
                ),
            ));
        }
        Ok(())
    }
}

/// Apply environment variable overrides to a [`RegistryConfig`].
///
/// Only variables that are set in the environment are applied.
/// Returns an error if a variable is set but contains an unparseable value.
pub fn apply_env_overrides(config: &mut RegistryConfig) -> Result<(), ConfigError> {
    if let Some(val) = read_env(ENV_MAX_WAIT_SLICE_MS) {
        config.max_wait_slice = Duration::from_millis(parse_u64(ENV_MAX_WAIT_SLICE_MS, &val)?);
    }
    if let Some(val) = read_env(ENV_UNBOUNDED_WAIT_SECS) {
        config.unbounded_wait_secs = parse_f64(ENV_UNBOUNDED_WAIT_SECS, &val)?;
    }
    Ok(())
}

fn read_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_u64(var: &'static str, val: &str) -> Result<u64, ConfigError> {
    val.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidEnv {
            var,
            value: val.to_string(),
            expected: "unsigned integer",
        })
}

fn parse_f64(var: &'static str, val: &str) -> Result<f64, ConfigError> {
    val.trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidEnv {
            var,
            value: val.to_string(),
            expected: "number",
        })
}

// =========================================================================
// TOML config file support (feature-gated)
// =========================================================================

/// TOML-deserializable registry configuration.
///
/// ```toml
/// [wait]
/// max_slice_ms = 2000
/// unbounded_secs = 3e10
/// ```
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct RegistryTomlConfig {
    /// Wait loop settings.
    #[serde(default)]
    pub wait: WaitToml,
}

/// Wait section of the TOML config.
#[cfg(feature = "config-file")]
#[derive(serde::Deserialize, Default, Debug)]
pub struct WaitToml {
    /// Longest single wait slice in milliseconds.
    pub max_slice_ms: Option<u64>,
    /// Timeout used for negative `wait` timeouts, in seconds.
    pub unbounded_secs: Option<f64>,
}

/// Apply a parsed TOML config to a [`RegistryConfig`].
///
/// Only fields that are `Some` in the TOML struct override the config.
#[cfg(feature = "config-file")]
pub fn apply_toml_config(config: &mut RegistryConfig, toml: &RegistryTomlConfig) {
    if let Some(ms) = toml.wait.max_slice_ms {
        config.max_wait_slice = Duration::from_millis(ms);
    }
    if let Some(secs) = toml.wait.unbounded_secs {
        config.unbounded_wait_secs = secs;
    }
}

/// Parse a TOML string into a [`RegistryTomlConfig`].
#[cfg(feature = "config-file")]
pub fn parse_toml_str(toml_str: &str) -> Result<RegistryTomlConfig, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Read and parse a TOML file into a [`RegistryTomlConfig`].
#[cfg(feature = "config-file")]
pub fn parse_toml_file(path: &std::path::Path) -> Result<RegistryTomlConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_toml_str(&content)
}

/// Load a config from a TOML file, then apply environment overrides on top.
#[cfg(feature = "config-file")]
pub fn load_file_with_env(path: &std::path::Path) -> Result<RegistryConfig, ConfigError> {
    let mut config = RegistryConfig::default();
    apply_toml_config(&mut config, &parse_toml_file(path)?);
    apply_env_overrides(&mut config)?;
    Ok(config)
}
