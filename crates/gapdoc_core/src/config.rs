//! Document configuration.
//!
//! Values come from defaults, environment variables, or a JSON settings
//! blob. Missing or unparsable values fall back to the defaults.

use crate::constants::{DEFAULT_GAP_BUFFER_CAPACITY, LINE_CAPACITY_ENV, TRIM_ON_RESET_ENV};
use crate::error::Result;
use serde::Deserialize;
use std::env;

/// Tunables for a [`TextDocument`](crate::TextDocument).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capacity floor of the line store.
    pub initial_line_capacity: usize,
    /// Release spare line and history storage when a document is replaced.
    pub trim_on_reset: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_line_capacity: DEFAULT_GAP_BUFFER_CAPACITY,
            trim_on_reset: true,
        }
    }
}

/// Parse a user-provided boolean flag value.
///
/// # Returns
/// `Some(true)` or `Some(false)` for recognized values, `None` otherwise.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment, using `default` when the
/// variable is missing or unrecognized.
pub fn env_flag_enabled(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from `GAPDOC_*` environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_line_capacity: env::var(LINE_CAPACITY_ENV)
                .ok()
                .and_then(|value| value.trim().parse().ok())
                .filter(|&capacity: &usize| capacity > 0)
                .unwrap_or(defaults.initial_line_capacity),
            trim_on_reset: env_flag_enabled(TRIM_ON_RESET_ENV, defaults.trim_on_reset),
        }
    }

    /// Parse a JSON settings object. Absent fields keep their defaults.
    ///
    /// # Errors
    /// Returns [`DocumentError::Config`](crate::DocumentError::Config) when the
    /// JSON is malformed or a field has the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
