//! Configuration structures for nitzsync
//!
//! This module provides the NITZ update policy configuration: the
//! hysteresis thresholds that gate device-time commits and the
//! administrative ignore-NITZ override.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default minimum time difference required to commit a time update, in
/// milliseconds.
pub const DEFAULT_UPDATE_DIFF_MS: i64 = 2_000;

/// Default maximum spacing between time commits before a resync is forced,
/// in milliseconds (10 minutes).
pub const DEFAULT_UPDATE_SPACING_MS: i64 = 600_000;

/// NITZ update policy configuration.
///
/// Controls the hysteresis applied to network time signals:
/// small corrections below `update_diff_ms` are suppressed, while
/// `update_spacing_ms` bounds how stale the committed time may become
/// before a resync is forced regardless of drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NitzConfig {
    /// Minimum drift (milliseconds) between the candidate time and the
    /// projected committed time required to accept a time update.
    #[serde(default = "default_update_diff_ms")]
    pub update_diff_ms: i64,
    /// Maximum elapsed time (milliseconds) since the last commit after
    /// which a time update is accepted even with zero drift.
    #[serde(default = "default_update_spacing_ms")]
    pub update_spacing_ms: i64,
    /// Administrative override: discard all incoming NITZ signals.
    #[serde(default)]
    pub ignore_nitz: bool,
}

fn default_update_diff_ms() -> i64 {
    DEFAULT_UPDATE_DIFF_MS
}

fn default_update_spacing_ms() -> i64 {
    DEFAULT_UPDATE_SPACING_MS
}

impl Default for NitzConfig {
    fn default() -> Self {
        Self {
            update_diff_ms: DEFAULT_UPDATE_DIFF_MS,
            update_spacing_ms: DEFAULT_UPDATE_SPACING_MS,
            ignore_nitz: false,
        }
    }
}

impl NitzConfig {
    /// Loads a configuration from a YAML file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: NitzConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the hysteresis thresholds.
    ///
    /// Both thresholds must be non-negative: a negative diff would accept
    /// every signal and a negative spacing would force a resync on every
    /// signal, defeating the hysteresis entirely.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a negative threshold.
    pub fn validate(&self) -> Result<()> {
        if self.update_diff_ms < 0 {
            return Err(Error::Config(format!(
                "update_diff_ms must be non-negative, got {}",
                self.update_diff_ms
            )));
        }
        if self.update_spacing_ms < 0 {
            return Err(Error::Config(format!(
                "update_spacing_ms must be non-negative, got {}",
                self.update_spacing_ms
            )));
        }
        Ok(())
    }
}

impl fmt::Display for NitzConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NitzConfig[diff={}ms, spacing={}ms, ignore={}]",
            self.update_diff_ms, self.update_spacing_ms, self.ignore_nitz
        )
    }
}
