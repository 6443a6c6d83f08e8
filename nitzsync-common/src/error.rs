//! Error types for nitzsync

use thiserror::Error;

/// Error types for the nitzsync library.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed time signal rejected at construction.
    #[error("Invalid time signal: {0}")]
    InvalidSignal(String),

    /// Country code not present in the zone database.
    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    /// No candidate time zone is consistent with the signal.
    #[error("No zone match: {0}")]
    NoZoneMatch(String),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for nitzsync operations.
pub type Result<T> = std::result::Result<T, Error>;
