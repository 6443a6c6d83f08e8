//! Common types and utilities for nitzsync
//!
//! This crate provides the shared error type, logging setup, configuration
//! structures, and the NITZ time-signal value types used across all
//! nitzsync crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod signal;

pub use config::NitzConfig;
pub use error::{Error, Result};
pub use logging::{init_logging, init_logging_with_filter, LogLevel};
pub use signal::{TimeSignal, TimestampedSignal, MAX_ZONE_OFFSET_MILLIS};
