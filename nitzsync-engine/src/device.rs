//! Collaborator interfaces for the resolution engine
//!
//! The engine never touches the OS clock or persisted settings directly;
//! it consumes a [`DeviceState`] for hysteresis configuration and the
//! monotonic clock, and produces commits into a [`TimeCommitSink`]. Both
//! are injected at construction, so tests substitute doubles without any
//! runtime patching.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use tracing::info;

use nitzsync_common::NitzConfig;

/// Device-side state consumed by the engine.
///
/// Calls must be synchronous and non-blocking; the engine invokes them
/// from within event handling.
pub trait DeviceState {
    /// Returns the current monotonic clock reading in milliseconds.
    ///
    /// The value must be epoch-anchored: hosts seed the monotonic clock
    /// with wall-clock milliseconds so zone offsets evaluated at signal
    /// receipt instants land on the intended calendar date.
    fn monotonic_now_millis(&self) -> i64;

    /// Returns true if incoming NITZ signals must be discarded.
    fn ignore_nitz(&self) -> bool;

    /// Returns the minimum drift required to commit a time update.
    fn nitz_update_diff_millis(&self) -> i64;

    /// Returns the maximum spacing between time commits before a resync
    /// is forced regardless of drift.
    fn nitz_update_spacing_millis(&self) -> i64;
}

/// Receiver of committed device-time and device-time-zone values.
///
/// Implementations must not block the event-processing path; a sink that
/// needs I/O queues the work itself.
pub trait TimeCommitSink {
    /// Commits a new device time, in milliseconds since the Unix epoch.
    fn set_time(&mut self, millis: i64);

    /// Commits a new device time zone.
    fn set_time_zone(&mut self, zone_id: &str);
}

/// Production [`DeviceState`] backed by a [`NitzConfig`] and the process
/// monotonic clock, anchored to the wall clock at construction.
#[derive(Debug, Clone)]
pub struct SystemDeviceState {
    config: NitzConfig,
    epoch_anchor_millis: i64,
    started: Instant,
}

impl SystemDeviceState {
    /// Creates a new device state from the given configuration.
    pub fn new(config: NitzConfig) -> Self {
        let epoch_anchor_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or_default();
        Self {
            config,
            epoch_anchor_millis,
            started: Instant::now(),
        }
    }

    /// Returns the configuration this device state was built from.
    pub fn config(&self) -> &NitzConfig {
        &self.config
    }
}

impl Default for SystemDeviceState {
    fn default() -> Self {
        Self::new(NitzConfig::default())
    }
}

impl DeviceState for SystemDeviceState {
    fn monotonic_now_millis(&self) -> i64 {
        self.epoch_anchor_millis + self.started.elapsed().as_millis() as i64
    }

    fn ignore_nitz(&self) -> bool {
        self.config.ignore_nitz
    }

    fn nitz_update_diff_millis(&self) -> i64 {
        self.config.update_diff_ms
    }

    fn nitz_update_spacing_millis(&self) -> i64 {
        self.config.update_spacing_ms
    }
}

/// A [`TimeCommitSink`] that only logs commits.
///
/// Useful as a placeholder while wiring the engine into a host that has
/// not yet connected its clock persistence.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCommitSink;

impl TimeCommitSink for TracingCommitSink {
    fn set_time(&mut self, millis: i64) {
        info!("commit device time: {millis}ms");
    }

    fn set_time_zone(&mut self, zone_id: &str) {
        info!("commit device time zone: {zone_id}");
    }
}
