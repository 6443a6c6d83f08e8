//! NITZ time-signal value types
//!
//! A NITZ (Network Identity and Time Zone) message carries the current
//! time and the local UTC/DST offsets as observed by the serving network.
//! This module provides two immutable value types:
//!
//! - [`TimeSignal`]: the validated payload of a single NITZ message
//! - [`TimestampedSignal`]: a `TimeSignal` paired with its receipt instant
//!   on the device monotonic clock and an explicit signal age
//!
//! Construction validates offsets and rejects malformed signals; a stored
//! signal is never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum representable zone offset from UTC: 18 hours in milliseconds.
///
/// This bounds both the standard offset and the combined standard + DST
/// offset, matching the widest offsets the IANA database can express.
pub const MAX_ZONE_OFFSET_MILLIS: i64 = 18 * 60 * 60 * 1000;

/// A validated time signal received from the network.
///
/// `current_time_millis` is the absolute instant implied by the signal
/// **as of signal generation**. Signal age never modifies this value; it
/// only shifts how the signal maps onto the monotonic clock (see
/// [`TimestampedSignal`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignal {
    /// Standard offset from UTC in milliseconds (signed).
    utc_offset_millis: i64,
    /// DST offset in milliseconds (signed, 0 when DST is not in effect).
    dst_offset_millis: i64,
    /// Absolute time implied by the signal, in milliseconds since the
    /// Unix epoch, as of signal generation.
    current_time_millis: i64,
    /// Zone identifier hint supplied only in emulator/test contexts.
    emulator_zone_hint: Option<String>,
}

impl TimeSignal {
    /// Creates a new time signal, validating the offsets and the time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignal`] if `current_time_millis` is
    /// negative, or if the standard offset or the combined standard + DST
    /// offset falls outside ±18 hours.
    pub fn new(
        utc_offset_millis: i64,
        dst_offset_millis: i64,
        current_time_millis: i64,
        emulator_zone_hint: Option<String>,
    ) -> Result<Self> {
        if current_time_millis < 0 {
            return Err(Error::InvalidSignal(format!(
                "negative current time: {current_time_millis}"
            )));
        }
        if utc_offset_millis.abs() > MAX_ZONE_OFFSET_MILLIS {
            return Err(Error::InvalidSignal(format!(
                "UTC offset out of range: {utc_offset_millis}"
            )));
        }
        let total = utc_offset_millis + dst_offset_millis;
        if total.abs() > MAX_ZONE_OFFSET_MILLIS {
            return Err(Error::InvalidSignal(format!(
                "total offset out of range: {total}"
            )));
        }
        Ok(Self {
            utc_offset_millis,
            dst_offset_millis,
            current_time_millis,
            emulator_zone_hint,
        })
    }

    /// Returns the standard offset from UTC in milliseconds.
    pub fn utc_offset_millis(&self) -> i64 {
        self.utc_offset_millis
    }

    /// Returns the DST offset in milliseconds.
    pub fn dst_offset_millis(&self) -> i64 {
        self.dst_offset_millis
    }

    /// Returns the combined standard + DST offset in milliseconds.
    pub fn total_offset_millis(&self) -> i64 {
        self.utc_offset_millis + self.dst_offset_millis
    }

    /// Returns the absolute time implied by the signal as of generation.
    pub fn current_time_millis(&self) -> i64 {
        self.current_time_millis
    }

    /// Returns the emulator zone hint, if any.
    pub fn emulator_zone_hint(&self) -> Option<&str> {
        self.emulator_zone_hint.as_deref()
    }
}

impl fmt::Display for TimeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimeSignal[utc={}ms, dst={}ms, time={}ms",
            self.utc_offset_millis, self.dst_offset_millis, self.current_time_millis
        )?;
        if let Some(hint) = &self.emulator_zone_hint {
            write!(f, ", hint={hint}")?;
        }
        write!(f, "]")
    }
}

/// A time signal together with its receipt instant and age.
///
/// `receipt_instant_millis` is the monotonic clock reading when the signal
/// arrived; `age_millis` is the delay between signal generation upstream
/// and receipt (e.g. modem buffering). The derived
/// [`effective_receipt_instant_millis`](Self::effective_receipt_instant_millis)
/// is the monotonic instant that `current_time_millis` corresponds to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimestampedSignal {
    receipt_instant_millis: i64,
    signal: TimeSignal,
    age_millis: i64,
}

impl TimestampedSignal {
    /// Creates a new timestamped signal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignal`] if `age_millis` is negative.
    pub fn new(receipt_instant_millis: i64, signal: TimeSignal, age_millis: i64) -> Result<Self> {
        if age_millis < 0 {
            return Err(Error::InvalidSignal(format!(
                "negative signal age: {age_millis}"
            )));
        }
        Ok(Self {
            receipt_instant_millis,
            signal,
            age_millis,
        })
    }

    /// Returns the monotonic clock reading when the signal arrived.
    pub fn receipt_instant_millis(&self) -> i64 {
        self.receipt_instant_millis
    }

    /// Returns the signal payload.
    pub fn signal(&self) -> &TimeSignal {
        &self.signal
    }

    /// Returns the age of the signal at receipt, in milliseconds.
    pub fn age_millis(&self) -> i64 {
        self.age_millis
    }

    /// Returns the monotonic instant the signal's time corresponds to.
    ///
    /// This is `receipt_instant_millis - age_millis`: the point on the
    /// monotonic clock at which the signal was generated.
    pub fn effective_receipt_instant_millis(&self) -> i64 {
        self.receipt_instant_millis - self.age_millis
    }
}

impl fmt::Display for TimestampedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TimestampedSignal[receipt={}ms, age={}ms, {}]",
            self.receipt_instant_millis, self.age_millis, self.signal
        )
    }
}
