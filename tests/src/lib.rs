//! Integration test framework for nitzsync
//!
//! This crate provides test utilities and fake collaborators for
//! integration testing of the NITZ resolution engine.
//!
//! # Components
//!
//! - [`test_fixtures`] - fake `DeviceState` / `TimeCommitSink`
//!   implementations and signal builders
//! - [`test_utils`] - utility functions for test setup
//!
//! # Test Categories
//!
//! 1. **NITZ scenarios** - hysteresis behavior over sequences of signals
//! 2. **Country scenarios** - country known/unknown transitions and
//!    re-evaluation of previously accepted signals
//! 3. **Task scenarios** - event delivery through the async engine task


pub use test_fixtures::{
    nitz_signal, nitz_signal_with_hint, FakeDeviceState, RecordingSink, HOUR, WINTER_NOON_UTC,
};
pub use test_utils::init_test_logging;
