//! NITZ time and time-zone resolution state machine
//!
//! This crate reconciles network time signals (NITZ), country identity
//! events and device hysteresis settings into device time / time-zone
//! commits, while avoiding update thrashing.
//!
//! # Components
//!
//! - [`device`] - injected collaborator traits ([`DeviceState`],
//!   [`TimeCommitSink`]) and their production implementations
//! - [`engine`] - the [`ResolutionEngine`] state machine
//! - [`task`] - optional actor-style event task that serializes event
//!   delivery to an engine over a tokio channel
//!
//! # Concurrency model
//!
//! The engine is single-threaded cooperative: events are delivered
//! serially by the caller and run to completion. Zone lookups are pure
//! and synchronous; collaborator calls are assumed non-blocking. No
//! timers live inside the engine: the spacing-based time resync is
//! evaluated lazily on the next received signal.

pub mod device;
pub mod engine;
pub mod task;


pub use device::{DeviceState, SystemDeviceState, TimeCommitSink, TracingCommitSink};
pub use engine::{CommitOutcome, ResolutionEngine};
pub use task::{
    spawn_engine_task, EngineEvent, EngineTask, TaskHandle, TaskMessage, DEFAULT_CHANNEL_CAPACITY,
};
