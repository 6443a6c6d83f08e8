//! Engine Event Task
//!
//! The engine itself is synchronous and single-threaded; this module
//! provides the serializing event queue a host hangs in front of it. An
//! [`EngineTask`] owns a [`ResolutionEngine`] and drains a tokio channel
//! of [`EngineEvent`]s, processing each to completion before the next.
//!
//! Hosts that deliver events synchronously can ignore this module and
//! call the engine directly.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use nitzsync_common::TimestampedSignal;
use nitzsync_zonedb::ZoneLookup;

use crate::device::{DeviceState, TimeCommitSink};
use crate::engine::ResolutionEngine;

/// Default channel capacity for the engine event queue.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Events accepted by the resolution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A new NITZ signal was received from the network.
    NitzReceived(TimestampedSignal),
    /// The network country became known.
    CountryAvailable(String),
    /// The network country became unknown.
    CountryUnavailable,
}

/// Task message envelope wrapping events with control signals.
#[derive(Debug)]
pub enum TaskMessage<T> {
    /// Regular message payload
    Message(T),
    /// Shutdown signal - task should terminate gracefully
    Shutdown,
}

impl<T> TaskMessage<T> {
    /// Creates a new message envelope containing the given payload.
    pub fn message(msg: T) -> Self {
        TaskMessage::Message(msg)
    }

    /// Creates a shutdown signal.
    pub fn shutdown() -> Self {
        TaskMessage::Shutdown
    }

    /// Returns true if this is a shutdown signal.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, TaskMessage::Shutdown)
    }

    /// Returns the message payload if present, or None for shutdown.
    pub fn into_message(self) -> Option<T> {
        match self {
            TaskMessage::Message(msg) => Some(msg),
            TaskMessage::Shutdown => None,
        }
    }
}

/// Handle for sending events to an engine task.
///
/// This is a wrapper around `mpsc::Sender` that provides convenient
/// methods for sending events and the shutdown signal.
#[derive(Debug)]
pub struct TaskHandle<T> {
    tx: mpsc::Sender<TaskMessage<T>>,
}

impl<T> Clone for TaskHandle<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> TaskHandle<T> {
    /// Creates a new task handle from a sender.
    pub fn new(tx: mpsc::Sender<TaskMessage<T>>) -> Self {
        Self { tx }
    }

    /// Sends a message to the task.
    ///
    /// Returns an error if the task has been dropped.
    pub async fn send(&self, msg: T) -> Result<(), mpsc::error::SendError<TaskMessage<T>>> {
        self.tx.send(TaskMessage::Message(msg)).await
    }

    /// Sends a message to the task without waiting.
    ///
    /// Returns an error if the channel is full or the task has been
    /// dropped.
    pub fn try_send(&self, msg: T) -> Result<(), mpsc::error::TrySendError<TaskMessage<T>>> {
        self.tx.try_send(TaskMessage::Message(msg))
    }

    /// Sends a shutdown signal to the task.
    pub async fn shutdown(&self) -> Result<(), mpsc::error::SendError<TaskMessage<T>>> {
        self.tx.send(TaskMessage::Shutdown).await
    }

    /// Returns true if the task channel is closed.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// An actor wrapping a [`ResolutionEngine`] behind an event channel.
#[derive(Debug)]
pub struct EngineTask<D, S, Z> {
    engine: ResolutionEngine<D, S, Z>,
}

impl<D, S, Z> EngineTask<D, S, Z>
where
    D: DeviceState,
    S: TimeCommitSink,
    Z: ZoneLookup,
{
    /// Creates a new task around the given engine.
    pub fn new(engine: ResolutionEngine<D, S, Z>) -> Self {
        Self { engine }
    }

    /// Runs the event loop until shutdown or channel closure, processing
    /// each event to completion before the next.
    ///
    /// Returns the engine so the owner can inspect its final state.
    pub async fn run(
        mut self,
        mut rx: mpsc::Receiver<TaskMessage<EngineEvent>>,
    ) -> ResolutionEngine<D, S, Z> {
        while let Some(message) = rx.recv().await {
            match message {
                TaskMessage::Message(event) => self.handle_event(event),
                TaskMessage::Shutdown => {
                    debug!("engine task shutting down");
                    break;
                }
            }
        }
        self.engine
    }

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::NitzReceived(signal) => {
                self.engine.on_nitz_received(signal);
            }
            EngineEvent::CountryAvailable(iso) => {
                self.engine.on_country_available(&iso);
            }
            EngineEvent::CountryUnavailable => {
                self.engine.on_country_unavailable();
            }
        }
    }
}

/// Spawns an engine task onto the tokio runtime.
///
/// Returns the event handle and the join handle; joining yields the
/// engine in its final state.
pub fn spawn_engine_task<D, S, Z>(
    engine: ResolutionEngine<D, S, Z>,
    channel_capacity: usize,
) -> (
    TaskHandle<EngineEvent>,
    JoinHandle<ResolutionEngine<D, S, Z>>,
)
where
    D: DeviceState + Send + 'static,
    S: TimeCommitSink + Send + 'static,
    Z: ZoneLookup + Send + 'static,
{
    let (tx, rx) = mpsc::channel(channel_capacity);
    let handle = TaskHandle::new(tx);
    let join = tokio::spawn(EngineTask::new(engine).run(rx));
    (handle, join)
}
