//! Async event-delivery scenarios
//!
//! Drives the engine through its tokio event task instead of direct
//! calls, validating that queued delivery preserves ordering semantics.

use integration_tests::{
    init_test_logging, nitz_signal, FakeDeviceState, RecordingSink, HOUR, WINTER_NOON_UTC,
};
use nitzsync_engine::{spawn_engine_task, EngineEvent, ResolutionEngine, DEFAULT_CHANNEL_CAPACITY};
use nitzsync_zonedb::TzdbZoneLookup;

const DIFF: i64 = 2_000;
const SPACING: i64 = 600_000;

/// A full lifecycle delivered over the channel: country, two signals,
/// country loss, shutdown; the joined engine exposes final state.
///
/// The fake clock is shared with the test thread, so it stays fixed
/// while events are in flight: the task drains the queue on its own
/// schedule, and advancing the clock mid-queue would change which "now"
/// each signal is processed against.
#[tokio::test]
async fn test_event_queue_full_lifecycle() {
    init_test_logging();
    tracing::info!("E2E: queued engine lifecycle");

    let device = FakeDeviceState::new(WINTER_NOON_UTC, DIFF, SPACING);
    let sink = RecordingSink::default();
    let engine = ResolutionEngine::new(device, sink.clone(), TzdbZoneLookup::new());
    let (handle, join) = spawn_engine_task(engine, DEFAULT_CHANNEL_CAPACITY);

    handle
        .send(EngineEvent::CountryAvailable("us".to_string()))
        .await
        .unwrap();
    handle
        .send(EngineEvent::NitzReceived(nitz_signal(
            -8 * HOUR,
            WINTER_NOON_UTC,
        )))
        .await
        .unwrap();

    // An exact duplicate right behind it in the queue gets suppressed
    handle
        .send(EngineEvent::NitzReceived(nitz_signal(
            -8 * HOUR,
            WINTER_NOON_UTC,
        )))
        .await
        .unwrap();

    handle.send(EngineEvent::CountryUnavailable).await.unwrap();
    handle.shutdown().await.unwrap();

    let engine = join.await.unwrap();
    assert_eq!(engine.last_committed_zone_id(), Some("America/Los_Angeles"));
    assert_eq!(engine.last_committed_time_millis(), Some(WINTER_NOON_UTC));
    assert!(engine.country_iso().is_none());
    assert!(engine.last_accepted_signal().is_some());
    assert_eq!(sink.times(), vec![WINTER_NOON_UTC]);
    assert_eq!(sink.zones(), vec!["America/Los_Angeles"]);
}

/// Advancing the shared clock is safe once the queue has demonstrably
/// drained: rendezvous on the first commit landing in the sink, then
/// deliver a small correction that the hysteresis gate suppresses.
#[tokio::test]
async fn test_clock_advance_after_commit_rendezvous() {
    init_test_logging();

    let device = FakeDeviceState::new(WINTER_NOON_UTC, DIFF, SPACING);
    let sink = RecordingSink::default();
    let engine = ResolutionEngine::new(device.clone(), sink.clone(), TzdbZoneLookup::new());
    let (handle, join) = spawn_engine_task(engine, DEFAULT_CHANNEL_CAPACITY);

    handle
        .send(EngineEvent::CountryAvailable("us".to_string()))
        .await
        .unwrap();
    handle
        .send(EngineEvent::NitzReceived(nitz_signal(
            -8 * HOUR,
            WINTER_NOON_UTC,
        )))
        .await
        .unwrap();

    // Wait for the task to process the first signal before touching the
    // clock it reads "now" from.
    while sink.times().is_empty() {
        tokio::task::yield_now().await;
    }
    assert_eq!(sink.times(), vec![WINTER_NOON_UTC]);

    device.advance(1_000);
    handle
        .send(EngineEvent::NitzReceived(nitz_signal(
            -8 * HOUR,
            WINTER_NOON_UTC + 1_000,
        )))
        .await
        .unwrap();
    handle.shutdown().await.unwrap();

    let engine = join.await.unwrap();
    // Zero drift, 1s elapsed: below both thresholds, no second commit
    assert_eq!(engine.last_committed_time_millis(), Some(WINTER_NOON_UTC));
    assert_eq!(sink.times(), vec![WINTER_NOON_UTC]);
    assert!(engine.last_accepted_signal().is_some());
}

/// Events from multiple handle clones funnel into one serialized queue.
#[tokio::test]
async fn test_cloned_handles_share_one_queue() {
    init_test_logging();

    let device = FakeDeviceState::new(WINTER_NOON_UTC, DIFF, SPACING);
    let sink = RecordingSink::default();
    let engine = ResolutionEngine::new(device, sink.clone(), TzdbZoneLookup::new());
    let (country_handle, join) = spawn_engine_task(engine, 8);
    let signal_handle = country_handle.clone();

    country_handle
        .send(EngineEvent::CountryAvailable("jp".to_string()))
        .await
        .unwrap();
    signal_handle
        .send(EngineEvent::NitzReceived(nitz_signal(
            9 * HOUR,
            WINTER_NOON_UTC,
        )))
        .await
        .unwrap();
    country_handle.shutdown().await.unwrap();

    let engine = join.await.unwrap();
    assert_eq!(engine.last_committed_zone_id(), Some("Asia/Tokyo"));
    assert_eq!(sink.zones(), vec!["Asia/Tokyo"]);
}

/// Dropping every handle closes the queue and ends the task cleanly.
#[tokio::test]
async fn test_task_ends_on_channel_closure() {
    init_test_logging();

    let device = FakeDeviceState::new(WINTER_NOON_UTC, DIFF, SPACING);
    let sink = RecordingSink::default();
    let engine = ResolutionEngine::new(device, sink, TzdbZoneLookup::new());
    let (handle, join) = spawn_engine_task(engine, 4);

    handle
        .send(EngineEvent::NitzReceived(nitz_signal(
            -8 * HOUR,
            WINTER_NOON_UTC,
        )))
        .await
        .unwrap();
    drop(handle);

    let engine = join.await.unwrap();
    // The queued signal was still processed before closure
    assert_eq!(engine.last_committed_time_millis(), Some(WINTER_NOON_UTC));
}
