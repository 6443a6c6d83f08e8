//! Scenarios around country availability ordering
//!
//! Country codes can arrive before, after, or never relative to the
//! NITZ signals they qualify. These tests cover the re-evaluation
//! behavior when the country changes under an already-committed zone.

use integration_tests::{
    init_test_logging, nitz_signal, FakeDeviceState, RecordingSink, HOUR, WINTER_NOON_UTC,
};
use nitzsync_engine::ResolutionEngine;
use nitzsync_zonedb::TzdbZoneLookup;

const DIFF: i64 = 2_000;
const SPACING: i64 = 600_000;

type Engine = ResolutionEngine<FakeDeviceState, RecordingSink, TzdbZoneLookup>;

fn engine_at(now: i64) -> (Engine, FakeDeviceState, RecordingSink) {
    let device = FakeDeviceState::new(now, DIFF, SPACING);
    let sink = RecordingSink::default();
    let engine = ResolutionEngine::new(device.clone(), sink.clone(), TzdbZoneLookup::new());
    (engine, device, sink)
}

/// A globally unique offset resolves without a country, and the country
/// arriving later confirms rather than re-commits.
#[test]
fn test_offset_only_unique_then_country_confirms() {
    init_test_logging();
    tracing::info!("E2E: country-unknown unique offset, then country arrives");

    let (mut engine, _device, sink) = engine_at(WINTER_NOON_UTC);

    // +5:45 is Kathmandu and nothing else, worldwide
    let outcome = engine.on_nitz_received(nitz_signal(5 * HOUR + 45 * 60 * 1000, WINTER_NOON_UTC));
    assert_eq!(outcome.zone_id.as_deref(), Some("Asia/Kathmandu"));

    engine.on_country_available("np");
    // The committed zone was already unique; no redundant re-commit
    assert_eq!(sink.zones(), vec!["Asia/Kathmandu"]);
    assert_eq!(engine.country_iso(), Some("np"));
}

/// An ambiguous offset-only match gets upgraded once the country
/// disambiguates it, re-committing the now-unique zone.
#[test]
fn test_country_upgrade_recommits_unique_zone() {
    init_test_logging();
    let (mut engine, _device, sink) = engine_at(WINTER_NOON_UTC);

    // +9h without a country: Tokyo and Seoul both qualify, the match is
    // reported non-unique with the first table entry winning
    let outcome = engine.on_nitz_received(nitz_signal(9 * HOUR, WINTER_NOON_UTC));
    assert_eq!(outcome.zone_id.as_deref(), Some("Asia/Tokyo"));

    engine.on_country_available("jp");
    // Same zone, now unique under the country: committed again so the
    // consumer observes the upgraded confidence
    assert_eq!(sink.zones(), vec!["Asia/Tokyo", "Asia/Tokyo"]);
}

/// Country arriving first qualifies a later ambiguous offset.
#[test]
fn test_country_first_disambiguates_offset() {
    init_test_logging();
    let (mut engine, _device, sink) = engine_at(WINTER_NOON_UTC);
    engine.on_country_available("mx");

    // -6h in winter also fits Chicago and Winnipeg; the country pins it
    let outcome = engine.on_nitz_received(nitz_signal(-6 * HOUR, WINTER_NOON_UTC));
    assert_eq!(outcome.zone_id.as_deref(), Some("America/Mexico_City"));
    assert_eq!(sink.zones(), vec!["America/Mexico_City"]);
}

/// Losing the country keeps the last committed zone and accepted signal.
#[test]
fn test_country_unavailable_preserves_state() {
    init_test_logging();
    let (mut engine, _device, sink) = engine_at(WINTER_NOON_UTC);
    engine.on_country_available("us");

    let signal = nitz_signal(-8 * HOUR, WINTER_NOON_UTC);
    engine.on_nitz_received(signal.clone());

    engine.on_country_unavailable();
    assert!(engine.country_iso().is_none());
    assert_eq!(engine.last_accepted_signal(), Some(&signal));
    assert_eq!(engine.last_committed_zone_id(), Some("America/Los_Angeles"));
    assert_eq!(sink.zones(), vec!["America/Los_Angeles"]);
}

/// A country change can move the zone even while the time gate stays
/// closed: zone commits are not throttled.
#[test]
fn test_country_change_moves_zone_without_time_commit() {
    init_test_logging();
    let (mut engine, device, sink) = engine_at(WINTER_NOON_UTC);
    engine.on_country_available("gb");
    engine.on_nitz_received(nitz_signal(0, WINTER_NOON_UTC));
    assert_eq!(sink.zones(), vec!["Europe/London"]);

    // Border crossing: same UTC offset winter, different country
    device.advance(1_000);
    engine.on_country_available("ie");
    // "ie" is not in the metadata table; the committed zone stays put
    assert_eq!(sink.zones(), vec!["Europe/London"]);

    engine.on_country_available("fr");
    // France at +1 does not contain a 0-offset zone; the prior commit
    // stands until a new signal arrives
    device.advance(1_000);
    let outcome = engine.on_nitz_received(nitz_signal(HOUR, WINTER_NOON_UTC + 2_000));
    assert_eq!(outcome.zone_id.as_deref(), Some("Europe/Paris"));
    // Time gate: 2s elapsed, no drift, below both thresholds
    assert!(outcome.time_millis.is_none());
    assert_eq!(sink.zones(), vec!["Europe/London", "Europe/Paris"]);
    assert_eq!(sink.times(), vec![WINTER_NOON_UTC]);
}

/// An empty country code is treated as the country becoming unavailable.
#[test]
fn test_empty_country_code_clears_country() {
    init_test_logging();
    let (mut engine, _device, _sink) = engine_at(WINTER_NOON_UTC);
    engine.on_country_available("us");
    assert_eq!(engine.country_iso(), Some("us"));

    engine.on_country_available("");
    assert!(engine.country_iso().is_none());
}
