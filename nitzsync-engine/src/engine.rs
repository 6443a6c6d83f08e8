//! NITZ Resolution Engine
//!
//! The engine is the only stateful component of nitzsync. It ingests
//! three kinds of events (a new NITZ signal, country became known,
//! country became unknown) and decides when to commit a device time
//! and/or time zone into the injected [`TimeCommitSink`].
//!
//! # State axes
//!
//! The engine tracks two independent axes rather than exclusive states:
//! country known / unknown, and has-accepted-signal / no-signal-yet.
//! Initial state is country unknown, no signal.
//!
//! # Time-commit hysteresis
//!
//! A time update is accepted when the candidate time drifts from the
//! projected committed time by at least the configured diff threshold,
//! OR when the configured spacing has elapsed since the last commit.
//! Diff-gating suppresses noisy small corrections; spacing-gating bounds
//! worst-case staleness. Zone commits are never gated by hysteresis: a
//! resolved zone is committed whenever it differs from the last committed
//! zone, or whenever it upgrades a non-unique match to a unique one.
//!
//! # Lifecycle
//!
//! One engine per radio/subscription context. There is no terminal state
//! and no reset: on SIM or subscription change the owner constructs a
//! fresh engine.

use std::fmt;

use tracing::{debug, info};

use nitzsync_common::{Error, TimestampedSignal};
use nitzsync_zonedb::{ZoneLookup, ZoneMatch};

use crate::device::{DeviceState, TimeCommitSink};

/// Commits produced by a single event.
///
/// An empty outcome is the normal, observable result of hysteresis
/// suppression, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Device time committed by this event, if any.
    pub time_millis: Option<i64>,
    /// Time zone committed by this event, if any.
    pub zone_id: Option<String>,
}

impl CommitOutcome {
    /// Returns true if this event committed a time and/or a zone.
    pub fn committed(&self) -> bool {
        self.time_millis.is_some() || self.zone_id.is_some()
    }
}

impl fmt::Display for CommitOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.time_millis, &self.zone_id) {
            (None, None) => write!(f, "no commit"),
            (Some(time), None) => write!(f, "time={time}ms"),
            (None, Some(zone)) => write!(f, "zone={zone}"),
            (Some(time), Some(zone)) => write!(f, "time={time}ms, zone={zone}"),
        }
    }
}

/// Metadata recorded for the most recent zone commit.
#[derive(Debug, Clone)]
struct ZoneCommit {
    zone_id: String,
    /// Whether the committing match was unique.
    is_unique_match: bool,
    /// Whether the match came from a country-based lookup (as opposed to
    /// the offset-only global table or an emulator hint path).
    country_based: bool,
}

/// A zone resolution produced while handling an event, before the commit
/// decision is applied.
#[derive(Debug, Clone)]
struct ZoneResolution {
    zone_id: String,
    is_unique_match: bool,
    country_based: bool,
}

impl ZoneResolution {
    fn from_match(matched: ZoneMatch, country_based: bool) -> Self {
        Self {
            zone_id: matched.zone_id,
            is_unique_match: matched.is_unique_match,
            country_based,
        }
    }
}

/// Engine-owned mutable state, updated only as a side effect of commit
/// decisions.
#[derive(Debug, Clone, Default)]
struct ResolutionState {
    last_zone_commit: Option<ZoneCommit>,
    last_committed_time_millis: Option<i64>,
    last_accepted_signal: Option<TimestampedSignal>,
    country_iso: Option<String>,
    last_commit_instant_millis: Option<i64>,
}

/// The NITZ resolution state machine.
///
/// Events must be delivered serially; see the crate-level concurrency
/// notes. All collaborators are injected at construction.
#[derive(Debug)]
pub struct ResolutionEngine<D, S, Z> {
    device: D,
    sink: S,
    zones: Z,
    state: ResolutionState,
}

impl<D, S, Z> ResolutionEngine<D, S, Z>
where
    D: DeviceState,
    S: TimeCommitSink,
    Z: ZoneLookup,
{
    /// Creates a new engine in the initial state: country unknown, no
    /// accepted signal, nothing committed.
    pub fn new(device: D, sink: S, zones: Z) -> Self {
        Self {
            device,
            sink,
            zones,
            state: ResolutionState::default(),
        }
    }

    // ========== Events ==========

    /// Handles a newly received NITZ signal.
    ///
    /// Discards the signal without any state change when the ignore-NITZ
    /// override is active. Otherwise the signal always becomes the last
    /// accepted signal, and time/zone commits are decided independently:
    /// the time commit passes through the diff/spacing hysteresis gate,
    /// the zone commit does not.
    pub fn on_nitz_received(&mut self, signal: TimestampedSignal) -> CommitOutcome {
        if self.device.ignore_nitz() {
            debug!("discarding NITZ signal: ignore-NITZ override active");
            return CommitOutcome::default();
        }

        let now = self.device.monotonic_now_millis();
        // Age-adjust and clock-adjust the signal's embedded time forward
        // to "now", so a late-delivered signal still yields correct time.
        let candidate_time = signal.signal().current_time_millis()
            + (now - signal.effective_receipt_instant_millis());

        let resolution = self.resolve_zone(&signal, now);

        let mut outcome = CommitOutcome::default();

        if self.time_gate_passes(candidate_time, now) {
            self.sink.set_time(candidate_time);
            self.state.last_committed_time_millis = Some(candidate_time);
            outcome.time_millis = Some(candidate_time);
        }

        if let Some(resolution) = resolution {
            if self.zone_commit_needed(&resolution) {
                self.commit_zone(&resolution);
                outcome.zone_id = Some(resolution.zone_id);
            }
        }

        if outcome.committed() {
            self.state.last_commit_instant_millis = Some(now);
            info!("NITZ commit: {outcome}");
        } else {
            debug!("NITZ signal accepted without commit");
        }

        self.state.last_accepted_signal = Some(signal);
        outcome
    }

    /// Handles the network country becoming known.
    ///
    /// An empty ISO code means "unknown" and is routed to
    /// [`on_country_unavailable`](Self::on_country_unavailable). When a
    /// previously accepted signal exists and the last zone commit was not
    /// already a unique country-based match, the signal is re-evaluated
    /// against the new country and may produce a fresh zone commit.
    pub fn on_country_available(&mut self, country_iso: &str) -> CommitOutcome {
        if country_iso.is_empty() {
            debug!("empty country code treated as country-unavailable");
            self.on_country_unavailable();
            return CommitOutcome::default();
        }

        info!("country available: {country_iso}");
        self.state.country_iso = Some(country_iso.to_string());

        let country_consistent = matches!(
            &self.state.last_zone_commit,
            Some(last) if last.is_unique_match && last.country_based
        );
        if country_consistent {
            return CommitOutcome::default();
        }
        let Some(signal) = self.state.last_accepted_signal.clone() else {
            return CommitOutcome::default();
        };

        let mut outcome = CommitOutcome::default();
        match self.zones.lookup_by_offset_and_country(&signal, country_iso) {
            Ok(matched) => {
                let resolution = ZoneResolution::from_match(matched, true);
                if self.zone_commit_needed(&resolution) {
                    self.commit_zone(&resolution);
                    self.state.last_commit_instant_millis =
                        Some(self.device.monotonic_now_millis());
                    info!("zone re-committed after country change: {}", resolution.zone_id);
                    outcome.zone_id = Some(resolution.zone_id);
                } else if let Some(last) = &mut self.state.last_zone_commit {
                    // Same zone confirmed by country data; record the
                    // higher-confidence provenance without re-committing.
                    last.is_unique_match = resolution.is_unique_match;
                    last.country_based = true;
                }
            }
            Err(err) => {
                debug!("re-evaluation with country {country_iso} failed: {err}");
            }
        }
        outcome
    }

    /// Handles the network country becoming unknown.
    ///
    /// The last accepted signal is retained; later commits fall back to
    /// offset-only resolution.
    pub fn on_country_unavailable(&mut self) {
        if self.state.country_iso.take().is_some() {
            debug!("country no longer available");
        }
    }

    // ========== Query surface ==========

    /// Returns the most recent non-discarded signal, if any.
    pub fn last_accepted_signal(&self) -> Option<&TimestampedSignal> {
        self.state.last_accepted_signal.as_ref()
    }

    /// Returns the last committed time zone, if any.
    pub fn last_committed_zone_id(&self) -> Option<&str> {
        self.state
            .last_zone_commit
            .as_ref()
            .map(|commit| commit.zone_id.as_str())
    }

    /// Returns the last committed device time, if any.
    pub fn last_committed_time_millis(&self) -> Option<i64> {
        self.state.last_committed_time_millis
    }

    /// Returns the current country ISO code, if known.
    pub fn country_iso(&self) -> Option<&str> {
        self.state.country_iso.as_deref()
    }

    // ========== Decision helpers ==========

    /// Resolves a zone for the signal: country-based when the country is
    /// known (falling back to offset-only if the country has no zone
    /// data), offset-only otherwise. `None` skips the zone commit for
    /// this event; time may still commit.
    fn resolve_zone(&self, signal: &TimestampedSignal, now: i64) -> Option<ZoneResolution> {
        match self.state.country_iso.as_deref() {
            Some(iso) => match self.zones.lookup_by_offset_and_country(signal, iso) {
                Ok(matched) => Some(ZoneResolution::from_match(matched, true)),
                Err(Error::UnknownCountry(_)) => {
                    debug!("country {iso} not in zone database, trying offset-only");
                    self.resolve_zone_by_offset(signal, now)
                }
                Err(err) => {
                    debug!("zone resolution failed for {iso}: {err}");
                    None
                }
            },
            None => self.resolve_zone_by_offset(signal, now),
        }
    }

    fn resolve_zone_by_offset(&self, signal: &TimestampedSignal, now: i64) -> Option<ZoneResolution> {
        match self.zones.lookup_by_offset(signal, now) {
            Ok(matched) => Some(ZoneResolution::from_match(matched, false)),
            Err(err) => {
                debug!("offset-only zone resolution failed: {err}");
                None
            }
        }
    }

    /// The dual hysteresis gate for time commits. The first commit always
    /// passes.
    fn time_gate_passes(&self, candidate_time: i64, now: i64) -> bool {
        let (Some(last_time), Some(last_instant)) = (
            self.state.last_committed_time_millis,
            self.state.last_commit_instant_millis,
        ) else {
            return true;
        };
        let elapsed = now - last_instant;
        let projected = last_time + elapsed;
        let drift = (candidate_time - projected).abs();
        if drift >= self.device.nitz_update_diff_millis() {
            return true;
        }
        if elapsed >= self.device.nitz_update_spacing_millis() {
            debug!("spacing bound reached ({elapsed}ms), forcing time resync");
            return true;
        }
        debug!("time update suppressed: drift={drift}ms, elapsed={elapsed}ms");
        false
    }

    /// A resolved zone is committed when it differs from the last
    /// committed zone, or when it replaces a non-unique match with a
    /// unique one.
    fn zone_commit_needed(&self, resolution: &ZoneResolution) -> bool {
        match &self.state.last_zone_commit {
            None => true,
            Some(last) => {
                last.zone_id != resolution.zone_id
                    || (!last.is_unique_match && resolution.is_unique_match)
            }
        }
    }

    fn commit_zone(&mut self, resolution: &ZoneResolution) {
        self.sink.set_time_zone(&resolution.zone_id);
        self.state.last_zone_commit = Some(ZoneCommit {
            zone_id: resolution.zone_id.clone(),
            is_unique_match: resolution.is_unique_match,
            country_based: resolution.country_based,
        });
    }
}
