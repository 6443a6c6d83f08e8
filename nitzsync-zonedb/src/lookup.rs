//! Zone lookup operations
//!
//! Two resolution paths exist for a NITZ signal:
//!
//! - country-based: restrict the country's candidate zones to those whose
//!   total offset (standard + DST) at the signal's effective receipt
//!   instant matches the signal's total offset
//! - offset-only: the same restriction applied to the global candidate
//!   table, used while the country is unknown
//!
//! Offsets vary by date, so every lookup evaluates candidates at an
//! explicit instant. Lookups are pure functions of the static zone
//! database and that instant.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::{OffsetComponents, Tz};
use tracing::debug;

use nitzsync_common::{Error, Result, TimestampedSignal};

use crate::country;

/// Result of a country-only lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryZoneInfo {
    /// Conventional primary zone for the country.
    pub default_zone_id: String,
    /// Whether the country has more than one candidate zone.
    pub has_multiple_zones: bool,
    /// Whether every candidate zone had the same total offset at the
    /// lookup instant. Trivially true for single-zone countries.
    pub all_zones_share_offset: bool,
    /// The instant used to evaluate offsets.
    pub lookup_instant_millis: i64,
}

/// Result of a signal + country (or signal-only) lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMatch {
    /// The resolved zone identifier.
    pub zone_id: String,
    /// True when the signal's offset singled the zone out: either exactly
    /// one candidate matched, or every candidate matched with an
    /// identical offset (the zones are indistinguishable by offset).
    pub is_unique_match: bool,
}

/// Zone lookup interface.
///
/// Implementations must be pure: given the same signal and instants, a
/// lookup always returns the same result, with no side effects. This is
/// the seam where tests substitute scripted lookups for the tzdb-backed
/// implementation.
pub trait ZoneLookup {
    /// Looks up a country's zone candidacy metadata.
    ///
    /// `at_instant_millis` is the instant at which candidate offsets are
    /// evaluated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCountry`] if the country code is not in
    /// the zone database.
    fn lookup_by_country(&self, country_iso: &str, at_instant_millis: i64)
        -> Result<CountryZoneInfo>;

    /// Resolves the best-matching zone for a signal within a country.
    ///
    /// Candidates are the country's zones whose total offset at the
    /// signal's effective receipt instant equals the signal's total
    /// offset. With zero candidates the signal's emulator zone hint is
    /// used as a fallback when it is offset-compatible.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownCountry`] for an unrecognized country and
    /// [`Error::NoZoneMatch`] when no candidate (and no usable hint)
    /// fits the signal.
    fn lookup_by_offset_and_country(
        &self,
        signal: &TimestampedSignal,
        country_iso: &str,
    ) -> Result<ZoneMatch>;

    /// Resolves a zone from the signal's offset alone, against the global
    /// candidate table.
    ///
    /// A non-unique result is returned only when all matching candidates
    /// are offset-identical at `now_millis` as well, so the committed
    /// zone is at least offset-correct even if the identifier is a guess.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoZoneMatch`] when no candidate fits, or when the
    /// candidates are ambiguous and not offset-identical.
    fn lookup_by_offset(&self, signal: &TimestampedSignal, now_millis: i64) -> Result<ZoneMatch>;
}

/// Zone lookup backed by the bundled IANA database and the static
/// country table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzdbZoneLookup;

impl TzdbZoneLookup {
    /// Creates a new tzdb-backed lookup.
    pub fn new() -> Self {
        Self
    }
}

/// Evaluates a zone's total offset (standard + DST) at an instant.
fn total_offset_millis(tz: Tz, at_instant_millis: i64) -> Result<i64> {
    let instant = DateTime::<Utc>::from_timestamp_millis(at_instant_millis).ok_or_else(|| {
        Error::InvalidSignal(format!("instant out of range: {at_instant_millis}"))
    })?;
    let offset = tz.offset_from_utc_datetime(&instant.naive_utc());
    Ok((offset.base_utc_offset() + offset.dst_offset()).num_milliseconds())
}

/// Resolves the emulator zone hint when it parses and is offset-compatible
/// with the signal at the given instant.
fn hint_match(signal: &TimestampedSignal, at_instant_millis: i64) -> Option<ZoneMatch> {
    let hint = signal.signal().emulator_zone_hint()?;
    let tz: Tz = hint.parse().ok()?;
    let offset = total_offset_millis(tz, at_instant_millis).ok()?;
    if offset == signal.signal().total_offset_millis() {
        debug!("resolved zone {} from emulator hint", tz.name());
        Some(ZoneMatch {
            zone_id: tz.name().to_string(),
            is_unique_match: true,
        })
    } else {
        None
    }
}

impl ZoneLookup for TzdbZoneLookup {
    fn lookup_by_country(
        &self,
        country_iso: &str,
        at_instant_millis: i64,
    ) -> Result<CountryZoneInfo> {
        let entry = country::zones_for_country(country_iso)
            .ok_or_else(|| Error::UnknownCountry(country_iso.to_string()))?;

        let mut shared_offset = None;
        let mut all_zones_share_offset = true;
        for &tz in entry.zones {
            let offset = total_offset_millis(tz, at_instant_millis)?;
            match shared_offset {
                None => shared_offset = Some(offset),
                Some(first) if first != offset => {
                    all_zones_share_offset = false;
                    break;
                }
                Some(_) => {}
            }
        }

        Ok(CountryZoneInfo {
            default_zone_id: entry.default_zone.name().to_string(),
            has_multiple_zones: entry.zones.len() > 1,
            all_zones_share_offset,
            lookup_instant_millis: at_instant_millis,
        })
    }

    fn lookup_by_offset_and_country(
        &self,
        signal: &TimestampedSignal,
        country_iso: &str,
    ) -> Result<ZoneMatch> {
        let entry = country::zones_for_country(country_iso)
            .ok_or_else(|| Error::UnknownCountry(country_iso.to_string()))?;

        let at = signal.effective_receipt_instant_millis();
        let want = signal.signal().total_offset_millis();

        let mut candidates = Vec::new();
        for &tz in entry.zones {
            if total_offset_millis(tz, at)? == want {
                candidates.push(tz);
            }
        }

        if candidates.is_empty() {
            if let Some(matched) = hint_match(signal, at) {
                return Ok(matched);
            }
            return Err(Error::NoZoneMatch(format!(
                "no zone in {country_iso} has offset {want}ms at {at}"
            )));
        }

        // A full-set match means the country's zones are indistinguishable
        // by offset at this instant; the default zone is then as good as a
        // unique answer.
        if candidates.len() == 1 || candidates.len() == entry.zones.len() {
            let tz = if candidates.len() == 1 {
                candidates[0]
            } else {
                entry.default_zone
            };
            return Ok(ZoneMatch {
                zone_id: tz.name().to_string(),
                is_unique_match: true,
            });
        }

        // Strict-subset tie: prefer the default zone when it is among the
        // matches, otherwise the first in canonical order.
        let tz = if candidates.contains(&entry.default_zone) {
            entry.default_zone
        } else {
            candidates[0]
        };
        debug!(
            "ambiguous match in {country_iso}: {} of {} zones at offset {want}ms, picked {}",
            candidates.len(),
            entry.zones.len(),
            tz.name()
        );
        Ok(ZoneMatch {
            zone_id: tz.name().to_string(),
            is_unique_match: false,
        })
    }

    fn lookup_by_offset(&self, signal: &TimestampedSignal, now_millis: i64) -> Result<ZoneMatch> {
        let at = signal.effective_receipt_instant_millis();
        let want = signal.signal().total_offset_millis();

        let mut candidates = Vec::new();
        for tz in country::all_zones() {
            if total_offset_millis(tz, at)? == want {
                candidates.push(tz);
            }
        }

        match candidates.len() {
            0 => {
                if let Some(matched) = hint_match(signal, at) {
                    return Ok(matched);
                }
                Err(Error::NoZoneMatch(format!(
                    "no zone has offset {want}ms at {at}"
                )))
            }
            1 => Ok(ZoneMatch {
                zone_id: candidates[0].name().to_string(),
                is_unique_match: true,
            }),
            _ => {
                // Ambiguous. Acceptable only if the candidates are still
                // offset-identical now, so any of them yields correct
                // local time.
                let reference = total_offset_millis(candidates[0], now_millis)?;
                for &tz in &candidates[1..] {
                    if total_offset_millis(tz, now_millis)? != reference {
                        return Err(Error::NoZoneMatch(format!(
                            "{} zones share offset {want}ms but diverge at now",
                            candidates.len()
                        )));
                    }
                }
                debug!(
                    "offset-only match is ambiguous across {} zones, picked {}",
                    candidates.len(),
                    candidates[0].name()
                );
                Ok(ZoneMatch {
                    zone_id: candidates[0].name().to_string(),
                    is_unique_match: false,
                })
            }
        }
    }
}
