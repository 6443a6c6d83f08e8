//! Country and offset based time-zone lookup for nitzsync
//!
//! This crate maps network-derived country codes and NITZ offsets onto
//! IANA time zones. All lookups are pure and referentially transparent
//! given the static zone database and the supplied instant, which keeps
//! them deterministic under a fixed "now" and therefore testable.
//!
//! # Components
//!
//! - [`country`] - static country-to-zone candidate table
//! - [`lookup`] - the [`ZoneLookup`] trait and its tzdb-backed
//!   implementation [`TzdbZoneLookup`]

pub mod country;
pub mod lookup;

pub use country::{zones_for_country, CountryZones};
pub use lookup::{CountryZoneInfo, TzdbZoneLookup, ZoneLookup, ZoneMatch};
