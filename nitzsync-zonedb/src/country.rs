//! Country to time-zone candidate table
//!
//! A static table of the time zones historically associated with each
//! country, keyed by the two-letter ISO 3166-1 country code reported by
//! network registration. Entries carry a conventional default zone (used
//! when an offset cannot disambiguate further) followed by the remaining
//! candidates in a stable canonical order.
//!
//! The table covers the telephony-relevant subset of the IANA zone.tab
//! data; country codes absent from it are reported as unknown by the
//! lookup layer, not silently mapped.

use chrono_tz::Tz;

/// Zone candidates for one country.
#[derive(Debug, Clone, Copy)]
pub struct CountryZones {
    /// Two-letter ISO 3166-1 country code, lowercase.
    pub iso: &'static str,
    /// Conventional primary zone for the country.
    pub default_zone: Tz,
    /// All candidate zones, default first.
    pub zones: &'static [Tz],
}

/// Static country-to-zones table, ordered by ISO code.
static COUNTRY_ZONES: &[CountryZones] = &[
    CountryZones {
        iso: "ae",
        default_zone: Tz::Asia__Dubai,
        zones: &[Tz::Asia__Dubai],
    },
    CountryZones {
        iso: "at",
        default_zone: Tz::Europe__Vienna,
        zones: &[Tz::Europe__Vienna],
    },
    CountryZones {
        iso: "au",
        default_zone: Tz::Australia__Sydney,
        zones: &[
            Tz::Australia__Sydney,
            Tz::Australia__Melbourne,
            Tz::Australia__Brisbane,
            Tz::Australia__Hobart,
            Tz::Australia__Adelaide,
            Tz::Australia__Darwin,
            Tz::Australia__Perth,
            Tz::Australia__Eucla,
            Tz::Australia__Lord_Howe,
        ],
    },
    CountryZones {
        iso: "br",
        default_zone: Tz::America__Sao_Paulo,
        zones: &[Tz::America__Sao_Paulo, Tz::America__Manaus],
    },
    CountryZones {
        iso: "ca",
        default_zone: Tz::America__Toronto,
        zones: &[
            Tz::America__Toronto,
            Tz::America__Winnipeg,
            Tz::America__Edmonton,
            Tz::America__Vancouver,
            Tz::America__Halifax,
            Tz::America__St_Johns,
        ],
    },
    CountryZones {
        iso: "ch",
        default_zone: Tz::Europe__Zurich,
        zones: &[Tz::Europe__Zurich],
    },
    CountryZones {
        iso: "cn",
        default_zone: Tz::Asia__Shanghai,
        zones: &[Tz::Asia__Shanghai, Tz::Asia__Urumqi],
    },
    CountryZones {
        iso: "cz",
        default_zone: Tz::Europe__Prague,
        zones: &[Tz::Europe__Prague],
    },
    CountryZones {
        iso: "de",
        default_zone: Tz::Europe__Berlin,
        zones: &[Tz::Europe__Berlin, Tz::Europe__Busingen],
    },
    CountryZones {
        iso: "eg",
        default_zone: Tz::Africa__Cairo,
        zones: &[Tz::Africa__Cairo],
    },
    CountryZones {
        iso: "es",
        default_zone: Tz::Europe__Madrid,
        zones: &[Tz::Europe__Madrid, Tz::Africa__Ceuta, Tz::Atlantic__Canary],
    },
    CountryZones {
        iso: "fr",
        default_zone: Tz::Europe__Paris,
        zones: &[Tz::Europe__Paris],
    },
    CountryZones {
        iso: "gb",
        default_zone: Tz::Europe__London,
        zones: &[Tz::Europe__London],
    },
    CountryZones {
        iso: "hk",
        default_zone: Tz::Asia__Hong_Kong,
        zones: &[Tz::Asia__Hong_Kong],
    },
    CountryZones {
        iso: "in",
        default_zone: Tz::Asia__Kolkata,
        zones: &[Tz::Asia__Kolkata],
    },
    CountryZones {
        iso: "it",
        default_zone: Tz::Europe__Rome,
        zones: &[Tz::Europe__Rome],
    },
    CountryZones {
        iso: "jp",
        default_zone: Tz::Asia__Tokyo,
        zones: &[Tz::Asia__Tokyo],
    },
    CountryZones {
        iso: "ke",
        default_zone: Tz::Africa__Nairobi,
        zones: &[Tz::Africa__Nairobi],
    },
    CountryZones {
        iso: "kr",
        default_zone: Tz::Asia__Seoul,
        zones: &[Tz::Asia__Seoul],
    },
    CountryZones {
        iso: "mx",
        default_zone: Tz::America__Mexico_City,
        zones: &[
            Tz::America__Mexico_City,
            Tz::America__Cancun,
            Tz::America__Hermosillo,
            Tz::America__Tijuana,
        ],
    },
    CountryZones {
        iso: "ng",
        default_zone: Tz::Africa__Lagos,
        zones: &[Tz::Africa__Lagos],
    },
    CountryZones {
        iso: "np",
        default_zone: Tz::Asia__Kathmandu,
        zones: &[Tz::Asia__Kathmandu],
    },
    CountryZones {
        iso: "nz",
        default_zone: Tz::Pacific__Auckland,
        zones: &[Tz::Pacific__Auckland, Tz::Pacific__Chatham],
    },
    CountryZones {
        iso: "pl",
        default_zone: Tz::Europe__Warsaw,
        zones: &[Tz::Europe__Warsaw],
    },
    CountryZones {
        iso: "ru",
        default_zone: Tz::Europe__Moscow,
        zones: &[
            Tz::Europe__Moscow,
            Tz::Europe__Kaliningrad,
            Tz::Asia__Yekaterinburg,
            Tz::Asia__Novosibirsk,
            Tz::Asia__Vladivostok,
        ],
    },
    CountryZones {
        iso: "sg",
        default_zone: Tz::Asia__Singapore,
        zones: &[Tz::Asia__Singapore],
    },
    CountryZones {
        iso: "us",
        default_zone: Tz::America__New_York,
        zones: &[
            Tz::America__New_York,
            Tz::America__Chicago,
            Tz::America__Denver,
            Tz::America__Phoenix,
            Tz::America__Los_Angeles,
            Tz::America__Anchorage,
            Tz::Pacific__Honolulu,
        ],
    },
    CountryZones {
        iso: "za",
        default_zone: Tz::Africa__Johannesburg,
        zones: &[Tz::Africa__Johannesburg],
    },
];

/// Returns the zone candidates for a country, or `None` if the country
/// code is not in the table. Matching is case-insensitive.
pub fn zones_for_country(iso: &str) -> Option<&'static CountryZones> {
    COUNTRY_ZONES
        .iter()
        .find(|entry| entry.iso.eq_ignore_ascii_case(iso))
}

/// Iterates over every zone in the table, in table order.
///
/// This is the global candidate set used for offset-only resolution when
/// the country is unknown.
pub fn all_zones() -> impl Iterator<Item = Tz> {
    COUNTRY_ZONES
        .iter()
        .flat_map(|entry| entry.zones.iter().copied())
}
