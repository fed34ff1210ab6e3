//! Timestamp parsing and reprojection into the reporting timezone.
//!
//! Every accepted representation is first pinned to an absolute instant
//! (`DateTime<Utc>`); only then is it converted into [`TARGET_TZ`]. Values
//! that carry an offset (`Z`, `+00:00`, `-0300`, ` UTC`) use it. Values
//! without one are interpreted in the zone chosen by the caller, see
//! [`NaiveZone`].

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta, TimeZone, Utc,
};
use chrono_tz::Tz;

/// The single civil timezone all records are reported in.
pub const TARGET_TZ: Tz = chrono_tz::America::Sao_Paulo;

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %:z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

// Slash dates are month-first like the provider's US-locale exports; the
// day-first forms only catch values whose first field exceeds 12.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Far enough back from a spring-forward gap to land on the old offset.
const GAP_LOOKBACK_HOURS: i64 = 3;

/// How to pin a timestamp that has no offset of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaiveZone {
    Utc,
    Target,
}

/// Parses `raw` into an absolute instant. Returns `None` only when no
/// accepted format matches.
///
/// Naive civil times in [`NaiveZone::Target`] that repeat at a fall-back
/// transition take the earlier instant; those skipped by a spring-forward
/// transition are read with the offset in force before it.
pub fn parse_instant(raw: &str, naive_zone: NaiveZone) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(value, fmt) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    if let Some(stripped) = strip_utc_marker(value) {
        return parse_naive(stripped).map(|naive| naive.and_utc());
    }

    let naive = parse_naive(value)?;
    match naive_zone {
        NaiveZone::Utc => Some(naive.and_utc()),
        NaiveZone::Target => match TARGET_TZ.from_local_datetime(&naive) {
            LocalResult::Single(local) => Some(local.with_timezone(&Utc)),
            LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
            LocalResult::None => resolve_gap(naive),
        },
    }
}

fn resolve_gap(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    let before = naive.checked_sub_signed(TimeDelta::hours(GAP_LOOKBACK_HOURS))?;
    let offset = TARGET_TZ
        .offset_from_local_datetime(&before)
        .earliest()?
        .fix();
    let shift = TimeDelta::seconds(i64::from(offset.local_minus_utc()));
    naive.checked_sub_signed(shift).map(|utc| utc.and_utc())
}

/// Reprojects an absolute instant into [`TARGET_TZ`].
pub fn to_target(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&TARGET_TZ)
}

fn strip_utc_marker(value: &str) -> Option<&str> {
    value
        .strip_suffix('Z')
        .or_else(|| value.strip_suffix('z'))
        .or_else(|| value.strip_suffix(" UTC"))
        .map(str::trim_end)
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
