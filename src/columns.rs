//! Column names recognized in provider exports and their resolution against
//! a header row.
//!
//! Resolution happens once per table, before any row is touched, so a
//! missing required column is reported without partial processing.

use crate::{error::NormalizeError, timestamp::NaiveZone};

pub const TARGET_ZONE_DATE_COLUMN: &str = "Date [America/Sao_Paulo]";
pub const DATE_COLUMN: &str = "Date";
pub const DURATION_COLUMN: &str = "Duration [Milliseconds]";
pub const FROM_COLUMN: &str = "From";
pub const PARTICIPANTS_COLUMN: &str = "Participants";
pub const DIRECTION_COLUMN: &str = "Direction";
pub const RESULT_COLUMN: &str = "Call Result";

/// Which of the two accepted date columns supplied the timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    TargetZone,
    Generic,
}

impl TimestampSource {
    pub fn column_name(self) -> &'static str {
        match self {
            TimestampSource::TargetZone => TARGET_ZONE_DATE_COLUMN,
            TimestampSource::Generic => DATE_COLUMN,
        }
    }

    /// Zone used to pin timestamps that carry no offset of their own.
    ///
    /// The header `Date [America/Sao_Paulo]` declares its zone, so naive
    /// values there are Sao Paulo civil time. This departs from the legacy
    /// call dashboard, which parsed every naive value as UTC and so shifted
    /// such rows three hours earlier. The generic `Date` column keeps the UTC
    /// reading.
    pub fn naive_zone(self) -> NaiveZone {
        match self {
            TimestampSource::TargetZone => NaiveZone::Target,
            TimestampSource::Generic => NaiveZone::Utc,
        }
    }
}

/// Header positions for every column the normalizer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub timestamp: usize,
    pub timestamp_source: TimestampSource,
    pub duration: usize,
    pub origin: usize,
    pub participants: Option<usize>,
    pub direction: usize,
    pub result: usize,
}

impl ColumnLayout {
    pub fn resolve(headers: &[String]) -> Result<Self, NormalizeError> {
        let position = |name: &str| headers.iter().position(|h| header_matches(h, name));

        let timestamp = position(TARGET_ZONE_DATE_COLUMN)
            .map(|idx| (idx, TimestampSource::TargetZone))
            .or_else(|| position(DATE_COLUMN).map(|idx| (idx, TimestampSource::Generic)));
        let duration = position(DURATION_COLUMN);
        let origin = position(FROM_COLUMN);
        let direction = position(DIRECTION_COLUMN);
        let result = position(RESULT_COLUMN);

        let mut missing = Vec::new();
        if timestamp.is_none() {
            missing.push(format!("{TARGET_ZONE_DATE_COLUMN} (or {DATE_COLUMN})"));
        }
        for (name, found) in [
            (DURATION_COLUMN, duration),
            (FROM_COLUMN, origin),
            (DIRECTION_COLUMN, direction),
            (RESULT_COLUMN, result),
        ] {
            if found.is_none() {
                missing.push(name.to_string());
            }
        }

        match (timestamp, duration, origin, direction, result) {
            (
                Some((timestamp, timestamp_source)),
                Some(duration),
                Some(origin),
                Some(direction),
                Some(result),
            ) => Ok(ColumnLayout {
                timestamp,
                timestamp_source,
                duration,
                origin,
                participants: position(PARTICIPANTS_COLUMN),
                direction,
                result,
            }),
            _ => Err(NormalizeError::MissingColumns { columns: missing }),
        }
    }
}

// Exports saved from spreadsheet tools often prefix the first header with a BOM.
fn header_matches(header: &str, expected: &str) -> bool {
    header.trim_start_matches('\u{feff}').trim() == expected
}
