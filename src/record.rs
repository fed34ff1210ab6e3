//! The canonical call record and its derived value types.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::translate::WEEKDAY_LABELS;

const MS_PER_MINUTE: f64 = 60_000.0;

/// Day of the week, ordered Monday first. The discriminant is the ordinal
/// used for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Display label in the reporting locale.
    pub fn label(self) -> &'static str {
        WEEKDAY_LABELS[self.index()].1
    }

    /// Zero-based position, Monday = 0.
    pub fn index(self) -> usize {
        usize::from(self.ordinal()) - 1
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(value: chrono::Weekday) -> Self {
        Weekday::ALL[value.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Call length classes used by the duration breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DurationBucket {
    UnderOne,
    OneToThree,
    ThreeToFive,
    FiveToTen,
    TenToThirty,
    ThirtyPlus,
}

impl DurationBucket {
    pub fn from_minutes(minutes: f64) -> Self {
        match minutes {
            m if m < 1.0 => DurationBucket::UnderOne,
            m if m < 3.0 => DurationBucket::OneToThree,
            m if m < 5.0 => DurationBucket::ThreeToFive,
            m if m < 10.0 => DurationBucket::FiveToTen,
            m if m < 30.0 => DurationBucket::TenToThirty,
            _ => DurationBucket::ThirtyPlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationBucket::UnderOne => "< 1 min",
            DurationBucket::OneToThree => "1-3 min",
            DurationBucket::ThreeToFive => "3-5 min",
            DurationBucket::FiveToTen => "5-10 min",
            DurationBucket::TenToThirty => "10-30 min",
            DurationBucket::ThirtyPlus => "30+ min",
        }
    }
}

impl fmt::Display for DurationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized call. Temporal fields are derived from `timestamp` at
/// construction and cannot drift from it.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    timestamp: DateTime<Tz>,
    date: NaiveDate,
    hour: u32,
    weekday: Weekday,
    duration_ms: f64,
    origin: String,
    participants: String,
    direction: String,
    result: String,
}

impl CallRecord {
    /// Builds a record from already-cleaned values. Negative or non-finite
    /// durations are clamped to zero.
    pub fn new(
        timestamp: DateTime<Tz>,
        duration_ms: f64,
        origin: impl Into<String>,
        participants: impl Into<String>,
        direction: impl Into<String>,
        result: impl Into<String>,
    ) -> Self {
        let duration_ms = if duration_ms.is_finite() && duration_ms > 0.0 {
            duration_ms
        } else {
            0.0
        };
        Self {
            date: timestamp.date_naive(),
            hour: timestamp.hour(),
            weekday: timestamp.weekday().into(),
            timestamp,
            duration_ms,
            origin: origin.into(),
            participants: participants.into(),
            direction: direction.into(),
            result: result.into(),
        }
    }

    pub fn timestamp(&self) -> &DateTime<Tz> {
        &self.timestamp
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_ms / MS_PER_MINUTE
    }

    pub fn duration_bucket(&self) -> DurationBucket {
        DurationBucket::from_minutes(self.duration_minutes())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn participants(&self) -> &str {
        &self.participants
    }

    pub fn direction(&self) -> &str {
        &self.direction
    }

    pub fn result(&self) -> &str {
        &self.result
    }
}
