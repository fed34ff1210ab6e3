//! Grouped counts, duration totals and loss-rate metrics over matched calls.
//!
//! All functions accept any iterator of `&CallRecord`, so they work on a full
//! record slice as well as on a [`crate::filter::MatchedCalls`] view.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
};

use chrono::NaiveDate;
use clap::ValueEnum;
use itertools::Itertools;
use serde::Serialize;

use crate::{
    record::{CallRecord, DurationBucket, Weekday},
    translate::{
        RESULT_BUSY, RESULT_FAILED, RESULT_HUNG_UP_IN_QUEUE, RESULT_HUNG_UP_ON_HOLD,
        RESULT_MISSED, RESULT_REJECTED, RESULT_SENT_TO_VOICEMAIL, RESULT_VOICEMAIL,
    },
};

pub const HOURS_PER_DAY: usize = 24;

/// A field records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Dimension {
    Date,
    Hour,
    Weekday,
    WeekdayHour,
    Origin,
    Direction,
    Result,
    Duration,
}

impl Dimension {
    pub fn key_of(self, record: &CallRecord) -> GroupKey {
        match self {
            Dimension::Date => GroupKey::Date(record.date()),
            Dimension::Hour => GroupKey::Hour(record.hour()),
            Dimension::Weekday => GroupKey::Weekday(record.weekday()),
            Dimension::WeekdayHour => GroupKey::WeekdayHour(record.weekday(), record.hour()),
            Dimension::Origin => GroupKey::Text(record.origin().to_string()),
            Dimension::Direction => GroupKey::Text(record.direction().to_string()),
            Dimension::Result => GroupKey::Text(record.result().to_string()),
            Dimension::Duration => GroupKey::Bucket(record.duration_bucket()),
        }
    }

    /// Whether keys of this dimension have a natural (calendar or size)
    /// order, as opposed to being categories best ranked by count.
    pub fn is_ordinal(self) -> bool {
        !matches!(
            self,
            Dimension::Origin | Dimension::Direction | Dimension::Result
        )
    }

    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Date => "date",
            Dimension::Hour => "hour",
            Dimension::Weekday => "weekday",
            Dimension::WeekdayHour => "weekday_hour",
            Dimension::Origin => "origin",
            Dimension::Direction => "direction",
            Dimension::Result => "result",
            Dimension::Duration => "duration",
        }
    }
}

/// A typed grouping key. Ordering is chronological for temporal keys,
/// Monday-first for weekdays and shortest-first for duration buckets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Date(NaiveDate),
    Hour(u32),
    Weekday(Weekday),
    WeekdayHour(Weekday, u32),
    Bucket(DurationBucket),
    Text(String),
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            GroupKey::Hour(hour) => write!(f, "{hour:02}h"),
            GroupKey::Weekday(day) => write!(f, "{day}"),
            GroupKey::WeekdayHour(day, hour) => write!(f, "{day} {hour:02}h"),
            GroupKey::Bucket(bucket) => write!(f, "{bucket}"),
            GroupKey::Text(text) => f.write_str(text),
        }
    }
}

pub fn count_by<'a, I>(records: I, dimension: Dimension) -> HashMap<GroupKey, usize>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let mut counts = HashMap::new();
    for record in records {
        *counts.entry(dimension.key_of(record)).or_insert(0) += 1;
    }
    counts
}

/// Counts ordered by key.
pub fn sorted_by_key(counts: HashMap<GroupKey, usize>) -> Vec<(GroupKey, usize)> {
    counts.into_iter().sorted().collect()
}

/// Counts ordered by count descending, ties broken by key. `n == 0` keeps
/// every group.
pub fn top_n(counts: HashMap<GroupKey, usize>, n: usize) -> Vec<(GroupKey, usize)> {
    let mut items = counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect::<Vec<_>>();
    if n > 0 && items.len() > n {
        items.truncate(n);
    }
    items
}

/// Distinct values of a dimension in key order, e.g. to populate choice lists.
pub fn distinct_values<'a, I>(records: I, dimension: Dimension) -> Vec<GroupKey>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    records
        .into_iter()
        .map(|record| dimension.key_of(record))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn date_bounds<'a, I>(records: I) -> Option<(NaiveDate, NaiveDate)>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    records
        .into_iter()
        .map(CallRecord::date)
        .minmax()
        .into_option()
}

pub fn total_minutes<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    records.into_iter().map(CallRecord::duration_minutes).sum()
}

/// Mean call length in minutes; `None` when there are no records.
pub fn mean_minutes<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let (count, sum) = records
        .into_iter()
        .fold((0usize, 0.0f64), |(count, sum), record| {
            (count + 1, sum + record.duration_minutes())
        });
    (count > 0).then(|| sum / count as f64)
}

/// The set of translated result labels counted as lost calls.
///
/// Reports disagree on whether busy and failed calls are losses, so the set
/// is always passed explicitly. The presets cover the variants in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossLabels(BTreeSet<String>);

impl LossLabels {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(Into::into).collect())
    }

    /// Missed calls and anything that ended in voicemail.
    pub fn dashboard() -> Self {
        Self::new([RESULT_MISSED, RESULT_VOICEMAIL, RESULT_SENT_TO_VOICEMAIL])
    }

    pub fn missed_and_rejected() -> Self {
        Self::new([RESULT_MISSED, RESULT_REJECTED])
    }

    pub fn all_unsuccessful() -> Self {
        Self::new([
            RESULT_MISSED,
            RESULT_REJECTED,
            RESULT_VOICEMAIL,
            RESULT_SENT_TO_VOICEMAIL,
            RESULT_BUSY,
            RESULT_FAILED,
            RESULT_HUNG_UP_ON_HOLD,
            RESULT_HUNG_UP_IN_QUEUE,
        ])
    }

    /// Resolves a preset name (`dashboard`, `missed-rejected`, `all`) or a
    /// comma-separated label list.
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.trim() {
            "dashboard" => Some(Self::dashboard()),
            "missed-rejected" => Some(Self::missed_and_rejected()),
            "all" => Some(Self::all_unsuccessful()),
            other => {
                let labels = other
                    .split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .collect::<Vec<_>>();
                (!labels.is_empty()).then(|| Self::new(labels))
            }
        }
    }

    pub fn contains(&self, result: &str) -> bool {
        self.0.contains(result)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for LossLabels {
    fn default() -> Self {
        Self::dashboard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LossRate {
    pub lost: usize,
    pub total: usize,
    pub percent: f64,
}

/// Share of records whose result is in `labels`, as a percentage. An empty
/// input yields `0%` over a total of zero.
pub fn loss_rate<'a, I>(records: I, labels: &LossLabels) -> LossRate
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let (lost, total) = records
        .into_iter()
        .fold((0usize, 0usize), |(lost, total), record| {
            (lost + usize::from(labels.contains(record.result())), total + 1)
        });
    let percent = if total > 0 {
        lost as f64 / total as f64 * 100.0
    } else {
        0.0
    };
    LossRate {
        lost,
        total,
        percent,
    }
}

/// Headline metrics for a set of calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_calls: usize,
    pub total_minutes: f64,
    pub mean_minutes: Option<f64>,
    pub loss: LossRate,
}

impl Summary {
    pub fn compute<'a, I>(records: I, labels: &LossLabels) -> Self
    where
        I: IntoIterator<Item = &'a CallRecord>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();
        let total_minutes = total_minutes(records.clone());
        let loss = loss_rate(records, labels);
        Self {
            total_calls: loss.total,
            total_minutes,
            mean_minutes: (loss.total > 0).then(|| total_minutes / loss.total as f64),
            loss,
        }
    }
}

/// Call counts per weekday (rows, Monday first) and hour (columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heatmap {
    cells: [[usize; HOURS_PER_DAY]; 7],
}

impl Heatmap {
    pub fn get(&self, weekday: Weekday, hour: u32) -> usize {
        self.cells[weekday.index()]
            .get(hour as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn row(&self, weekday: Weekday) -> &[usize; HOURS_PER_DAY] {
        &self.cells[weekday.index()]
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().sum()
    }
}

pub fn heatmap<'a, I>(records: I) -> Heatmap
where
    I: IntoIterator<Item = &'a CallRecord>,
{
    let mut cells = [[0usize; HOURS_PER_DAY]; 7];
    for record in records {
        if let Some(cell) = cells[record.weekday().index()].get_mut(record.hour() as usize) {
            *cell += 1;
        }
    }
    Heatmap { cells }
}
