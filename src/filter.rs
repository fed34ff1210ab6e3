//! Record filters.
//!
//! A [`FilterSpec`] is a conjunction of optional constraints. Absent
//! constraints, empty membership sets and empty search text all mean "no
//! constraint on that dimension". Filtering never reorders records.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::record::CallRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub directions: BTreeSet<String>,
    pub results: BTreeSet<String>,
    pub origins: BTreeSet<String>,
    pub participants: Option<String>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive on both ends; pass the same date twice for a single day.
    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_directions<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.directions = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_results<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.results = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_origins<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.origins = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_participants(mut self, pattern: impl Into<String>) -> Self {
        self.participants = Some(pattern.into());
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.start.is_none()
            && self.end.is_none()
            && self.directions.is_empty()
            && self.results.is_empty()
            && self.origins.is_empty()
            && self.search_needle().is_none()
    }

    pub fn matches(&self, record: &CallRecord) -> bool {
        self.matches_with_needle(record, self.search_needle().as_deref())
    }

    /// Returns the matching records in their original order.
    pub fn apply<'a>(&self, records: &'a [CallRecord]) -> MatchedCalls<'a> {
        let needle = self.search_needle();
        MatchedCalls {
            records: records
                .iter()
                .filter(|record| self.matches_with_needle(record, needle.as_deref()))
                .collect(),
        }
    }

    fn search_needle(&self) -> Option<String> {
        self.participants
            .as_deref()
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_lowercase)
    }

    fn matches_with_needle(&self, record: &CallRecord, needle: Option<&str>) -> bool {
        let date = record.date();
        if self.start.is_some_and(|start| date < start) {
            return false;
        }
        if self.end.is_some_and(|end| date > end) {
            return false;
        }
        if !allows(&self.directions, record.direction())
            || !allows(&self.results, record.result())
            || !allows(&self.origins, record.origin())
        {
            return false;
        }
        match needle {
            Some(needle) => record.participants().to_lowercase().contains(needle),
            None => true,
        }
    }
}

fn allows(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

/// The subsequence of records matched by a [`FilterSpec`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedCalls<'a> {
    records: Vec<&'a CallRecord>,
}

impl<'a> MatchedCalls<'a> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, &'a CallRecord>> {
        self.records.iter().copied()
    }

    pub fn into_vec(self) -> Vec<&'a CallRecord> {
        self.records
    }
}

impl<'v, 'a> IntoIterator for &'v MatchedCalls<'a> {
    type Item = &'a CallRecord;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a CallRecord>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}
