//! Raw export rows to canonical [`CallRecord`]s.
//!
//! The only row-level rejection is an unresolvable timestamp. Every other
//! field has a total fallback: durations coerce to zero, origins to a
//! sentinel, categorical values to their trimmed source text.

use std::sync::OnceLock;

use log::{debug, info};
use regex::Regex;

use crate::{
    columns::ColumnLayout,
    error::NormalizeError,
    raw::RawTable,
    record::CallRecord,
    timestamp::{parse_instant, to_target},
    translate::{direction_label, result_label},
};

pub const UNKNOWN_ORIGIN: &str = "Unknown";
pub const QUEUE_WAIT_ORIGIN: &str = "Queue wait";
const RAW_QUEUE_WAIT: &str = "Wait in queue";

/// Output of [`normalize`]: the canonical records plus row diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub records: Vec<CallRecord>,
    pub input_rows: usize,
    pub skipped_rows: usize,
}

pub fn normalize(table: &RawTable) -> Result<Normalized, NormalizeError> {
    let layout = ColumnLayout::resolve(table.headers())?;
    let naive_zone = layout.timestamp_source.naive_zone();
    debug!(
        "Reading timestamps from '{}'",
        layout.timestamp_source.column_name()
    );

    let mut records = Vec::with_capacity(table.len());
    let mut skipped_rows = 0usize;

    for (row_idx, row) in table.rows().enumerate() {
        let raw_timestamp = row.cell(layout.timestamp).unwrap_or("");
        let Some(instant) = parse_instant(raw_timestamp, naive_zone) else {
            debug!(
                "Skipping row {}: unparseable timestamp '{}'",
                row_idx + 2,
                raw_timestamp
            );
            skipped_rows += 1;
            continue;
        };

        records.push(CallRecord::new(
            to_target(instant),
            coerce_duration_ms(row.cell(layout.duration)),
            clean_origin(row.cell(layout.origin)),
            layout
                .participants
                .and_then(|idx| row.cell(idx))
                .unwrap_or("")
                .trim(),
            direction_label(row.cell(layout.direction).unwrap_or("")),
            result_label(row.cell(layout.result).unwrap_or("")),
        ));
    }

    if skipped_rows > 0 {
        info!(
            "Skipped {} of {} row(s) with unparseable timestamps",
            skipped_rows,
            table.len()
        );
    }

    Ok(Normalized {
        records,
        input_rows: table.len(),
        skipped_rows,
    })
}

/// Parses a millisecond duration, falling back to zero for blanks, garbage,
/// negative and non-finite values.
pub fn coerce_duration_ms(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(0.0)
}

/// Trims the origin, strips a leading `<digits>:` extension prefix once and
/// applies the two identity sentinels.
pub fn clean_origin(raw: Option<&str>) -> String {
    let trimmed = raw.map(str::trim).unwrap_or("");
    let stripped = origin_prefix().replace(trimmed, "");
    match stripped.trim_end() {
        "" | "nan" | "NaN" => UNKNOWN_ORIGIN.to_string(),
        RAW_QUEUE_WAIT => QUEUE_WAIT_ORIGIN.to_string(),
        other => other.to_string(),
    }
}

fn origin_prefix() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]+:\s*").expect("origin prefix pattern is valid"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    use crate::record::Weekday;

    const HEADERS: &[&str] = &[
        "Date [America/Sao_Paulo]",
        "Duration [Milliseconds]",
        "From",
        "Participants",
        "Direction",
        "Call Result",
    ];

    fn table(rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            HEADERS.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn normalizes_reference_row() {
        let input = table(&[&[
            "2024-01-15T10:00:00Z",
            "125000",
            "067: Maria",
            " +55 11 5555-0101 ",
            "Inbound",
            "Missed Call",
        ]]);
        let normalized = normalize(&input).expect("normalize");
        assert_eq!(normalized.records.len(), 1);
        assert_eq!(normalized.skipped_rows, 0);

        let record = &normalized.records[0];
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(record.hour(), 7);
        assert_eq!(record.timestamp().hour(), 7);
        assert_eq!(record.weekday(), Weekday::Monday);
        assert!((record.duration_minutes() - 2.0833).abs() < 1e-3);
        assert_eq!(record.origin(), "Maria");
        assert_eq!(record.participants(), "+55 11 5555-0101");
        assert_eq!(record.direction(), "Recebida");
        assert_eq!(record.result(), "Perdida");
    }

    #[test]
    fn unparseable_timestamp_drops_only_that_row() {
        let input = table(&[
            &["not-a-date", "1000", "Ana", "", "Inbound", "Busy"],
            &["2024-01-15 09:00:00", "abc", "", "", "Outbound", "Weird"],
        ]);
        let normalized = normalize(&input).expect("normalize");
        assert_eq!(normalized.input_rows, 2);
        assert_eq!(normalized.skipped_rows, 1);
        assert_eq!(normalized.records.len(), 1);

        let record = &normalized.records[0];
        assert_eq!(record.hour(), 9);
        assert_eq!(record.duration_ms(), 0.0);
        assert_eq!(record.origin(), UNKNOWN_ORIGIN);
        assert_eq!(record.direction(), "Realizada");
        assert_eq!(record.result(), "Weird");
    }

    #[test]
    fn short_rows_default_trailing_fields() {
        let input = table(&[&["2024-01-15 09:00:00", "60000", "12: Wait in queue"]]);
        let normalized = normalize(&input).expect("normalize");
        let record = &normalized.records[0];
        assert_eq!(record.origin(), QUEUE_WAIT_ORIGIN);
        assert_eq!(record.participants(), "");
        assert_eq!(record.direction(), "");
        assert_eq!(record.result(), "");
        assert_eq!(record.duration_minutes(), 1.0);
    }

    #[test]
    fn missing_required_column_fails_before_rows() {
        let input = RawTable::new(
            vec!["Date".into(), "From".into(), "Direction".into(), "Call Result".into()],
            vec![vec!["garbage".into()]],
        );
        let err = normalize(&input).unwrap_err();
        assert_eq!(err.missing_columns(), &["Duration [Milliseconds]".to_string()]);
    }

    #[test]
    fn duration_coercion_is_total() {
        assert_eq!(coerce_duration_ms(None), 0.0);
        assert_eq!(coerce_duration_ms(Some("")), 0.0);
        assert_eq!(coerce_duration_ms(Some("n/a")), 0.0);
        assert_eq!(coerce_duration_ms(Some("-300")), 0.0);
        assert_eq!(coerce_duration_ms(Some("NaN")), 0.0);
        assert_eq!(coerce_duration_ms(Some("inf")), 0.0);
        assert_eq!(coerce_duration_ms(Some(" 1500 ")), 1500.0);
        assert_eq!(coerce_duration_ms(Some("1.5e3")), 1500.0);
    }

    #[test]
    fn origin_cleanup_strips_prefix_once_from_start() {
        assert_eq!(clean_origin(Some("067: Maria")), "Maria");
        assert_eq!(clean_origin(Some("  101:João Silva ")), "João Silva");
        assert_eq!(clean_origin(Some("12: 34: Nested")), "34: Nested");
        assert_eq!(clean_origin(Some("Front Desk 12: x")), "Front Desk 12: x");
        assert_eq!(clean_origin(Some("Wait in queue")), QUEUE_WAIT_ORIGIN);
        assert_eq!(clean_origin(Some("nan")), UNKNOWN_ORIGIN);
        assert_eq!(clean_origin(Some("067: ")), UNKNOWN_ORIGIN);
        assert_eq!(clean_origin(None), UNKNOWN_ORIGIN);
    }
}
