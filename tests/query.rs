mod common;

use chrono::{NaiveDate, TimeZone};
use proptest::prelude::*;

use cdr_analytics::{
    CallRecord, FilterSpec, Weekday,
    aggregate::{self, Dimension, GroupKey, LossLabels, Summary},
    normalize::normalize,
    timestamp::TARGET_TZ,
};
use common::export_table;

const RESULTS: &[&str] = &[
    "Atendida",
    "Perdida",
    "Rejeitada",
    "Correio de Voz",
    "Ocupado",
];
const ORIGINS: &[&str] = &["Maria", "João", "Ana", "Queue wait"];
const DIRECTIONS: &[&str] = &["Recebida", "Realizada", "Interna"];

fn call(day: u32, hour: u32, ms: f64, origin: &str, direction: &str, result: &str) -> CallRecord {
    let timestamp = TARGET_TZ
        .with_ymd_and_hms(2024, 2, day, hour, 0, 0)
        .unwrap();
    CallRecord::new(timestamp, ms, origin, format!("{origin} line"), direction, result)
}

/// 100 calls; indices divisible by 25 are rejected and by 10 (but not 25)
/// are missed, giving 12 losses under the missed-and-rejected preset.
fn hundred_calls() -> Vec<CallRecord> {
    (0..100u32)
        .map(|idx| {
            let result = if idx % 25 == 0 {
                "Rejeitada"
            } else if idx % 10 == 0 {
                "Perdida"
            } else if idx % 3 == 0 {
                "Ocupado"
            } else {
                "Atendida"
            };
            call(
                1 + idx % 28,
                idx % 24,
                f64::from(idx) * 1_000.0,
                ORIGINS[(idx % 4) as usize],
                DIRECTIONS[(idx % 3) as usize],
                result,
            )
        })
        .collect()
}

#[test]
fn result_set_filter_matches_exactly_the_members() {
    let records = hundred_calls();
    let spec = FilterSpec::new().with_results(["Perdida", "Rejeitada"]);
    let matched = spec.apply(&records);
    assert_eq!(matched.len(), 12);
    assert!(
        matched
            .iter()
            .all(|r| r.result() == "Perdida" || r.result() == "Rejeitada")
    );

    let rate = aggregate::loss_rate(&records, &LossLabels::missed_and_rejected());
    assert_eq!(rate.lost, 12);
    assert_eq!(rate.total, 100);
    assert_eq!(rate.percent, 12.0);
}

#[test]
fn matched_view_preserves_input_order() {
    let records = hundred_calls();
    let matched = FilterSpec::new().with_origins(["Ana"]).apply(&records);
    let positions = matched
        .iter()
        .map(|r| {
            records
                .iter()
                .position(|candidate| std::ptr::eq(candidate, r))
                .expect("record from input")
        })
        .collect::<Vec<_>>();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert_eq!(matched.len(), 25);
}

#[test]
fn loss_rate_over_empty_selection_is_zero() {
    let records = hundred_calls();
    let matched = FilterSpec::new().with_origins(["Nobody"]).apply(&records);
    assert!(matched.is_empty());
    let rate = aggregate::loss_rate(&matched, &LossLabels::all_unsuccessful());
    assert_eq!(rate.total, 0);
    assert_eq!(rate.percent, 0.0);
    assert_eq!(aggregate::total_minutes(&matched), 0.0);
    assert_eq!(aggregate::mean_minutes(&matched), None);
}

#[test]
fn breakdowns_from_normalized_export() {
    let table = export_table(&[
        ["2024-01-15T10:00:00Z", "Inbound", "067: Maria", "", "125000", "Missed Call"],
        ["2024-01-15T11:00:00Z", "Inbound", "067: Maria", "", "60000", "Ended successfully"],
        ["2024-01-16T11:00:00Z", "Outbound", "101: João", "", "", "Ended successfully"],
        ["bad", "Inbound", "101: João", "", "", "Busy"],
    ]);
    let normalized = normalize(&table).expect("normalize");
    let records = &normalized.records;

    let by_origin = aggregate::top_n(aggregate::count_by(records, Dimension::Origin), 1);
    assert_eq!(by_origin, vec![(GroupKey::Text("Maria".into()), 2)]);

    let by_weekday = aggregate::sorted_by_key(aggregate::count_by(records, Dimension::Weekday));
    assert_eq!(
        by_weekday,
        vec![
            (GroupKey::Weekday(Weekday::Monday), 2),
            (GroupKey::Weekday(Weekday::Tuesday), 1),
        ]
    );

    let summary = Summary::compute(records, &LossLabels::dashboard());
    assert_eq!(summary.total_calls, 3);
    assert_eq!(summary.loss.lost, 1);
    assert!((summary.total_minutes - (125_000.0 + 60_000.0) / 60_000.0).abs() < 1e-9);
}

fn spec_strategy() -> impl Strategy<Value = FilterSpec> {
    let subset = |values: &'static [&'static str]| {
        proptest::sample::subsequence(values.to_vec(), 0..=values.len())
    };
    (
        proptest::option::of(1u32..=28),
        proptest::option::of(1u32..=28),
        subset(DIRECTIONS),
        subset(RESULTS),
        subset(ORIGINS),
        proptest::option::of(prop_oneof![Just("ana"), Just("MARIA"), Just("line"), Just("")]),
    )
        .prop_map(|(start, end, directions, results, origins, search)| {
            let day = |d: Option<u32>| d.and_then(|d| NaiveDate::from_ymd_opt(2024, 2, d));
            let mut spec = FilterSpec::new()
                .with_date_range(day(start), day(end))
                .with_directions(directions)
                .with_results(results)
                .with_origins(origins);
            if let Some(pattern) = search {
                spec = spec.with_participants(pattern);
            }
            spec
        })
}

proptest! {
    #[test]
    fn adding_a_constraint_never_grows_the_match(
        base in spec_strategy(),
        extra_result in proptest::sample::select(RESULTS.to_vec()),
        extra_origin in proptest::sample::select(ORIGINS.to_vec()),
    ) {
        let records = hundred_calls();
        let before = base.apply(&records).len();

        let mut narrowed = base.clone();
        if narrowed.results.is_empty() {
            narrowed.results.insert(extra_result.to_string());
        }
        prop_assert!(narrowed.apply(&records).len() <= before);

        let mut narrowed = base.clone();
        if narrowed.origins.is_empty() {
            narrowed.origins.insert(extra_origin.to_string());
        }
        prop_assert!(narrowed.apply(&records).len() <= before);

        let mut narrowed = base.clone();
        if narrowed.participants.is_none() {
            narrowed.participants = Some("maria".to_string());
        }
        prop_assert!(narrowed.apply(&records).len() <= before);
    }

    #[test]
    fn empty_membership_sets_equal_absent_filters(base in spec_strategy()) {
        let records = hundred_calls();
        let mut absent = base.clone();
        absent.directions.clear();
        let explicit_empty = absent.clone().with_directions(Vec::<String>::new());
        prop_assert_eq!(
            absent.apply(&records).len(),
            explicit_empty.apply(&records).len()
        );
    }

    #[test]
    fn grouped_counts_cover_every_match(base in spec_strategy()) {
        let records = hundred_calls();
        let matched = base.apply(&records);
        for dimension in [Dimension::Date, Dimension::Origin, Dimension::WeekdayHour, Dimension::Duration] {
            let total: usize = aggregate::count_by(&matched, dimension).values().sum();
            prop_assert_eq!(total, matched.len());
        }
        prop_assert_eq!(aggregate::heatmap(&matched).total(), matched.len());
    }
}
