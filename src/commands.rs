//! Subcommand handlers: load an export, filter it, render the requested view.

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use serde::Serialize;

use crate::{
    aggregate::{self, LossLabels, Summary},
    cli::{BreakdownArgs, FilterArgs, HeatmapArgs, InputArgs, RecordsArgs, SummaryArgs, ValuesArgs},
    filter::{FilterSpec, MatchedCalls},
    format::{format_decimal_minutes, format_minutes, format_percent},
    io_utils,
    normalize::{Normalized, normalize},
    profile::ReportProfile,
    raw::RawTable,
    record::Weekday,
    table::{self, Align},
    translate::{direction_label, result_label},
};

struct Session {
    normalized: Normalized,
    profile: ReportProfile,
}

fn load_session(args: &InputArgs) -> Result<Session> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let profile = match &args.profile {
        Some(path) => ReportProfile::load(path)?,
        None => ReportProfile::default(),
    };
    info!(
        "Loading '{}' (delimiter '{}', encoding {})",
        args.input.display(),
        crate::printable_delimiter(delimiter),
        encoding.name()
    );
    let table = RawTable::load(&args.input, delimiter, encoding)?;
    let normalized =
        normalize(&table).with_context(|| format!("Normalizing {:?}", args.input))?;
    info!(
        "Normalized {} of {} row(s)",
        normalized.records.len(),
        normalized.input_rows
    );
    Ok(Session {
        normalized,
        profile,
    })
}

/// Builds a filter from command-line flags. Values may be given in the
/// export's own vocabulary (`Missed Call`) or as display labels (`Perdida`).
pub fn build_filter(args: &FilterArgs) -> Result<FilterSpec> {
    if let (Some(from), Some(to)) = (args.from, args.to)
        && from > to
    {
        return Err(anyhow!("--from {from} is after --to {to}"));
    }
    let mut spec = FilterSpec::new()
        .with_date_range(args.from, args.to)
        .with_directions(non_blank(&args.directions).map(direction_label))
        .with_results(non_blank(&args.results).map(result_label))
        .with_origins(non_blank(&args.origins));
    if let Some(search) = &args.search {
        spec = spec.with_participants(search.as_str());
    }
    Ok(spec)
}

fn non_blank(values: &[String]) -> impl Iterator<Item = &str> {
    values.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn select<'a>(session: &'a Session, args: &FilterArgs) -> Result<MatchedCalls<'a>> {
    let spec = build_filter(args)?;
    let matched = spec.apply(&session.normalized.records);
    if matched.is_empty() {
        warn!("No calls match the current filters");
    } else if !spec.is_unconstrained() {
        info!(
            "{} of {} call(s) match the current filters",
            matched.len(),
            session.normalized.records.len()
        );
    }
    Ok(matched)
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Serialize)]
struct SummaryReport<'a> {
    #[serde(flatten)]
    summary: &'a Summary,
    loss_labels: Vec<&'a str>,
    input_rows: usize,
    skipped_rows: usize,
    first_date: Option<String>,
    last_date: Option<String>,
}

pub fn summary(args: &SummaryArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let labels = match &args.loss_labels {
        Some(spec) => LossLabels::parse(spec)
            .ok_or_else(|| anyhow!("--loss-labels must name a preset or at least one label"))?,
        None => session.profile.loss_labels(),
    };
    let matched = select(&session, &args.filter)?;
    let summary = Summary::compute(&matched, &labels);

    if args.json {
        let bounds = aggregate::date_bounds(&matched);
        let report = SummaryReport {
            summary: &summary,
            loss_labels: labels.labels().collect(),
            input_rows: session.normalized.input_rows,
            skipped_rows: session.normalized.skipped_rows,
            first_date: bounds.map(|(first, _)| first.to_string()),
            last_date: bounds.map(|(_, last)| last.to_string()),
        };
        let rendered =
            serde_json::to_string_pretty(&report).context("Serializing summary report")?;
        println!("{rendered}");
        return Ok(());
    }

    let rows = vec![
        vec!["total calls".to_string(), summary.total_calls.to_string()],
        vec![
            "total time".to_string(),
            format_minutes(summary.total_minutes),
        ],
        vec![
            "mean time".to_string(),
            summary
                .mean_minutes
                .map(format_minutes)
                .unwrap_or_else(|| "-".to_string()),
        ],
        vec![
            "loss rate".to_string(),
            format!(
                "{} ({} calls)",
                format_percent(summary.loss.percent),
                summary.loss.lost
            ),
        ],
    ];
    table::print_table(&headers(&["metric", "value"]), &rows, &[Align::Left, Align::Right]);
    Ok(())
}

pub fn breakdown(args: &BreakdownArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let matched = select(&session, &args.filter)?;
    let counts = aggregate::count_by(&matched, args.by);
    let groups = if args.by.is_ordinal() {
        aggregate::sorted_by_key(counts)
    } else {
        let top = args.top.unwrap_or_else(|| session.profile.top());
        aggregate::top_n(counts, top)
    };

    let total = matched.len();
    let rows = groups
        .iter()
        .map(|(key, count)| {
            let percent = if total > 0 {
                *count as f64 / total as f64 * 100.0
            } else {
                0.0
            };
            vec![key.to_string(), count.to_string(), format!("{percent:.2}%")]
        })
        .collect::<Vec<_>>();
    table::print_table(
        &headers(&[args.by.column_name(), "count", "percent"]),
        &rows,
        &[Align::Left, Align::Right, Align::Right],
    );
    info!(
        "Grouped {} call(s) into {} {} group(s)",
        total,
        rows.len(),
        args.by.column_name()
    );
    Ok(())
}

pub fn heatmap(args: &HeatmapArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let matched = select(&session, &args.filter)?;
    let grid = aggregate::heatmap(&matched);

    let mut header_row = vec!["weekday".to_string()];
    header_row.extend((0..aggregate::HOURS_PER_DAY).map(|hour| format!("{hour:02}")));
    header_row.push("total".to_string());

    let rows = Weekday::ALL
        .iter()
        .map(|&day| {
            let mut row = vec![day.label().to_string()];
            row.extend(
                (0u32..)
                    .take(aggregate::HOURS_PER_DAY)
                    .map(|hour| grid.get(day, hour).to_string()),
            );
            row.push(grid.row(day).iter().sum::<usize>().to_string());
            row
        })
        .collect::<Vec<_>>();

    let mut align = vec![Align::Left];
    align.extend(std::iter::repeat_n(Align::Right, aggregate::HOURS_PER_DAY + 1));
    table::print_table(&header_row, &rows, &align);
    Ok(())
}

pub fn records(args: &RecordsArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let matched = select(&session, &args.filter)?;

    let mut listing = matched.into_vec();
    listing.sort_by(|a, b| b.timestamp().cmp(a.timestamp()));
    if let Some(limit) = args.limit {
        listing.truncate(limit);
    }

    let header_row = headers(&["timestamp", "direction", "origin", "result", "minutes"]);
    let rows = listing
        .iter()
        .map(|record| {
            vec![
                record.timestamp().format("%Y-%m-%d %H:%M:%S").to_string(),
                record.direction().to_string(),
                record.origin().to_string(),
                record.result().to_string(),
                format_decimal_minutes(record.duration_minutes()),
            ]
        })
        .collect::<Vec<_>>();

    if args.table {
        let align = [Align::Left, Align::Left, Align::Left, Align::Left, Align::Right];
        table::print_table(&header_row, &rows, &align);
    } else {
        let mut writer = io_utils::open_csv_writer(args.output.as_deref(), b',')?;
        writer
            .write_record(&header_row)
            .context("Writing header row")?;
        for row in &rows {
            writer.write_record(row).context("Writing record")?;
        }
        writer.flush().context("Flushing output")?;
    }
    info!("Listed {} call(s)", rows.len());
    Ok(())
}

pub fn values(args: &ValuesArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    let matched = select(&session, &args.filter)?;
    let rows = aggregate::distinct_values(&matched, args.by)
        .into_iter()
        .map(|key| vec![key.to_string()])
        .collect::<Vec<_>>();
    table::print_table(&headers(&[args.by.column_name()]), &rows, &[]);
    Ok(())
}
