use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::aggregate::Dimension;

#[derive(Debug, Parser)]
#[command(author, version, about = "Summarize telephony call-detail-record exports", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print headline metrics: volume, talk time, mean time and loss rate
    Summary(SummaryArgs),
    /// Count calls grouped by one dimension
    Breakdown(BreakdownArgs),
    /// Print a weekday by hour grid of call counts
    Heatmap(HeatmapArgs),
    /// List matching calls, newest first
    Records(RecordsArgs),
    /// List the distinct values of a dimension
    Values(ValuesArgs),
}

#[derive(Debug, Clone, Args)]
pub struct InputArgs {
    /// Call export CSV file (`-` reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML report profile with loss labels and display defaults
    #[arg(long)]
    pub profile: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// First date to include (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long = "from", value_parser = parse_date)]
    pub from: Option<NaiveDate>,
    /// Last date to include (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long = "to", value_parser = parse_date)]
    pub to: Option<NaiveDate>,
    /// Keep only these directions (repeatable or comma-separated)
    #[arg(long = "direction", action = clap::ArgAction::Append, value_delimiter = ',')]
    pub directions: Vec<String>,
    /// Keep only these call results (repeatable or comma-separated)
    #[arg(long = "result", action = clap::ArgAction::Append, value_delimiter = ',')]
    pub results: Vec<String>,
    /// Keep only this agent (repeatable; names may contain commas)
    #[arg(long = "origin", action = clap::ArgAction::Append)]
    pub origins: Vec<String>,
    /// Case-insensitive text to look for in the participant list
    #[arg(long = "search")]
    pub search: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Results counted as lost: `dashboard`, `missed-rejected`, `all` or a comma-separated label list
    #[arg(long = "loss-labels")]
    pub loss_labels: Option<String>,
    /// Emit the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct BreakdownArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Dimension to group by
    #[arg(long = "by", value_enum)]
    pub by: Dimension,
    /// Keep only the N largest groups of a categorical dimension (0 = all)
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Debug, Args)]
pub struct HeatmapArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Render the listing as a table on stdout
    #[arg(long = "table", conflicts_with = "output")]
    pub table: bool,
    /// Limit number of rows emitted
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Debug, Args)]
pub struct ValuesArgs {
    #[command(flatten)]
    pub input: InputArgs,
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Dimension whose values are listed
    #[arg(long = "by", value_enum)]
    pub by: Dimension,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| format!("Failed to parse '{trimmed}' as a date (use YYYY-MM-DD or DD/MM/YYYY)"))
}
