pub mod aggregate;
pub mod cli;
pub mod columns;
pub mod commands;
pub mod error;
pub mod filter;
pub mod format;
pub mod io_utils;
pub mod normalize;
pub mod profile;
pub mod raw;
pub mod record;
pub mod table;
pub mod timestamp;
pub mod translate;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::{
    error::NormalizeError,
    filter::{FilterSpec, MatchedCalls},
    normalize::{Normalized, normalize},
    raw::{RawRow, RawTable},
    record::{CallRecord, DurationBucket, Weekday},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("cdr_analytics", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Summary(args) => commands::summary(&args),
        Commands::Breakdown(args) => commands::breakdown(&args),
        Commands::Heatmap(args) => commands::heatmap(&args),
        Commands::Records(args) => commands::records(&args),
        Commands::Values(args) => commands::values(&args),
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
