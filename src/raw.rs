//! Untyped input rows as read from a provider export.

use std::{io::Read, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;

use crate::io_utils;

/// A whole input table held in memory: the header row plus every data row
/// as decoded strings. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn load(path: &Path, delimiter: u8, encoding: &'static Encoding) -> Result<Self> {
        let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)?;
        Self::from_csv_reader(&mut reader, encoding)
            .with_context(|| format!("Reading call records from {path:?}"))
    }

    pub fn from_csv_reader<R: Read>(
        reader: &mut csv::Reader<R>,
        encoding: &'static Encoding,
    ) -> Result<Self> {
        let headers = io_utils::reader_headers(reader, encoding)?;
        let mut rows = Vec::new();
        for (row_idx, record) in reader.byte_records().enumerate() {
            let record = record.with_context(|| format!("Reading row {}", row_idx + 2))?;
            let decoded = io_utils::decode_record(&record, encoding)
                .with_context(|| format!("Decoding row {}", row_idx + 2))?;
            rows.push(decoded);
        }
        debug!("Read {} row(s) across {} column(s)", rows.len(), headers.len());
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = RawRow<'_>> + '_ {
        self.rows.iter().map(|cells| RawRow { cells })
    }
}

/// Borrowed view of one input row. Cells are addressed by the header
/// positions resolved in [`crate::columns::ColumnLayout`].
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    cells: &'a [String],
}

impl<'a> RawRow<'a> {
    pub fn cell(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).map(String::as_str)
    }

}
