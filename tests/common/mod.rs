#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use cdr_analytics::RawTable;
use tempfile::{TempDir, tempdir};

pub const EXPORT_HEADERS: &[&str] = &[
    "Date [America/Sao_Paulo]",
    "Direction",
    "From",
    "Participants",
    "Duration [Milliseconds]",
    "Call Result",
];

/// A small export covering translated, untranslated and defaulted values.
pub const SAMPLE_EXPORT: &str = "\
Date [America/Sao_Paulo],Direction,From,Participants,Duration [Milliseconds],Call Result
2024-01-15T10:00:00Z,Inbound,067: Maria,+55 11 5555-0101,125000,Missed Call
2024-01-15T12:30:00Z,Inbound,067: Maria,ACME Ltda,300000,Ended successfully
2024-01-16T14:00:00Z,Outbound,101: João,+55 21 5555-0202,60000,Ended successfully
not-a-date,Inbound,101: João,,1000,Busy
2024-01-20T18:45:00Z,Inbound,Wait in queue,+55 11 5555-0303,,Hung up (in queue)
2024-01-21T01:15:00Z,Internal,,Ramal 200,45000,Sent to voicemail
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}

/// Builds an in-memory table in [`EXPORT_HEADERS`] column order.
pub fn export_table(rows: &[[&str; 6]]) -> RawTable {
    RawTable::new(
        EXPORT_HEADERS.iter().map(|s| s.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect(),
    )
}
