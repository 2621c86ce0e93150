//! JSON report output

use std::io::{self, Write};

use serde::Serialize;

use crate::error::Result;
use crate::size::{Precision, format_size};
use crate::tracker::DirectoryRecord;

use super::Report;

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    root: &'a str,
    limit: usize,
    interrupted: bool,
    directories: Vec<JsonDirectory<'a>>,
}

#[derive(Debug, Serialize)]
struct JsonDirectory<'a> {
    path: &'a str,
    size_bytes: u64,
    size_human: String,
}

impl<'a> From<&'a DirectoryRecord> for JsonDirectory<'a> {
    fn from(record: &'a DirectoryRecord) -> Self {
        Self {
            path: record.path(),
            size_bytes: record.size(),
            size_human: format_size(record.size(), Precision::Report),
        }
    }
}

/// Write the report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    let json = JsonReport {
        root: &report.root,
        limit: report.limit,
        interrupted: report.interrupted,
        directories: report.directories.iter().map(JsonDirectory::from).collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)?;
    Ok(())
}

/// Print the report as JSON to stdout.
pub fn print_json(report: &Report) -> Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    write_json(&mut lock, report)?;
    lock.flush()?;
    Ok(())
}
