//! Console report output

use std::io::Write;

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::Result;
use crate::size::{Precision, format_size};

use super::Report;
use super::config::OutputConfig;

/// Write the header followed by one `<size> <path>` line per directory.
pub fn write_report<W: WriteColor>(out: &mut W, report: &Report) -> Result<()> {
    let mut bold = ColorSpec::new();
    bold.set_bold(true);
    out.set_color(&bold)?;
    writeln!(out, "Top {} directories in {}", report.limit, report.root)?;
    out.reset()?;

    let mut size_color = ColorSpec::new();
    size_color.set_fg(Some(Color::Cyan));

    for record in &report.directories {
        out.set_color(&size_color)?;
        write!(out, "{}", format_size(record.size(), Precision::Report))?;
        out.reset()?;
        writeln!(out, " {}", record.path())?;
    }

    Ok(())
}

/// Print the report to stdout with optional color.
pub fn print_report(report: &Report, config: &OutputConfig) -> Result<()> {
    let choice = if config.use_color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);
    write_report(&mut stdout, report)?;
    stdout.flush()?;
    Ok(())
}
