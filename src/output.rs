//! Rendering of scan reports.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::format_number;
use crate::scan::{Outcome, ScanReport};

#[derive(Debug, Error)]
#[error("unknown output format: {0}")]
pub struct UnknownFormat(String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

/// Totals across all reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub matches: usize,
    pub sources: usize,
    pub errors: usize,
    pub chars: usize,
}

impl Summary {
    pub fn of(reports: &[ScanReport]) -> Self {
        reports.iter().fold(Summary::default(), |mut acc, r| {
            acc.matches += r.match_count();
            acc.sources += 1;
            acc.chars += r.chars;
            if r.is_error() {
                acc.errors += 1;
            }
            acc
        })
    }

    /// Process exit status: 0 when something matched, 1 when nothing did,
    /// 2 when every source failed.
    pub fn exit_status(&self) -> u8 {
        if self.sources > 0 && self.errors == self.sources {
            2
        } else if self.matches == 0 {
            1
        } else {
            0
        }
    }
}

/// Write every report. `count_only` prints one count per source instead of
/// individual matches (text format only).
pub fn write_reports(
    out: &mut impl Write,
    reports: &[ScanReport],
    format: OutputFormat,
    count_only: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports).map_err(io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for report in reports {
                match &report.outcome {
                    Outcome::Error(e) => writeln!(out, "{}: error: {}", report.source, e)?,
                    Outcome::Matches(locs) if count_only => {
                        writeln!(out, "{}:{}", report.source, locs.len())?
                    }
                    Outcome::Matches(locs) => {
                        for loc in locs {
                            writeln!(
                                out,
                                "{}:{}:{}:{}",
                                report.source, loc.line, loc.column, loc.offset
                            )?;
                        }
                    }
                }
            }
        }
    }
    Ok(())
}

/// Treat a reader that went away (`bmfind ... | head`) as a normal end of
/// output.
pub fn ignore_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// One-line human summary, e.g. `3 matches in 2 sources (1,024 chars scanned)`.
pub fn summary_line(summary: &Summary) -> String {
    let mut line = format!(
        "{} {} in {} {} ({} chars scanned)",
        format_number(summary.matches as u64),
        plural(summary.matches, "match", "matches"),
        summary.sources,
        plural(summary.sources, "source", "sources"),
        format_number(summary.chars as u64),
    );
    if summary.errors > 0 {
        line.push_str(&format!(", {} failed", summary.errors));
    }
    line
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
