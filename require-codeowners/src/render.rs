use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

use crate::report::{Report, ValidationError};

/// How a report is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable text on stderr plus a markdown summary on stdout
    #[default]
    Github,
    /// Human-readable text only
    Text,
    /// JSON on stdout
    Json,
}

/// Write `report` in `format` to the given stdout and stderr streams.
pub fn render(
    report: &Report,
    format: Format,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> io::Result<()> {
    match format {
        Format::Github => {
            write_text(report, stdout, stderr)?;
            if !report.is_success() {
                write_markdown(report, stdout)?;
            }
            Ok(())
        }
        Format::Text => write_text(report, stdout, stderr),
        Format::Json => write_json(report, stdout),
    }
}

/// Success goes to `stdout`; failures are listed on `stderr`.
pub fn write_text(
    report: &Report,
    stdout: &mut impl Write,
    stderr: &mut impl Write,
) -> io::Result<()> {
    if report.is_success() {
        writeln!(stdout, "✓ all directories have CODEOWNERS coverage")?;
        return Ok(());
    }

    writeln!(stderr)?;
    for error in report.errors() {
        writeln!(stderr, "  ✗ {}", error.path)?;
        writeln!(stderr, "    {}", error.message)?;
    }
    writeln!(stderr)?;
    writeln!(
        stderr,
        "✗ {} {} failed CODEOWNERS check",
        report.len(),
        pluralize(report.len(), "directory", "directories")
    )
}

/// A markdown summary suitable for a GitHub Actions job summary.
pub fn write_markdown(report: &Report, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "## ❌ CODEOWNERS Check Failed")?;
    writeln!(out)?;
    writeln!(out, "| Path | Issue |")?;
    writeln!(out, "|------|-------|")?;
    for error in report.errors() {
        writeln!(out, "| `{}` | {} |", error.path, error.message.replace('|', "\\|"))?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "**{} {}** need attention.",
        report.len(),
        pluralize(report.len(), "directory", "directories")
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    success: bool,
    errors: &'a [ValidationError],
}

pub fn write_json(report: &Report, out: &mut impl Write) -> io::Result<()> {
    let json = JsonReport {
        success: report.is_success(),
        errors: report.errors(),
    };
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)
}

fn pluralize<'a>(n: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if n == 1 {
        singular
    } else {
        plural
    }
}
