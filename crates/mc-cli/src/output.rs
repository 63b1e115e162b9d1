//! Output formatting utilities.
//!
//! The report goes to stdout; status messages go to stderr so the report can
//! be redirected cleanly.

use std::io::Write;

use colored::Colorize;
use mc_hierarchy::{Report, ReportRow};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::config::OutputFormat;

/// Report row representation for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct HierarchyRowDisplay {
    /// Member mail address.
    #[tabled(rename = "EmailAddress")]
    pub email_address: String,
    /// Manager mail address.
    #[tabled(rename = "ManagerEmailAddress")]
    pub manager_email_address: String,
}

impl From<&ReportRow> for HierarchyRowDisplay {
    fn from(row: &ReportRow) -> Self {
        Self {
            email_address: row.member.to_string(),
            manager_email_address: row.manager.to_string(),
        }
    }
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Writes the report in the specified format.
///
/// ## Errors
///
/// Propagates write and serialization failures.
pub fn write_report<W: Write>(
    report: &Report,
    format: OutputFormat,
    out: &mut W,
) -> crate::CliResult<()> {
    match format {
        OutputFormat::Text => report.write_text(out)?,
        OutputFormat::Table => {
            if report.is_empty() {
                info("No group members report to this manager.");
            } else {
                let table = Table::new(display_rows(report))
                    .with(Style::rounded())
                    .to_string();
                writeln!(out, "{table}")?;
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&display_rows(report))?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

fn display_rows(report: &Report) -> Vec<HierarchyRowDisplay> {
    report.rows().iter().map(HierarchyRowDisplay::from).collect()
}
