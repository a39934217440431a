// SPDX-License-Identifier: PMPL-1.0-or-later
//!
//! Output rendering for command results.
//!
//! Supports three output modes:
//! - **Table**: Human-readable columnar output using `comfy-table`.
//! - **CSV**: Comma-separated values for pipeline consumption.
//! - **JSON**: Pretty-printed JSON via the `Record`/summary serde derives.
//!
//! Marks are always rendered with two decimal places, matching the snapshot
//! format.

use std::fmt;

use comfy_table::{Cell, ContentArrangement, Table};

use markbook_core::query::{ProgrammeSummary, Summary};
use markbook_core::record::Record;

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unknown format '{other}'. Valid formats: table, csv, json"
            )),
        }
    }
}

/// Render a list of records in the selected format, with a row-count
/// trailer in table mode.
pub fn render_records(records: &[Record], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => records_table(records),
        OutputFormat::Csv => records_csv(records),
        OutputFormat::Json => {
            serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
        }
    }
}

/// Render search results: as `render_records`, but table mode carries a
/// match-count trailer.
pub fn render_matches(records: &[Record], format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => {
            let count = records.len();
            format!(
                "{}\n({count} match{})",
                records_grid(records),
                if count == 1 { "" } else { "es" }
            )
        }
        other => render_records(records, other),
    }
}

fn records_table(records: &[Record]) -> String {
    let count = records.len();
    format!(
        "{}\n({count} record{})",
        records_grid(records),
        if count == 1 { "" } else { "s" }
    )
}

fn records_grid(records: &[Record]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("ID"),
        Cell::new("Name"),
        Cell::new("Programme"),
        Cell::new("Mark"),
    ]);
    for record in records {
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.name),
            Cell::new(&record.programme),
            Cell::new(format!("{:.2}", record.mark)),
        ]);
    }
    table
}

fn records_csv(records: &[Record]) -> String {
    let mut output = String::from("id,name,programme,mark\n");
    for record in records {
        output.push_str(&format!(
            "{},{},{},{:.2}\n",
            record.id,
            csv_escape(&record.name),
            csv_escape(&record.programme),
            record.mark
        ));
    }
    output
}

/// Escape a string for CSV output per RFC 4180.
fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render the global summary.
pub fn render_summary(summary: &Summary, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string());
    }
    format!(
        "Total students: {}\n\
         Average mark : {:.2}\n\
         Highest mark : {:.2} ({})\n\
         Lowest mark  : {:.2} ({})\n\
         Grade bands  : A:{}  B:{}  C:{}  D:{}  F:{}",
        summary.count,
        summary.mean,
        summary.highest.mark,
        summary.highest.name,
        summary.lowest.mark,
        summary.lowest.name,
        summary.bands.a,
        summary.bands.b,
        summary.bands.c,
        summary.bands.d,
        summary.bands.f,
    )
}

/// Render the per-programme summary in the selected format.
pub fn render_programme_summary(groups: &[ProgrammeSummary], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(groups).unwrap_or_else(|_| "[]".to_string())
        }
        OutputFormat::Csv => {
            let mut output = String::from("programme,count,mean\n");
            for group in groups {
                output.push_str(&format!(
                    "{},{},{:.2}\n",
                    csv_escape(&group.programme),
                    group.count,
                    group.mean
                ));
            }
            output
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec![
                Cell::new("Programme"),
                Cell::new("Count"),
                Cell::new("Average"),
            ]);
            for group in groups {
                table.add_row(vec![
                    Cell::new(&group.programme),
                    Cell::new(group.count),
                    Cell::new(format!("{:.2}", group.mean)),
                ]);
            }
            table.to_string()
        }
    }
}
