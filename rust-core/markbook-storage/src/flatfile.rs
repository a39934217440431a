// SPDX-License-Identifier: PMPL-1.0-or-later
//! The flat-file snapshot format.
//!
//! One record per line, fields separated by `|` in the order
//! `id|name|programme|mark`, with the mark formatted to exactly two decimal
//! places:
//!
//! ```text
//! 2401234|Michelle Lee|Information Security|73.20
//! ```
//!
//! Loading is tolerant: lines with the wrong field count, unparseable
//! numbers, or invariant-violating values are skipped with a warning rather
//! than failing the whole load.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{debug, warn};

use markbook_core::record::Record;
use markbook_core::store::{StoreError, TableStore};

/// Snapshot store over pipe-delimited text files.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatFileStore;

impl FlatFileStore {
    pub fn new() -> Self {
        Self
    }
}

impl TableStore for FlatFileStore {
    fn load(&self, path: &Path) -> Result<Option<Vec<Record>>, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        let mut records = Vec::new();
        for (number, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_line(line) {
                Some(record) => records.push(record),
                None => warn!(
                    path = %path.display(),
                    line = number + 1,
                    "skipping malformed snapshot line"
                ),
            }
        }
        debug!(path = %path.display(), count = records.len(), "snapshot read");
        Ok(Some(records))
    }

    fn save(&self, path: &Path, records: &[Record]) -> Result<(), StoreError> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            writeln!(
                writer,
                "{}|{}|{}|{:.2}",
                record.id, record.name, record.programme, record.mark
            )?;
        }
        writer.flush()?;
        debug!(path = %path.display(), count = records.len(), "snapshot written");
        Ok(())
    }
}

/// Parse one snapshot line, or `None` if it is malformed.
fn parse_line(line: &str) -> Option<Record> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 4 {
        return None;
    }
    let id = fields[0].trim().parse::<u32>().ok()?;
    let mark = fields[3].trim().parse::<f64>().ok()?;
    let record = Record::new(id, fields[1].trim(), fields[2].trim(), mark);
    record.validate().ok()?;
    Some(record)
}
