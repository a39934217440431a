// SPDX-License-Identifier: PMPL-1.0-or-later
//! The record table: the authoritative, insertion-ordered collection.
//!
//! The table owns the uniqueness and range invariants. All mutation is by
//! index after a successful lookup; updates never reorder, deletes shift the
//! remainder left by one.

use tracing::warn;

use crate::error::MarkbookError;
use crate::record::Record;

/// Capacity ceiling for a table. A configuration constant, not a memory
/// limit: the backing vector grows on demand.
pub const MAX_RECORDS: usize = 10_000;

/// The in-memory table of records.
#[derive(Debug, Clone)]
pub struct RecordTable {
    records: Vec<Record>,
    limit: usize,
}

impl RecordTable {
    /// Create an empty table with the standard capacity ceiling.
    pub fn new() -> Self {
        Self::with_limit(MAX_RECORDS)
    }

    /// A table with a non-default ceiling, for tests exercising the
    /// capacity paths.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            limit,
        }
    }

    /// Build a table from a loaded snapshot, enforcing the table invariants.
    ///
    /// Records that fail validation or duplicate an earlier id are skipped
    /// with a warning; loading is tolerant, never fatal.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::new();
        for record in records {
            let id = record.id;
            if let Err(e) = table.insert(record) {
                warn!(id, error = %e, "skipping record from snapshot");
            }
        }
        table
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Index of the record with the given id, if present.
    pub fn find_by_id(&self, id: u32) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Append a record, enforcing validity, uniqueness, and capacity.
    pub fn insert(&mut self, record: Record) -> Result<(), MarkbookError> {
        record.validate()?;
        if self.find_by_id(record.id).is_some() {
            return Err(MarkbookError::DuplicateId(record.id));
        }
        if self.records.len() >= self.limit {
            return Err(MarkbookError::MaxCapacity);
        }
        self.records.push(record);
        Ok(())
    }

    /// Overwrite the record at `index` in place. The replacement must be
    /// valid and keep the same id; the record does not move.
    pub fn replace(&mut self, index: usize, record: Record) -> Result<(), MarkbookError> {
        record.validate()?;
        if self.records[index].id != record.id {
            // Identity keys are immutable; a different id at the same slot
            // could silently break uniqueness.
            return Err(MarkbookError::InvalidId);
        }
        self.records[index] = record;
        Ok(())
    }

    /// Remove and return the record at `index`, shifting the remainder left.
    pub fn remove_at(&mut self, index: usize) -> Record {
        self.records.remove(index)
    }
}

impl Default for RecordTable {
    fn default() -> Self {
        Self::new()
    }
}
