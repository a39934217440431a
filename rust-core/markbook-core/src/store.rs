// SPDX-License-Identifier: PMPL-1.0-or-later
//! The persistence seam.
//!
//! The session consumes exactly two operations from its persistence
//! collaborator: load a snapshot and save one. Implementations live in
//! `markbook-storage`; the trait lives here so the core stays free of any
//! file-format knowledge.

use std::path::Path;

use thiserror::Error;

use crate::record::Record;

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An I/O failure in the underlying store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A table snapshot store.
pub trait TableStore {
    /// Load the snapshot at `path`.
    ///
    /// Returns `Ok(None)` when no snapshot exists there — a missing file is
    /// a fresh table, not an error.
    fn load(&self, path: &Path) -> Result<Option<Vec<Record>>, StoreError>;

    /// Persist `records` to `path`, replacing any previous snapshot.
    fn save(&self, path: &Path, records: &[Record]) -> Result<(), StoreError>;
}
