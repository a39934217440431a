// SPDX-License-Identifier: PMPL-1.0-or-later
//! In-memory snapshot store.
//!
//! A map of path to record list behind a `Mutex`. All data is lost on drop.
//! Intended for tests and ephemeral sessions; behaves exactly like the
//! flat-file store as far as the session can observe, minus the text
//! round-trip.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use markbook_core::record::Record;
use markbook_core::store::{StoreError, TableStore};

/// A snapshot store keeping every "file" in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<Record>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of snapshots currently held.
    pub fn file_count(&self) -> usize {
        self.lock().len()
    }

    /// Pre-seed a snapshot, as if a previous session had saved it.
    pub fn seed(&self, path: impl Into<PathBuf>, records: Vec<Record>) {
        self.lock().insert(path.into(), records);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, Vec<Record>>> {
        match self.files.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TableStore for MemoryStore {
    fn load(&self, path: &Path) -> Result<Option<Vec<Record>>, StoreError> {
        Ok(self.lock().get(path).cloned())
    }

    fn save(&self, path: &Path, records: &[Record]) -> Result<(), StoreError> {
        self.lock().insert(path.to_path_buf(), records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_snapshot_is_none() {
        let store = MemoryStore::new();
        assert!(store.load(Path::new("absent.txt")).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let records = vec![Record::new(1, "Ann", "CS", 72.5)];
        store.save(Path::new("t.txt"), &records).unwrap();
        let loaded = store.load(Path::new("t.txt")).unwrap().unwrap();
        assert_eq!(loaded, records);
        assert_eq!(store.file_count(), 1);
    }

    #[test]
    fn test_save_replaces_previous_snapshot() {
        let store = MemoryStore::new();
        store
            .save(Path::new("t.txt"), &[Record::new(1, "Ann", "CS", 72.5)])
            .unwrap();
        store.save(Path::new("t.txt"), &[]).unwrap();
        assert_eq!(store.load(Path::new("t.txt")).unwrap().unwrap().len(), 0);
    }
}
