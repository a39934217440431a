// SPDX-License-Identifier: PMPL-1.0-or-later
//! The command session: one callable per command verb.
//!
//! A `Session` owns the table, the undo history, the persistence
//! collaborator, and the two pieces of session state the original kept as
//! process globals — the autosave flag and the current snapshot path. The
//! interactive loop maps verbs onto these methods and renders the
//! structured outcomes.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::MarkbookError;
use crate::mutation::{self, UndoReport};
use crate::query::{self, ProgrammeSummary, SearchField, Summary};
use crate::record::Record;
use crate::store::TableStore;
use crate::table::RecordTable;
use crate::undo::UndoStack;

/// Result of an OPEN: either an existing snapshot was loaded, or the path
/// is fresh and will be created on first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Loaded { path: PathBuf, count: usize },
    Fresh { path: PathBuf },
}

/// Outcome of the autosave side effect attached to a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutosaveStatus {
    Saved(PathBuf),
    Failed(String),
}

/// A successful mutation plus its optional autosave outcome.
#[derive(Debug, Clone)]
pub struct MutationReceipt {
    pub record: Record,
    pub autosave: Option<AutosaveStatus>,
}

/// A successful undo plus its optional autosave outcome.
#[derive(Debug, Clone)]
pub struct UndoReceipt {
    pub report: UndoReport,
    pub autosave: Option<AutosaveStatus>,
}

/// One interactive session over a single table.
pub struct Session<S: TableStore> {
    table: RecordTable,
    undo: UndoStack,
    store: S,
    data_dir: PathBuf,
    path: Option<PathBuf>,
    autosave: bool,
}

impl<S: TableStore> Session<S> {
    /// A fresh session with an empty table. Snapshot files are resolved
    /// relative to `data_dir`; autosave starts off.
    pub fn new(store: S, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            table: RecordTable::new(),
            undo: UndoStack::new(),
            store,
            data_dir: data_dir.into(),
            path: None,
            autosave: false,
        }
    }

    pub fn table(&self) -> &RecordTable {
        &self.table
    }

    pub fn autosave_enabled(&self) -> bool {
        self.autosave
    }

    /// The snapshot path established by the last OPEN, if any.
    pub fn open_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// OPEN: derive the snapshot filename from the team name and load it.
    ///
    /// A missing file yields an empty table to be created on first save.
    /// Both the table and the undo history are reset either way.
    pub fn open(&mut self, team: &str) -> Result<OpenOutcome, MarkbookError> {
        let team = team.trim();
        if team.is_empty() {
            return Err(MarkbookError::MissingField("team name".into()));
        }
        let path = self.data_dir.join(format!("{team}-markbook.txt"));
        let loaded = self.store.load(&path)?;

        self.undo.clear();
        self.path = Some(path.clone());
        match loaded {
            Some(records) => {
                self.table = RecordTable::from_records(records);
                let count = self.table.len();
                info!(path = %path.display(), count, "snapshot loaded");
                Ok(OpenOutcome::Loaded { path, count })
            }
            None => {
                self.table = RecordTable::new();
                info!(path = %path.display(), "no snapshot; starting fresh");
                Ok(OpenOutcome::Fresh { path })
            }
        }
    }

    /// SHOW ALL: a copy of the table, optionally sorted by the clause in
    /// `args` (everything after the verb).
    pub fn show_all(&self, args: &str) -> Result<Vec<Record>, MarkbookError> {
        let spec = query::parse_sort_clause(args)?;
        Ok(query::sorted_view(&self.table, spec))
    }

    /// SHOW SUMMARY: `None` when the table is empty.
    pub fn summary(&self) -> Option<Summary> {
        query::summarize(&self.table)
    }

    /// SHOW PROGRAMME SUMMARY: per-programme groups in first-seen order.
    pub fn programme_summary(&self) -> Vec<ProgrammeSummary> {
        query::programme_summary(&self.table)
    }

    /// FIND: case-insensitive substring search over one text field.
    /// Returns the keyword actually searched for alongside the matches.
    pub fn find(
        &self,
        field: SearchField,
        raw: &str,
    ) -> Result<(String, Vec<Record>), MarkbookError> {
        let marker = field.marker();
        let keyword = crate::args::extract(raw, marker)?
            .filter(|k| !k.is_empty())
            .ok_or_else(|| MarkbookError::MissingField(marker.to_string()))?;
        let matches = query::find_containing(&self.table, field, &keyword)
            .into_iter()
            .cloned()
            .collect();
        Ok((keyword, matches))
    }

    /// QUERY ID=n: point lookup.
    pub fn query(&self, raw: &str) -> Result<Record, MarkbookError> {
        let id = mutation::required_id(raw)?;
        let index = self.table.find_by_id(id).ok_or(MarkbookError::NotFound(id))?;
        Ok(self.table.records()[index].clone())
    }

    pub fn insert(&mut self, raw: &str) -> Result<MutationReceipt, MarkbookError> {
        let record = mutation::insert(&mut self.table, &mut self.undo, raw)?;
        let autosave = self.maybe_autosave();
        Ok(MutationReceipt { record, autosave })
    }

    pub fn update(&mut self, raw: &str) -> Result<MutationReceipt, MarkbookError> {
        let record = mutation::update(&mut self.table, &mut self.undo, raw)?;
        let autosave = self.maybe_autosave();
        Ok(MutationReceipt { record, autosave })
    }

    /// Validate a DELETE and return the doomed record for the confirmation
    /// prompt. Nothing is mutated until [`Session::commit_delete`].
    pub fn prepare_delete(&self, raw: &str) -> Result<Record, MarkbookError> {
        mutation::prepare_delete(&self.table, raw)
    }

    pub fn commit_delete(&mut self, id: u32) -> Result<MutationReceipt, MarkbookError> {
        let record = mutation::commit_delete(&mut self.table, &mut self.undo, id)?;
        let autosave = self.maybe_autosave();
        Ok(MutationReceipt { record, autosave })
    }

    /// UNDO: invert the most recent mutation. A successful undo triggers
    /// the same autosave side effect as a direct mutation.
    pub fn undo(&mut self) -> Result<UndoReceipt, MarkbookError> {
        let report = mutation::undo(&mut self.table, &mut self.undo)?;
        let autosave = self.maybe_autosave();
        Ok(UndoReceipt { report, autosave })
    }

    /// SET AUTOSAVE ON|OFF. Returns the new state.
    pub fn set_autosave(&mut self, enabled: bool) -> bool {
        self.autosave = enabled;
        self.autosave
    }

    /// SAVE: persist the table to the path established by OPEN.
    ///
    /// A failed save leaves the in-memory table intact; the error is
    /// reported, not retried.
    pub fn save(&self) -> Result<(PathBuf, usize), MarkbookError> {
        let path = self.path.clone().ok_or(MarkbookError::NoTableOpen)?;
        self.store.save(&path, self.table.records())?;
        info!(path = %path.display(), count = self.table.len(), "snapshot saved");
        Ok((path, self.table.len()))
    }

    /// The autosave side effect: a silent no-op when disabled or when no
    /// table is open, otherwise a save whose outcome is reported inline.
    fn maybe_autosave(&self) -> Option<AutosaveStatus> {
        if !self.autosave {
            return None;
        }
        let path = self.path.as_ref()?;
        Some(match self.store.save(path, self.table.records()) {
            Ok(()) => AutosaveStatus::Saved(path.clone()),
            Err(e) => AutosaveStatus::Failed(e.to_string()),
        })
    }
}
