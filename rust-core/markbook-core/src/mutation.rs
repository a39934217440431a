// SPDX-License-Identifier: PMPL-1.0-or-later
//! The mutation engine: insert, update, delete, and undo.
//!
//! Each operation parses its arguments from the raw command line, validates
//! fully before touching the table, commits, and then records a reversible
//! action. A failed operation leaves both the table and the history exactly
//! as they were.

use std::fmt;

use tracing::debug;

use crate::args::{self, Field};
use crate::error::{MarkbookError, UndoFailure};
use crate::record::Record;
use crate::table::RecordTable;
use crate::undo::{ReversibleAction, UndoStack};

/// The three mutation kinds, for reporting what an undo reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            MutationKind::Insert => "INSERT",
            MutationKind::Update => "UPDATE",
            MutationKind::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// What a successful undo reverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoReport {
    pub kind: MutationKind,
    pub id: u32,
}

/// Extract and strictly parse the mandatory ID argument.
pub(crate) fn required_id(raw: &str) -> Result<u32, MarkbookError> {
    match args::extract(raw, Field::Id)? {
        Some(value) => args::parse_id(&value),
        None => Err(MarkbookError::MissingField("ID".into())),
    }
}

/// Extract an optional field, treating a present-but-blank value as absent.
fn optional_text(raw: &str, field: Field) -> Result<Option<String>, MarkbookError> {
    Ok(args::extract(raw, field)?.filter(|v| !v.trim().is_empty()))
}

/// INSERT: append a new record. Requires ID, NAME, PROGRAMME, and MARK.
pub fn insert(
    table: &mut RecordTable,
    undo: &mut UndoStack,
    raw: &str,
) -> Result<Record, MarkbookError> {
    let id = required_id(raw)?;
    if table.find_by_id(id).is_some() {
        return Err(MarkbookError::DuplicateId(id));
    }

    let name = optional_text(raw, Field::Name)?;
    let programme = optional_text(raw, Field::Programme)?;
    let mark_raw = optional_text(raw, Field::Mark)?;

    let mut missing = Vec::new();
    if name.is_none() {
        missing.push("NAME");
    }
    if programme.is_none() {
        missing.push("PROGRAMME");
    }
    if mark_raw.is_none() {
        missing.push("MARK");
    }
    let (Some(name), Some(programme), Some(mark_raw)) = (name, programme, mark_raw) else {
        return Err(MarkbookError::MissingField(missing.join(", ")));
    };

    let mark = args::parse_mark(&mark_raw)?;
    let record = Record::new(id, name, programme, mark);
    table.insert(record.clone())?;
    undo.push(ReversibleAction::Insert {
        after: record.clone(),
    });
    debug!(id, "record inserted");
    Ok(record)
}

/// UPDATE: overwrite the supplied fields of an existing record. The id is
/// immutable; unspecified fields keep their prior values.
pub fn update(
    table: &mut RecordTable,
    undo: &mut UndoStack,
    raw: &str,
) -> Result<Record, MarkbookError> {
    let id = required_id(raw)?;
    let index = table.find_by_id(id).ok_or(MarkbookError::NotFound(id))?;

    let name = optional_text(raw, Field::Name)?;
    let programme = optional_text(raw, Field::Programme)?;
    let mark_raw = optional_text(raw, Field::Mark)?;

    if name.is_none() && programme.is_none() && mark_raw.is_none() {
        return Err(MarkbookError::NoFieldsToUpdate);
    }
    let mark = match mark_raw {
        Some(value) => Some(args::parse_mark(&value)?),
        None => None,
    };

    let before = table.records()[index].clone();
    let mut after = before.clone();
    if let Some(name) = name {
        after.name = name;
    }
    if let Some(programme) = programme {
        after.programme = programme;
    }
    if let Some(mark) = mark {
        after.mark = mark;
    }

    table.replace(index, after.clone())?;
    undo.push(ReversibleAction::Update {
        before,
        after: after.clone(),
    });
    debug!(id, "record updated");
    Ok(after)
}

/// Validate a DELETE and return the doomed record, without mutating.
///
/// The caller (an external confirmation prompt) decides whether to proceed
/// with [`commit_delete`]; declining leaves no trace, including no undo
/// entry.
pub fn prepare_delete(table: &RecordTable, raw: &str) -> Result<Record, MarkbookError> {
    let id = required_id(raw)?;
    let index = table.find_by_id(id).ok_or(MarkbookError::NotFound(id))?;
    Ok(table.records()[index].clone())
}

/// Remove a record after confirmation and record the reversal.
pub fn commit_delete(
    table: &mut RecordTable,
    undo: &mut UndoStack,
    id: u32,
) -> Result<Record, MarkbookError> {
    let index = table.find_by_id(id).ok_or(MarkbookError::NotFound(id))?;
    let removed = table.remove_at(index);
    undo.push(ReversibleAction::Delete {
        before: removed.clone(),
    });
    debug!(id, "record deleted");
    Ok(removed)
}

/// Pop the most recent action and apply its inverse.
///
/// The popped action is consumed either way: when the table has drifted
/// (target removed, or capacity reached for a re-insert) the undo fails
/// and the action is lost, with the table unchanged.
pub fn undo(table: &mut RecordTable, undo: &mut UndoStack) -> Result<UndoReport, MarkbookError> {
    let Some(action) = undo.pop() else {
        return Err(MarkbookError::NothingToUndo);
    };

    match action {
        ReversibleAction::Insert { after } => {
            let index = table
                .find_by_id(after.id)
                .ok_or(MarkbookError::UndoFailed(UndoFailure::NotFound(after.id)))?;
            table.remove_at(index);
            debug!(id = after.id, "undo reverted insert");
            Ok(UndoReport {
                kind: MutationKind::Insert,
                id: after.id,
            })
        }
        ReversibleAction::Update { before, .. } => {
            let index = table
                .find_by_id(before.id)
                .ok_or(MarkbookError::UndoFailed(UndoFailure::NotFound(before.id)))?;
            let id = before.id;
            table.replace(index, before)?;
            debug!(id, "undo reverted update");
            Ok(UndoReport {
                kind: MutationKind::Update,
                id,
            })
        }
        ReversibleAction::Delete { before } => {
            let id = before.id;
            table.insert(before).map_err(|e| match e {
                MarkbookError::MaxCapacity => {
                    MarkbookError::UndoFailed(UndoFailure::MaxCapacity)
                }
                MarkbookError::DuplicateId(id) => {
                    MarkbookError::UndoFailed(UndoFailure::IdReused(id))
                }
                other => other,
            })?;
            debug!(id, "undo reverted delete");
            Ok(UndoReport {
                kind: MutationKind::Delete,
                id,
            })
        }
    }
}
