// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error taxonomy for the record store and command engine.
//!
//! Every variant is recovered at the command boundary: a failed command
//! produces one descriptive line and never corrupts or partially applies.

use thiserror::Error;

use crate::args::Field;
use crate::store::StoreError;

/// Errors surfaced by table mutations, queries, undo, and persistence.
#[derive(Debug, Error)]
pub enum MarkbookError {
    /// The ID value is absent, unparseable, or not positive.
    #[error("invalid ID: must be a positive integer")]
    InvalidId,

    /// The mark value is unparseable or outside [0, 100].
    #[error("invalid mark: must be a number between 0 and 100")]
    InvalidMark,

    /// A required field was not supplied (or was empty).
    #[error("missing required field(s): {0}")]
    MissingField(String),

    /// An UPDATE supplied none of NAME, PROGRAMME, MARK.
    #[error("nothing to update: supply NAME, PROGRAMME, or MARK")]
    NoFieldsToUpdate,

    /// An INSERT targeted an ID already present in the table.
    #[error("a record with ID={0} already exists")]
    DuplicateId(u32),

    /// The named ID is not present in the table.
    #[error("no record with ID={0} exists")]
    NotFound(u32),

    /// The table is at its capacity ceiling.
    #[error("cannot insert: the table is at capacity")]
    MaxCapacity,

    /// The undo history is empty. Informational, not a failure: the
    /// shell prints it without an error prefix.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The most recent action could not be inverted because the table
    /// drifted since it was recorded. The action is discarded.
    #[error("undo failed: {0}")]
    UndoFailed(UndoFailure),

    /// A quoted field value was never closed.
    #[error("missing closing quote in {0} value")]
    UnclosedQuote(Field),

    /// A SORT BY clause named something other than ID, MARK, or PROGRAMME.
    #[error("unrecognised sort clause: {0} (expected SORT BY ID|MARK|PROGRAMME [ASC|DESC])")]
    BadSortClause(String),

    /// SAVE was issued before any OPEN established a snapshot path.
    #[error("no table is open: use OPEN <team> first")]
    NoTableOpen,

    /// The persistence collaborator failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Why an undo could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UndoFailure {
    /// The record the action targets is no longer in the table.
    #[error("record with ID={0} no longer exists")]
    NotFound(u32),

    /// A deleted record cannot be restored because its id was re-used by
    /// a later insert.
    #[error("ID={0} has been re-used since the deletion")]
    IdReused(u32),

    /// Re-inserting a deleted record would exceed the capacity ceiling.
    #[error("the table is at capacity")]
    MaxCapacity,
}
