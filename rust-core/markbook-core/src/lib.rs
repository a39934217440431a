// SPDX-License-Identifier: PMPL-1.0-or-later
//! Markbook core — the record store and command-execution engine.
//!
//! A single in-memory table of fixed-schema records (id, name, programme,
//! mark) driven by line-oriented commands. This crate holds everything with
//! real state-machine content:
//!
//! - [`table::RecordTable`] — the authoritative collection and its
//!   invariants (unique positive ids, marks in \[0, 100\]).
//! - [`args`] — the `KEY=value` / `KEY="quoted value"` argument grammar.
//! - [`query`] — sorted listings, substring search, and summaries.
//! - [`mutation`] — insert/update/delete with full up-front validation,
//!   plus the undo application.
//! - [`undo::UndoStack`] — the bounded reversible-action history.
//! - [`session::Session`] — one callable per command verb, threading the
//!   autosave flag and current snapshot path as explicit state.
//!
//! The interactive line loop, output rendering, and the flat-file snapshot
//! format live in the `markbook-repl` and `markbook-storage` crates.

pub mod args;
pub mod error;
pub mod mutation;
pub mod query;
pub mod record;
pub mod session;
pub mod store;
pub mod table;
pub mod undo;

pub use error::{MarkbookError, UndoFailure};
pub use record::{GradeBand, Record, MAX_MARK, MIN_MARK};
pub use session::{AutosaveStatus, MutationReceipt, OpenOutcome, Session, UndoReceipt};
pub use store::{StoreError, TableStore};
pub use table::{RecordTable, MAX_RECORDS};
pub use undo::{ReversibleAction, UndoStack, UNDO_DEPTH};
