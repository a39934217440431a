// SPDX-License-Identifier: PMPL-1.0-or-later
//! Persistence backends for Markbook table snapshots.
//!
//! Two implementations of the core's [`TableStore`] seam:
//!
//! - [`FlatFileStore`] — the real collaborator: one record per line,
//!   pipe-delimited, marks with two decimals, tolerant loading.
//! - [`MemoryStore`] — a map of path to records for tests and ephemeral
//!   sessions.

pub mod flatfile;
pub mod memory;

pub use flatfile::FlatFileStore;
pub use memory::MemoryStore;

pub use markbook_core::store::{StoreError, TableStore};
