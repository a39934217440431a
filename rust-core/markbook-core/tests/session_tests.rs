// SPDX-License-Identifier: PMPL-1.0-or-later
//! End-to-end session tests: command sequences against an in-memory store.

use std::path::Path;

use markbook_core::query::SearchField;
use markbook_core::session::{AutosaveStatus, OpenOutcome, Session};
use markbook_core::{MarkbookError, Record};
use markbook_storage::MemoryStore;

fn session() -> Session<MemoryStore> {
    Session::new(MemoryStore::new(), "/data")
}

fn insert_ann_and_bo(session: &mut Session<MemoryStore>) {
    session
        .insert("INSERT ID=1001 NAME=\"Ann\" PROGRAMME=\"CS\" MARK=72.5")
        .unwrap();
    session
        .insert("INSERT ID=1002 NAME=\"Bo\" PROGRAMME=\"CS\" MARK=55.0")
        .unwrap();
}

#[test]
fn test_summary_after_two_inserts() {
    // Scenario: two inserts, then the global summary.
    let mut session = session();
    insert_ann_and_bo(&mut session);

    let summary = session.summary().unwrap();
    assert_eq!(summary.count, 2);
    assert!((summary.mean - 63.75).abs() < 1e-9);
    assert_eq!(summary.highest.name, "Ann");
    assert_eq!(summary.highest.mark, 72.5);
    assert_eq!(summary.lowest.name, "Bo");
    assert_eq!(summary.lowest.mark, 55.0);
    assert_eq!(summary.bands.b, 1);
    assert_eq!(summary.bands.d, 1);
}

#[test]
fn test_update_then_undo_restores_prior_mark() {
    // Scenario: insert, update the mark, undo; the mark returns to its
    // pre-update value.
    let mut session = session();
    insert_ann_and_bo(&mut session);

    session.update("UPDATE ID=1001 MARK=91").unwrap();
    assert_eq!(session.query("QUERY ID=1001").unwrap().mark, 91.0);

    let receipt = session.undo().unwrap();
    assert_eq!(receipt.report.id, 1001);
    assert_eq!(session.query("QUERY ID=1001").unwrap().mark, 72.5);
}

#[test]
fn test_cancelled_delete_leaves_no_undo_entry() {
    // Scenario: a declined delete confirmation means no mutation and no
    // undo entry; a later UNDO acts on the previous action instead.
    let mut session = session();
    insert_ann_and_bo(&mut session);

    // The external prompt declined: only prepare is called.
    let doomed = session.prepare_delete("DELETE ID=1001").unwrap();
    assert_eq!(doomed.id, 1001);
    assert_eq!(session.table().len(), 2);

    // UNDO reverts the previous action (the insert of 1002), not the
    // cancelled delete.
    let receipt = session.undo().unwrap();
    assert_eq!(receipt.report.id, 1002);
    assert!(session.table().find_by_id(1001).is_some());
    assert!(session.table().find_by_id(1002).is_none());
}

#[test]
fn test_insert_with_out_of_range_mark_rejected() {
    // Scenario: MARK=150 is rejected and the table is unchanged.
    let mut session = session();
    let err = session
        .insert("INSERT ID=1 NAME=\"X\" PROGRAMME=\"Y\" MARK=150")
        .unwrap_err();
    assert!(matches!(err, MarkbookError::InvalidMark));
    assert!(session.table().is_empty());
}

#[test]
fn test_undo_on_empty_history() {
    // Scenario: UNDO with no history reports NothingToUndo.
    let mut session = session();
    let err = session.undo().unwrap_err();
    assert!(matches!(err, MarkbookError::NothingToUndo));
}

#[test]
fn test_open_missing_snapshot_starts_fresh() {
    let mut session = session();
    match session.open("P10-09").unwrap() {
        OpenOutcome::Fresh { path } => {
            assert_eq!(path, Path::new("/data/P10-09-markbook.txt"));
        }
        other => panic!("expected Fresh, got {other:?}"),
    }
    assert!(session.table().is_empty());
}

#[test]
fn test_open_loads_seeded_snapshot_and_resets_history() {
    let store = MemoryStore::new();
    store.seed(
        "/data/P10-09-markbook.txt",
        vec![Record::new(7, "Seeded", "CS", 60.0)],
    );
    let mut session = Session::new(store, "/data");

    // Build up some history first, then OPEN.
    session
        .insert("INSERT ID=1 NAME=\"X\" PROGRAMME=\"Y\" MARK=50")
        .unwrap();
    match session.open("P10-09").unwrap() {
        OpenOutcome::Loaded { count, .. } => assert_eq!(count, 1),
        other => panic!("expected Loaded, got {other:?}"),
    }
    assert_eq!(session.table().records()[0].name, "Seeded");

    // The pre-OPEN insert is no longer undoable.
    let err = session.undo().unwrap_err();
    assert!(matches!(err, MarkbookError::NothingToUndo));
}

#[test]
fn test_open_blank_team_rejected() {
    let mut session = session();
    assert!(matches!(
        session.open("   "),
        Err(MarkbookError::MissingField(_))
    ));
}

#[test]
fn test_save_requires_open() {
    let mut session = session();
    insert_ann_and_bo(&mut session);
    assert!(matches!(session.save(), Err(MarkbookError::NoTableOpen)));
}

#[test]
fn test_save_then_reopen_round_trips() {
    let mut session = session();
    session.open("team").unwrap();
    insert_ann_and_bo(&mut session);
    session.save().unwrap();

    session.open("team").unwrap();
    assert_eq!(session.table().len(), 2);
    assert_eq!(session.table().records()[0].name, "Ann");
}

#[test]
fn test_autosave_writes_after_each_mutation_and_undo() {
    let mut session = session();
    session.open("team").unwrap();
    session.set_autosave(true);

    let receipt = session
        .insert("INSERT ID=1 NAME=\"Ann\" PROGRAMME=\"CS\" MARK=70")
        .unwrap();
    assert!(matches!(receipt.autosave, Some(AutosaveStatus::Saved(_))));

    let receipt = session.undo().unwrap();
    assert!(matches!(receipt.autosave, Some(AutosaveStatus::Saved(_))));

    // The autosaved snapshot reflects the undo: empty again.
    session.open("team").unwrap();
    assert!(session.table().is_empty());
}

#[test]
fn test_autosave_off_is_silent() {
    let mut session = session();
    session.open("team").unwrap();
    let receipt = session
        .insert("INSERT ID=1 NAME=\"Ann\" PROGRAMME=\"CS\" MARK=70")
        .unwrap();
    assert!(receipt.autosave.is_none());
}

#[test]
fn test_autosave_with_no_open_table_is_skipped() {
    let mut session = session();
    session.set_autosave(true);
    let receipt = session
        .insert("INSERT ID=1 NAME=\"Ann\" PROGRAMME=\"CS\" MARK=70")
        .unwrap();
    assert!(receipt.autosave.is_none());
}

#[test]
fn test_show_all_sort_clause_flows_through() {
    let mut session = session();
    insert_ann_and_bo(&mut session);

    let rows = session.show_all(" SORT BY MARK DESC").unwrap();
    assert_eq!(rows[0].id, 1001);
    assert_eq!(rows[1].id, 1002);

    // Insertion order without a clause.
    let rows = session.show_all("").unwrap();
    assert_eq!(rows[0].id, 1001);

    assert!(matches!(
        session.show_all(" SORT BY NAME"),
        Err(MarkbookError::BadSortClause(_))
    ));
}

#[test]
fn test_find_by_name_and_programme() {
    let mut session = session();
    insert_ann_and_bo(&mut session);

    let (keyword, matches) = session
        .find(SearchField::Name, "FIND NAME=\"ann\"")
        .unwrap();
    assert_eq!(keyword, "ann");
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id, 1001);

    let (_, matches) = session
        .find(SearchField::Programme, "FIND PROGRAMME=\"cs\"")
        .unwrap();
    assert_eq!(matches.len(), 2);

    let err = session.find(SearchField::Name, "FIND").unwrap_err();
    assert!(matches!(err, MarkbookError::MissingField(_)));
}

#[test]
fn test_query_error_paths() {
    let session = session();
    assert!(matches!(
        session.query("QUERY ID=abc"),
        Err(MarkbookError::InvalidId)
    ));
    assert!(matches!(
        session.query("QUERY ID=5"),
        Err(MarkbookError::NotFound(5))
    ));
    assert!(matches!(
        session.query("QUERY"),
        Err(MarkbookError::MissingField(_))
    ));
}

#[test]
fn test_programme_summary_groups() {
    let mut session = session();
    insert_ann_and_bo(&mut session);
    session
        .insert("INSERT ID=2001 NAME=\"Cam\" PROGRAMME=\"IS\" MARK=80")
        .unwrap();

    let groups = session.programme_summary();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].programme, "CS");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[1].programme, "IS");
}
