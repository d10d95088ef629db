//! Reconciliation scenarios over an in-memory source
//!
//! Each test drives the engine the way the CLI does: load state, run one
//! operation, save state.

use bearsync_core::{ChangeKind, Error, SyncOptions, SyncStateStore};
use bearsync_fs::fingerprint;
use bearsync_test_utils::{NoteBuilder, TestVault, WriteBackMode};
use pretty_assertions::assert_eq;
use std::fs;

const A_PATH: &str = "work/Alpha.md";
const B_PATH: &str = "home/Bravo.md";
const C_PATH: &str = "_untagged/Charlie.md";

/// Three notes: A tagged work, B tagged home, C untagged
fn three_note_vault() -> TestVault {
    TestVault::with_notes(vec![
        NoteBuilder::new("A", "Alpha")
            .text("# Alpha\n#work\nfirst")
            .tag("work")
            .build(),
        NoteBuilder::new("B", "Bravo")
            .text("# Bravo\n#home\nsecond")
            .tag("home")
            .build(),
        NoteBuilder::new("C", "Charlie").text("# Charlie\nthird").build(),
    ])
}

/// Export everything and persist, as `bearsync init` does
fn exported() -> TestVault {
    let vault = three_note_vault();
    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.export_all(&mut state).unwrap();
    assert!(report.is_success(), "{:?}", report.errors);
    engine.save_state(&mut state).unwrap();
    vault
}

fn state_file(vault: &TestVault) -> Vec<u8> {
    fs::read(vault.path(".bearsync/state.toml")).unwrap()
}

// ============================================================================
// Fresh export
// ============================================================================

#[test]
fn fresh_export_files_every_note() {
    let vault = exported();
    let state = vault.load_state();

    assert_eq!(state.len(), 3);
    vault.assert_file_exists(A_PATH);
    vault.assert_file_exists(B_PATH);
    vault.assert_file_exists(C_PATH);

    for (id, path) in [("A", A_PATH), ("B", B_PATH), ("C", C_PATH)] {
        let entry = state.get(id).unwrap();
        let note = vault.source.get(id).unwrap();
        assert_eq!(entry.file_path, path);
        assert_eq!(entry.source_hash, fingerprint(&note.text));
        assert_eq!(
            entry.destination_hash,
            fingerprint(&vault.read(path))
        );
    }
}

#[test]
fn exported_document_carries_front_matter() {
    let vault = exported();
    let document = vault.read(A_PATH);

    assert_eq!(
        document,
        "---\nbear_id: A\ncreated: 2024-01-01T00:00:00\nmodified: 2024-01-01T00:00:00\n\
         archived: false\npinned: false\n---\n# Alpha\n#work\nfirst"
    );
}

#[test]
fn second_export_is_idempotent() {
    let vault = exported();
    let before = state_file(&vault);
    let modified_before = fs::metadata(vault.path(A_PATH)).unwrap().modified().unwrap();

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.export_all(&mut state).unwrap();

    assert_eq!(report.changed(), 0);
    assert!(report.actions.is_empty());
    assert!(!state.is_dirty());

    engine.save_state(&mut state).unwrap();
    assert_eq!(state_file(&vault), before);
    assert_eq!(
        fs::metadata(vault.path(A_PATH)).unwrap().modified().unwrap(),
        modified_before
    );
}

#[test]
fn identical_titles_get_distinct_paths() {
    let vault = TestVault::with_notes(vec![
        NoteBuilder::new("X1", "Meeting").build(),
        NoteBuilder::new("X2", "Meeting").build(),
        NoteBuilder::new("X3", "meeting").build(),
    ]);
    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    engine.export_all(&mut state).unwrap();

    assert_eq!(state.get("X1").unwrap().file_path, "_untagged/Meeting.md");
    assert_eq!(state.get("X2").unwrap().file_path, "_untagged/Meeting 2.md");
    assert_eq!(state.get("X3").unwrap().file_path, "_untagged/meeting 3.md");
}

// ============================================================================
// Detect and pull
// ============================================================================

#[test]
fn source_edit_is_pulled_into_existing_file() {
    let vault = exported();
    vault.source.set_text("A", "# Alpha\n#work\nrevised");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();

    let status = engine.status(&state).unwrap();
    assert_eq!(status.changes.source_changed, vec!["A"]);
    assert_eq!(status.label("A"), "Alpha");

    let report = engine.pull(&mut state).unwrap();
    engine.save_state(&mut state).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.created, 0);
    assert!(vault.read(A_PATH).ends_with("revised"));
    vault.assert_file_not_exists("work/Alpha 2.md");

    let state = vault.load_state();
    assert_eq!(
        state.get("A").unwrap().source_hash,
        fingerprint("# Alpha\n#work\nrevised")
    );
}

#[test]
fn retitled_note_keeps_its_file() {
    let vault = exported();
    let mut renamed = vault.source.get("C").unwrap();
    renamed.title = "Renamed".into();
    renamed.text = "# Renamed\nthird".into();
    vault.source.upsert(renamed);

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    engine.pull(&mut state).unwrap();

    assert_eq!(state.get("C").unwrap().file_path, C_PATH);
    vault.assert_file_not_exists("_untagged/Renamed.md");
}

#[test]
fn new_note_does_not_take_a_tracked_path() {
    let vault = exported();
    vault.source.upsert(NoteBuilder::new("D", "Charlie").text("another").build());

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.pull(&mut state).unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(state.get("D").unwrap().file_path, "_untagged/Charlie 2.md");
    assert!(vault.read(C_PATH).ends_with("third"));
}

#[test]
fn deleted_source_note_is_reported_and_file_kept() {
    let vault = exported();
    vault.source.remove("B");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    assert_eq!(
        engine.status(&state).unwrap().changes.deleted_in_source,
        vec!["B"]
    );

    let report = engine.pull(&mut state).unwrap();
    assert_eq!(report.deleted, vec!["B"]);
    assert!(!state.contains("B"));
    vault.assert_file_exists(B_PATH);
}

#[test]
fn vacated_destination_file_is_tolerated() {
    let vault = exported();
    fs::remove_file(vault.path(C_PATH)).unwrap();

    let engine = vault.engine();
    let state = engine.load_state().unwrap();
    let status = engine.status(&state).unwrap();

    assert!(status.changes.is_clean());
}

// ============================================================================
// Conflicts
// ============================================================================

#[test]
fn edits_on_both_sides_are_left_alone() {
    let vault = exported();
    vault.source.set_text("B", "# Bravo\n#home\nedited in Bear");
    vault.edit(B_PATH, "second", "edited in the vault");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let stored = state.get("B").cloned().unwrap();

    let status = engine.status(&state).unwrap();
    assert_eq!(status.changes.category_of("B"), Some(ChangeKind::Conflict));

    let push = engine.push(&mut state, &SyncOptions::default()).unwrap();
    assert_eq!(push.conflicts, vec!["B"]);
    assert!(vault.write_back.calls().is_empty());

    let pull = engine.pull(&mut state).unwrap();
    assert_eq!(pull.conflicts, vec!["B"]);
    assert!(vault.read(B_PATH).contains("edited in the vault"));

    assert_eq!(state.get("B"), Some(&stored));
}

// ============================================================================
// Push
// ============================================================================

#[test]
fn vault_edit_is_pushed_and_verified() {
    let vault = exported();
    vault.edit(C_PATH, "third", "third, edited");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.push(&mut state, &SyncOptions::default()).unwrap();
    engine.save_state(&mut state).unwrap();

    assert_eq!(report.pushed, 1, "{:?}", report.errors);
    assert_eq!(
        vault.write_back.calls(),
        vec![("C".to_string(), "# Charlie\nthird, edited".to_string())]
    );
    assert_eq!(vault.source.get("C").unwrap().text, "# Charlie\nthird, edited");

    let state = vault.load_state();
    let entry = state.get("C").unwrap();
    assert_eq!(entry.source_hash, fingerprint("# Charlie\nthird, edited"));
    assert_eq!(entry.destination_hash, fingerprint(&vault.read(C_PATH)));
    assert!(engine.status(&state).unwrap().changes.is_clean());
}

#[test]
fn dry_run_push_changes_nothing() {
    let vault = exported();
    vault.edit(C_PATH, "third", "third, edited");
    let before = state_file(&vault);

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine
        .push(&mut state, &SyncOptions { dry_run: true })
        .unwrap();

    assert_eq!(report.pushed, 0);
    assert_eq!(report.actions, vec!["[dry-run] Would push: Charlie"]);
    assert!(vault.write_back.calls().is_empty());
    assert!(!state.is_dirty());
    assert_eq!(vault.source.get("C").unwrap().text, "# Charlie\nthird");
    assert_eq!(state_file(&vault), before);
}

#[test]
fn silent_no_op_write_back_fails_verification() {
    let mut vault = exported();
    vault.set_write_back(WriteBackMode::NoOp);
    vault.edit(C_PATH, "third", "third, edited");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let stored = state.get("C").cloned().unwrap();
    let report = engine.push(&mut state, &SyncOptions::default()).unwrap();

    assert_eq!(report.pushed, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].id, "C");
    assert!(report.errors[0].reason.contains("Verification failed"));
    assert_eq!(state.get("C"), Some(&stored));
}

#[test]
fn failing_write_back_is_recorded_and_run_continues() {
    let mut vault = exported();
    vault.set_write_back(WriteBackMode::Fail("Bear is not running".into()));
    vault.edit(A_PATH, "first", "first, edited");
    vault.edit(C_PATH, "third", "third, edited");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.push(&mut state, &SyncOptions::default()).unwrap();

    let failed: Vec<&str> = report.errors.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(failed, vec!["A", "C"]);
    assert_eq!(vault.write_back.called_ids(), vec!["A", "C"]);
    assert!(!state.is_dirty());
}

#[test]
fn push_skips_file_claiming_another_note() {
    let vault = exported();
    vault.edit(C_PATH, "bear_id: C", "bear_id: A");

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.push(&mut state, &SyncOptions::default()).unwrap();

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].reason.contains("belongs to note A"));
    assert!(vault.write_back.calls().is_empty());
}

// ============================================================================
// Fatal conditions
// ============================================================================

#[test]
fn corrupt_state_aborts_before_any_write() {
    let vault = three_note_vault();
    vault.write(".bearsync/state.toml", "version = \"1\"\nnotes = [ {");

    let result = SyncStateStore::load(bearsync_core::VaultConfig::state_path(vault.root()));

    assert!(matches!(result, Err(Error::CorruptState { .. })));
    vault.assert_file_not_exists(A_PATH);
}

#[test]
fn excluded_tag_is_never_exported() {
    let mut vault = three_note_vault();
    vault.config.exclude_tags = vec!["home".into()];

    let engine = vault.engine();
    let mut state = engine.load_state().unwrap();
    let report = engine.export_all(&mut state).unwrap();

    assert_eq!(report.created, 2);
    vault.assert_file_not_exists(B_PATH);
    assert!(!state.contains("B"));
}
