//! Full cycle against a Bear-shaped SQLite database
//!
//! The write-back double edits the database directly, standing in for the
//! Bear app handling the callback URL.

use bearsync_core::{
    BearDatabase, NoteSource, Result, SyncEngine, SyncOptions, VaultConfig, WriteBack,
};
use bearsync_test_utils::BearLibrary;
use pretty_assertions::assert_eq;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;

struct DatabaseWriteBack(Rc<BearLibrary>);

impl WriteBack for DatabaseWriteBack {
    fn request_overwrite(&self, id: &str, body: &str) -> Result<()> {
        self.0.set_text(id, body);
        Ok(())
    }
}

fn engine(library: &Rc<BearLibrary>, vault: &TempDir) -> SyncEngine {
    let mut config = VaultConfig::new(vault.path());
    config.push_delay_ms = 0;
    SyncEngine::new(
        config,
        Box::new(BearDatabase::new(library.db_path(), library.files_root())),
        Box::new(DatabaseWriteBack(library.clone())),
    )
}

fn library_with_image() -> Rc<BearLibrary> {
    let mut library = BearLibrary::new();
    let pk = library.add_note(
        "N1",
        "Trip",
        "# Trip\n#travel/2024\n\u{2800}\n![map](F1/map.png)",
    );
    library.tag(pk, "travel");
    library.tag(pk, "travel/2024");
    library.attach(pk, "F1", "map.png", b"png-bytes");
    Rc::new(library)
}

#[test]
fn export_rewrites_attachments_and_copies_them() {
    let library = library_with_image();
    let vault = TempDir::new().unwrap();
    let engine = engine(&library, &vault);

    let mut state = engine.load_state().unwrap();
    let report = engine.export_all(&mut state).unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.attachments_copied, 1);

    let document = fs::read_to_string(vault.path().join("travel/2024/Trip.md")).unwrap();
    assert!(document.ends_with("# Trip\n#travel/2024\n\n![map](_attachments/map.png)"));
    assert_eq!(
        fs::read(vault.path().join("travel/2024/_attachments/map.png")).unwrap(),
        b"png-bytes"
    );
}

#[test]
fn unchanged_attachment_is_not_copied_again() {
    let library = library_with_image();
    let vault = TempDir::new().unwrap();
    let engine = engine(&library, &vault);

    let mut state = engine.load_state().unwrap();
    engine.export_all(&mut state).unwrap();

    library.set_text("N1", "# Trip\n#travel/2024\n![map](F1/map.png)\nmore");
    let report = engine.pull(&mut state).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.attachments_copied, 0);
}

#[test]
fn pushed_edit_restores_source_attachment_reference() {
    let library = library_with_image();
    let vault = TempDir::new().unwrap();
    let engine = engine(&library, &vault);

    let mut state = engine.load_state().unwrap();
    engine.export_all(&mut state).unwrap();
    engine.save_state(&mut state).unwrap();

    let file = vault.path().join("travel/2024/Trip.md");
    let edited = fs::read_to_string(&file).unwrap() + "\nPacked.";
    fs::write(&file, &edited).unwrap();

    let mut state = engine.load_state().unwrap();
    let report = engine.push(&mut state, &SyncOptions::default()).unwrap();
    engine.save_state(&mut state).unwrap();

    assert_eq!(report.pushed, 1, "{:?}", report.errors);

    let db = BearDatabase::new(library.db_path(), library.files_root());
    let note = db.fetch_by_id("N1").unwrap().unwrap();
    assert_eq!(note.text, "# Trip\n#travel/2024\n\n![map](F1/map.png)\nPacked.");

    let status = engine.status(&engine.load_state().unwrap()).unwrap();
    assert!(status.changes.is_clean());
}

#[test]
fn trashing_in_bear_untracks_the_note() {
    let library = library_with_image();
    let vault = TempDir::new().unwrap();
    let engine = engine(&library, &vault);

    let mut state = engine.load_state().unwrap();
    engine.export_all(&mut state).unwrap();

    library.trash("N1");
    let report = engine.pull(&mut state).unwrap();

    assert_eq!(report.deleted, vec!["N1"]);
    assert!(state.is_empty());
    assert!(vault.path().join("travel/2024/Trip.md").is_file());
}
