//! Vault file I/O against a real temporary directory

use assert_fs::prelude::*;
use bearsync_fs::{Error, NormalizedPath, io};
use predicates::prelude::*;

fn at(dir: &assert_fs::TempDir, relative: &str) -> NormalizedPath {
    NormalizedPath::new(dir.path()).join(relative)
}

#[test]
fn write_creates_missing_folders() {
    let vault = assert_fs::TempDir::new().unwrap();

    io::write_text(&at(&vault, "work/projects/Plan.md"), "# Plan").unwrap();

    vault.child("work/projects/Plan.md").assert("# Plan");
}

#[test]
fn write_replaces_previous_content() {
    let vault = assert_fs::TempDir::new().unwrap();
    vault.child("Note.md").write_str("a much longer original body").unwrap();

    io::write_atomic(&at(&vault, "Note.md"), b"short").unwrap();

    vault.child("Note.md").assert("short");
}

#[test]
fn write_cleans_up_its_temp_file() {
    let vault = assert_fs::TempDir::new().unwrap();

    io::write_text(&at(&vault, "Note.md"), "body").unwrap();

    let names: Vec<String> = std::fs::read_dir(vault.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Note.md".to_string()]);
}

#[test]
fn read_round_trips_unicode() {
    let vault = assert_fs::TempDir::new().unwrap();
    vault.child("Café.md").write_str("⠀ spacer and ü").unwrap();

    assert_eq!(io::read_text(&at(&vault, "Café.md")).unwrap(), "⠀ spacer and ü");
}

#[test]
fn read_missing_file_reports_path() {
    let vault = assert_fs::TempDir::new().unwrap();

    let err = io::read_text(&at(&vault, "gone.md")).unwrap_err();

    assert!(matches!(err, Error::Io { .. }));
    assert!(err.to_string().contains("gone.md"));
}

#[test]
fn copy_lands_in_new_attachment_folder() {
    let root = assert_fs::TempDir::new().unwrap();
    let stored = root.child("store/F1/photo.png");
    stored.write_binary(&[1, 2, 3, 4]).unwrap();

    let target = at(&root, "vault/work/_attachments/photo.png");
    let copied = io::copy_file(&NormalizedPath::new(stored.path()), &target).unwrap();

    assert_eq!(copied, 4);
    root.child("vault/work/_attachments/photo.png")
        .assert(predicate::path::is_file());
    assert_eq!(io::file_size(&target), Some(4));
}

#[test]
fn size_of_absent_file_is_none() {
    let root = assert_fs::TempDir::new().unwrap();
    assert_eq!(io::file_size(&at(&root, "missing.bin")), None);
}
