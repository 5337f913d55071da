//! Integration tests for raglib-files
//!
//! These tests patch real files the way the pipeline does: read, transform,
//! and write back only when the content changed.

use raglib_files::{DocumentStore, WriteStatus};
use std::fs;
use tempfile::TempDir;

/// Tests a read-modify-write cycle followed by an idempotent rewrite
#[test]
fn test_read_modify_write_cycle() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs/techniques.md"), "# T\nold\n").unwrap();

    let store = DocumentStore::new(dir.path(), false);
    let current = store.read("docs/techniques.md").unwrap();
    let updated = current.replace("old", "new");

    assert_eq!(
        store.write_if_changed("docs/techniques.md", &updated).unwrap(),
        WriteStatus::Written
    );
    assert_eq!(
        store.write_if_changed("docs/techniques.md", &updated).unwrap(),
        WriteStatus::Unchanged
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("docs/techniques.md")).unwrap(),
        "# T\nnew\n"
    );
}

/// Tests that dry-run and real stores agree on which writes are changes
#[test]
fn test_dry_run_plans_same_changes_as_real_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("README.md"), "same\n").unwrap();

    let plans = [("README.md", "same\n"), ("README.md", "changed\n"), ("new.md", "x")];
    let dry = DocumentStore::new(dir.path(), true);
    let real = DocumentStore::new(dir.path(), false);

    for (path, content) in plans {
        let planned = dry.write_if_changed(path, content).unwrap().is_change();
        let expected = real.read(path).map_or(true, |current| current != content);
        assert_eq!(planned, expected, "{path}");
    }
    assert!(!dir.path().join("new.md").exists());
}

/// Tests that undecodable documents are reported
#[test]
fn test_non_utf8_document_reported() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bin.md"), [0xff, 0xfe, 0x00]).unwrap();

    let store = DocumentStore::new(dir.path(), false);
    let err = store.read("bin.md").unwrap_err();
    assert!(matches!(err, raglib_files::FilesError::NotUtf8 { .. }));
    assert!(store.write_if_changed("bin.md", "text").is_err());
}
