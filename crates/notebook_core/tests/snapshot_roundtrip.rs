use notebook_core::db::schema::SCHEMA_VERSION;
use notebook_core::db::DbError;
use notebook_core::{Notebook, NotebookError, Record};
use rusqlite::Connection;
use std::fs;

fn sample_notebook(path: &std::path::Path) -> Notebook {
    let mut notebook = Notebook::with_save_path(path);
    notebook.add(Record::new("trip", ["travel", "2024"], "packing list"));
    notebook.add(Record::new("dup", ["x", "y", "x"], "labels repeat"));
    notebook.add(Record::new("empty", Vec::<String>::new(), ""));
    notebook.add(Record::new("unicode", ["ü", "日本"], "line one\nline two"));
    notebook
}

#[test]
fn save_then_load_reproduces_records_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");
    let saved = sample_notebook(&path);

    saved.save().unwrap();

    let mut restored = Notebook::with_save_path(&path);
    let count = restored.load().unwrap();
    assert_eq!(count, 4);
    assert_eq!(restored.records(), saved.records());
}

#[test]
fn save_to_file_replaces_existing_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");
    sample_notebook(&path).save().unwrap();

    let mut smaller = Notebook::with_save_path(&path);
    smaller.add(Record::new("only", ["one"], "left"));
    smaller.save_to_file(&path).unwrap();

    let mut restored = Notebook::new();
    restored.load_from_file(&path).unwrap();
    assert_eq!(restored.records(), &[Record::new("only", ["one"], "left")]);
    assert!(!dir.path().join("notebook.db.tmp").exists());
}

#[test]
fn save_overwrites_non_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");
    fs::write(&path, b"old pickle bytes").unwrap();

    sample_notebook(&path).save().unwrap();

    let mut restored = Notebook::with_save_path(&path);
    assert_eq!(restored.load().unwrap(), 4);
}

#[test]
fn save_empty_notebook_round_trips_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notebook.db");
    Notebook::with_save_path(&path).save().unwrap();

    let mut restored = Notebook::with_save_path(&path);
    assert_eq!(restored.load().unwrap(), 0);
    assert!(restored.is_empty());
}

#[test]
fn load_missing_file_reports_absence_and_stays_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    let mut notebook = Notebook::with_save_path(&path);

    let err = notebook.load().unwrap_err();

    match err {
        NotebookError::SnapshotMissing(reported) => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(notebook.is_empty());
    assert!(!path.exists());
}

#[test]
fn load_corrupt_file_reports_unreadable_and_keeps_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.db");
    fs::write(&path, b"this is definitely not a sqlite database file").unwrap();

    let mut notebook = Notebook::with_save_path(&path);
    notebook.add(Record::new("keep", ["me"], "still here"));
    let before = notebook.clone();

    let err = notebook.load().unwrap_err();

    assert!(matches!(err, NotebookError::SnapshotUnreadable { .. }));
    assert_eq!(notebook, before);
}

#[test]
fn load_empty_file_reports_unreadable_without_touching_it() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.db");
    fs::write(&path, b"").unwrap();

    let mut notebook = Notebook::with_save_path(&path);
    let err = notebook.load().unwrap_err();

    assert!(matches!(
        err,
        NotebookError::SnapshotUnreadable {
            source: DbError::UninitializedSchema,
            ..
        }
    ));
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn load_snapshot_from_newer_build_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    sample_notebook(&path).save().unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let mut notebook = Notebook::with_save_path(&path);
    let err = notebook.load().unwrap_err();
    match err {
        NotebookError::SnapshotUnreadable {
            source:
                DbError::UnsupportedSchemaVersion {
                    db_version,
                    latest_supported,
                },
            ..
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(notebook.is_empty());
}

#[test]
fn save_into_missing_directory_reports_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("notebook.db");

    let err = sample_notebook(&path).save().unwrap_err();

    assert!(matches!(err, NotebookError::SnapshotWrite { .. }));
    assert!(!path.exists());
}
