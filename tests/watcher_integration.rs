//! Integration tests for the watcher and render cache public API.

use std::fs;
use std::path::Path;
use treedoc::cache::{fingerprint, RenderCache};
use treedoc::loader::{collect_entry_files, is_entry_file};
use treedoc::watcher::InputWatcher;

#[test]
fn entry_files_are_json_and_not_hidden() {
    assert!(is_entry_file(Path::new("orders/list.json")));
    assert!(!is_entry_file(Path::new("orders/list.sql")));
    assert!(!is_entry_file(Path::new("orders/.list.json")));
    assert!(!is_entry_file(Path::new(".treedocrc.json")));
}

#[test]
fn watcher_watch_temp_dir_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = InputWatcher::watch(dir.path());
    assert!(
        result.is_ok(),
        "watch on temp dir should succeed: {:?}",
        result.err()
    );
}

#[test]
fn watcher_watch_manifest_file_succeeds() {
    let dir = tempfile::TempDir::new().unwrap();
    let manifest = dir.path().join("report.json");
    fs::write(&manifest, r#"{ "entries": [] }"#).unwrap();
    assert!(InputWatcher::watch(&manifest).is_ok());
}

#[test]
fn render_cache_follows_directory_edits() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), r#"{ "description": "a" }"#).unwrap();

    let mut cache = RenderCache::new();
    let files = collect_entry_files(dir.path(), None);
    assert!(cache.is_changed(&files));
    assert!(!cache.is_changed(&files));

    fs::write(dir.path().join("b.json"), r#"{ "description": "b" }"#).unwrap();
    let files = collect_entry_files(dir.path(), None);
    assert!(cache.is_changed(&files));

    fs::write(dir.path().join("b.json"), r#"{ "description": "changed" }"#).unwrap();
    assert!(cache.is_changed(&files));
    assert!(!cache.is_changed(&files));
}

#[test]
fn fingerprint_is_stable_hex_sha256() {
    let dir = tempfile::TempDir::new().unwrap();
    fs::write(dir.path().join("a.json"), "{}").unwrap();
    fs::write(dir.path().join("b.json"), "{}").unwrap();
    let files = collect_entry_files(dir.path(), None);
    assert_eq!(fingerprint(&files), fingerprint(&files.clone()));
    assert_eq!(fingerprint(&files).len(), 64);
}
