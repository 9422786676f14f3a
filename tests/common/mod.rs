#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use once_cell::sync::Lazy;
use organizer_core::{
    storage::{JsonFileStore, Store},
    Organizer,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// File-backed store rooted in a unique directory.
pub fn file_store(base: &std::path::Path, quota: Option<u64>) -> Arc<Store> {
    let backend = JsonFileStore::new(base.join("data"))
        .expect("create json store")
        .with_quota(quota);
    Arc::new(Store::new(Box::new(backend)))
}

/// Organizer backed by JSON files in a fresh directory, plus that directory.
pub fn setup_organizer() -> (Organizer, PathBuf) {
    let base = temp_base();
    (Organizer::open(file_store(&base, None)), base)
}
