use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A unique database file path in the OS temp directory.
///
/// The file is deleted when the guard is dropped.
pub(crate) struct TempDbPath {
    path: PathBuf,
}

impl TempDbPath {
    pub(crate) fn new() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "transaction_summary_test_{}_{id}.db",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDbPath {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
