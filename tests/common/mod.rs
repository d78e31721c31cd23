#![allow(dead_code)]

use quizdesk::db::Db;

pub async fn create_test_db() -> Db {
    Db::new("sqlite::memory:")
        .await
        .expect("failed to create test database")
}

/// A database backed by a fresh file, for tests that reopen it.
pub fn test_db_url() -> (String, std::path::PathBuf) {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("quizdesk_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    (format!("sqlite://{}", path.display()), path)
}
