/// Test helper for creating unique temporary directories
use std::sync::atomic::{AtomicU64, Ordering};
use tempfile::TempDir;

static TEMP_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a uniquely named temporary directory for parallel test execution
pub fn unique_temp_dir(test_name: &str) -> TempDir {
    let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::SeqCst);
    let unique_name = format!("casebook_test_{}_{}", test_name, counter);

    tempfile::Builder::new()
        .prefix(&unique_name)
        .tempdir()
        .expect("Failed to create unique temp directory")
}
