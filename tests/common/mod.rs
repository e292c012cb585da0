#![allow(dead_code)]

use std::path::PathBuf;

use formbox::record::{load_records, RecordStore};
use formbox::schema::{load_schema, SchemaCatalog};

/// Path of a file under `tests/fixtures`.
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn catalog() -> SchemaCatalog {
    load_schema(&fixture("schema.yaml")).unwrap()
}

pub fn store() -> RecordStore {
    load_records(&fixture("records.yaml")).unwrap()
}

pub mod temp_files {
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Unique directory under the system temp dir
    pub fn temp_dir(prefix: &str) -> PathBuf {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::SeqCst);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!(
            "{prefix}_{}_{}_{}",
            std::process::id(),
            counter,
            nanos
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Cleanup temporary directories (best effort)
    pub fn cleanup(paths: &[PathBuf]) {
        for path in paths {
            let _ = std::fs::remove_dir_all(path);
        }
    }
}
