//! Test harness for generation integration tests.
//!
//! Copies a fixture header tree into a temp dir so tests can generate, delete
//! and regenerate files without touching the checked-in fixtures.

pub mod fixtures;

use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Fixture {
    /// Copy the named fixture directory into a fresh temp dir.
    pub fn new(name: &str) -> Self {
        let fixture_src =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name);
        assert!(fixture_src.exists(), "Fixture '{name}' not found at {}", fixture_src.display());

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join(name);
        fixtures::copy_dir_recursive(&fixture_src, &root);

        Fixture { _temp_dir: temp_dir, root }
    }

    /// An empty temp dir for hand-written headers.
    pub fn empty() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();
        Fixture { _temp_dir: temp_dir, root }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create dir");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("Could not read {rel}: {e}"))
    }
}
