//! Shared test utilities for integration tests
//!
//! Builds directory trees from declarative specs and snapshots them as
//! relative-path-to-content maps, so tests can compare whole trees before
//! and after overlay operations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// A base/custom/state directory triple rooted in one temp dir.
pub struct OverlayFixture {
    // Held so the directories outlive the fixture
    _temp_dir: TempDir,
    pub base: PathBuf,
    pub custom: PathBuf,
    pub state: PathBuf,
}

impl OverlayFixture {
    /// Create the three directories and populate base and custom from
    /// `(relative path, content)` specs.
    pub fn new(base_files: &[(&str, &str)], custom_files: &[(&str, &str)]) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("base");
        let custom = temp_dir.path().join("custom");
        let state = temp_dir.path().join("state");
        fs::create_dir_all(&base).unwrap();
        fs::create_dir_all(&custom).unwrap();
        fs::create_dir_all(&state).unwrap();
        build_tree(&base, base_files);
        build_tree(&custom, custom_files);
        OverlayFixture {
            _temp_dir: temp_dir,
            base,
            custom,
            state,
        }
    }
}

/// Write `(relative path, content)` pairs under `root`, creating parents.
pub fn build_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Map of every file under `root` (relative path) to its content bytes.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut map = BTreeMap::new();
    for entry in WalkDir::new(root).min_depth(1) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
            map.insert(rel, fs::read(entry.path()).unwrap());
        }
    }
    map
}
