//! Ordered record of what a merge created or modified, used to drive undo.
//!
//! The log keeps two ordered lists: files that were created or overwritten
//! (one record kind — undo deletes both the same way), and directories that
//! did not exist before the merge. Union-merge never overwrites, so modified
//! records only ever arise under override-merge; the file record kind stays
//! unified regardless because undo does not distinguish them.
//!
//! Undo order is structural, not trusted to construction order: all file
//! records first (append order), then directory records in reverse creation
//! order, so innermost directories are removed before their ancestors and no
//! removal hits a non-empty parent.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Change history of one merge operation.
///
/// Starts empty; records are appended as the merge walks the source tree.
/// No de-duplication and no validation against the live filesystem.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeLog {
    /// Files created or overwritten, in append order.
    files: Vec<PathBuf>,
    /// Directories created, in creation order (parents before children).
    dirs: Vec<PathBuf>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Record a file that did not exist at the destination before the merge.
    pub fn record_created_file<P: Into<PathBuf>>(&mut self, path: P) {
        self.files.push(path.into());
    }

    /// Record a file that existed at the destination and was overwritten.
    pub fn record_modified_file<P: Into<PathBuf>>(&mut self, path: P) {
        self.files.push(path.into());
    }

    /// Record a directory created by the merge. Pre-existing destination
    /// directories are never recorded, so undo cannot delete them.
    pub fn record_created_dir<P: Into<PathBuf>>(&mut self, path: P) {
        self.dirs.push(path.into());
    }

    /// Paths in the order undo must process them: files first, then
    /// directories innermost-first.
    pub fn undo_order(&self) -> impl Iterator<Item = &Path> {
        self.files
            .iter()
            .chain(self.dirs.iter().rev())
            .map(PathBuf::as_path)
    }

    /// Serialize to the changelog artifact: one path per line, in undo order.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut out = Vec::new();
        for entry in self.undo_order() {
            writeln!(out, "{}", entry.display())?;
        }
        fs::write(path, out)
    }

    /// Reconstruct a log from the changelog artifact, preserving line order.
    ///
    /// The serialized form carries no record kinds; undo re-derives them from
    /// the live filesystem. Lines land in the file list so that `undo_order`
    /// on a loaded log replays exactly the serialized order.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let files = contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(PathBuf::from)
            .collect();
        Ok(ChangeLog {
            files,
            dirs: Vec::new(),
        })
    }
}
