//! Tree merging and its inverse.
//!
//! [`TreeMerger`] walks a source tree and a destination tree in lock-step,
//! copying files and creating directories according to a fixed
//! [`MergePolicy`], and records every creation or modification into a
//! [`ChangeLog`]. `undo` replays a log destructively: it trusts the log
//! fully instead of diffing against the live tree, trading robustness
//! against external tampering for simplicity.

use crate::error::{EntryError, OverlayError};
use crate::history::ChangeLog;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Suffix appended to a destination file renamed aside before an overwrite.
///
/// A real file that already ends in this suffix collides with the backup of
/// its unsuffixed sibling; this is a documented limitation, not detected.
pub const BACKUP_SUFFIX: &str = ".overlay.bak";

/// Copy policy for one merge direction, fixed per [`TreeMerger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Overwrite files that already exist at the destination.
    pub replace: bool,
    /// Rename existing destination files aside before overwriting them.
    pub backup: bool,
}

impl MergePolicy {
    /// Union-merge: copy-if-absent, never overwrite.
    pub fn union() -> Self {
        MergePolicy {
            replace: false,
            backup: false,
        }
    }

    /// Override-merge: copy-and-backup, always overwrite.
    pub fn override_merge() -> Self {
        MergePolicy {
            replace: true,
            backup: true,
        }
    }
}

/// Backup artifact path for a destination file: the path with
/// [`BACKUP_SUFFIX`] appended.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(BACKUP_SUFFIX);
    PathBuf::from(os)
}

/// One level of a directory, split by kind and sorted by file name for
/// deterministic traversal.
struct Level {
    dirs: Vec<PathBuf>,
    files: Vec<PathBuf>,
}

fn list_level(dir: &Path) -> io::Result<Level> {
    let mut level = Level {
        dirs: Vec::new(),
        files: Vec::new(),
    };

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to list directory {:?}: {}", dir, e),
            )
        })?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            level.dirs.push(entry.into_path());
        } else if file_type.is_file() {
            level.files.push(entry.into_path());
        }
        // Symlinks are neither followed nor copied
    }

    Ok(level)
}

/// Merges a source tree onto a destination tree and undoes prior merges.
#[derive(Debug)]
pub struct TreeMerger {
    source: PathBuf,
    dest: PathBuf,
    policy: MergePolicy,
}

impl TreeMerger {
    /// Create a merger for the given trees and policy.
    ///
    /// # Panics
    ///
    /// Panics if the policy requests backups without replacement; backing up
    /// files that will never be overwritten is a programming error.
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(source: P, dest: Q, policy: MergePolicy) -> Self {
        assert!(
            !(policy.backup && !policy.replace),
            "backup without replace is meaningless"
        );
        TreeMerger {
            source: source.into(),
            dest: dest.into(),
            policy,
        }
    }

    /// Recursively merge the source tree onto the destination tree.
    ///
    /// Name collisions (a file where a directory is expected, or vice versa)
    /// are logged per entry and skipped; the merge continues with the rest of
    /// the tree. Only a failure to list the source root is fatal.
    pub fn merge(&self) -> Result<ChangeLog, OverlayError> {
        let mut log = ChangeLog::new();
        self.merge_dir(&self.source, &self.dest, &mut log)?;
        Ok(log)
    }

    fn merge_dir(&self, from: &Path, to: &Path, log: &mut ChangeLog) -> io::Result<()> {
        debug!(from = %from.display(), to = %to.display(), "processing directory");
        let level = list_level(from)?;

        for from_dir in &level.dirs {
            let to_dir = to.join(from_dir.file_name().expect("listed entries have names"));
            if let Err(e) = self.merge_subdir(from_dir, &to_dir, log) {
                error!(path = %to_dir.display(), "skipping directory: {}", e);
            }
        }
        for from_file in &level.files {
            let to_file = to.join(from_file.file_name().expect("listed entries have names"));
            if let Err(e) = self.merge_file(from_file, &to_file, log) {
                error!(path = %to_file.display(), "skipping file: {}", e);
            }
        }

        Ok(())
    }

    fn merge_subdir(
        &self,
        from_dir: &Path,
        to_dir: &Path,
        log: &mut ChangeLog,
    ) -> Result<(), EntryError> {
        if to_dir.exists() {
            if !to_dir.is_dir() {
                return Err(EntryError::NotADirectory(to_dir.to_path_buf()));
            }
        } else {
            fs::create_dir(to_dir)?;
            // Recorded before descending so a failure deeper in the subtree
            // cannot leave the new directory out of the log.
            log.record_created_dir(to_dir);
        }
        self.merge_dir(from_dir, to_dir, log)?;
        Ok(())
    }

    fn merge_file(
        &self,
        from_file: &Path,
        to_file: &Path,
        log: &mut ChangeLog,
    ) -> Result<(), EntryError> {
        let existed = to_file.exists();
        if existed && !to_file.is_file() {
            return Err(EntryError::NotAFile(to_file.to_path_buf()));
        }

        if existed && self.policy.backup {
            fs::rename(to_file, backup_path(to_file))?;
        }

        if self.policy.replace || !existed {
            debug!(from = %from_file.display(), to = %to_file.display(), "copying file");
            fs::copy(from_file, to_file)?;
            if existed {
                log.record_modified_file(to_file);
            } else {
                log.record_created_file(to_file);
            }
        } else {
            debug!(path = %to_file.display(), "ignoring existing file");
        }

        Ok(())
    }

    /// Undo a prior merge by replaying its change log.
    ///
    /// Directories are removed with their whole subtree; files are deleted
    /// and their backup, if any, renamed back into place. A logged path that
    /// no longer exists is a warning, never an abort.
    pub fn undo(&self, log: &ChangeLog) -> Result<(), OverlayError> {
        for path in log.undo_order() {
            if path.is_dir() {
                debug!(path = %path.display(), "removing directory");
                fs::remove_dir_all(path)?;
            } else if path.is_file() {
                debug!(path = %path.display(), "removing file");
                fs::remove_file(path)?;
                let backup = backup_path(path);
                if backup.exists() {
                    debug!(path = %path.display(), "restoring backup");
                    fs::rename(&backup, path)?;
                }
            } else {
                warn!(path = %path.display(), "cannot clean: path no longer exists");
            }
        }
        Ok(())
    }
}
