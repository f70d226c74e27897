//! Error types for the directory overlay system.

use std::path::PathBuf;
use thiserror::Error;

/// Entry-local merge failures.
///
/// These are recorded and logged at the entry where they occur; the merge
/// continues with the remaining tree. They never abort a whole operation.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("file on source has the same name as a non-file on destination: {0}")]
    NotAFile(PathBuf),

    #[error("directory on source has the same name as a non-directory on destination: {0}")]
    NotADirectory(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lifecycle and artifact errors surfaced to the caller
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("state artifact holds an unrecognized token: {0:?}")]
    CorruptState(String),

    #[error("overlay is already applied; clean first or request a reapply")]
    AlreadyApplied,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for OverlayError {
    fn from(err: config::ConfigError) -> Self {
        OverlayError::Config(err.to_string())
    }
}
