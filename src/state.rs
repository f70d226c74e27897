//! Lifecycle state tracking, persisted to a sidecar artifact.
//!
//! The overlay is either `clean` (nothing applied) or `applied` (a merge has
//! run and its change log is on disk). The state artifact holds exactly one
//! of the two tokens and nothing else; anything unrecognized is corruption
//! and is surfaced, never coerced.

use crate::error::OverlayError;
use std::fs;
use std::path::{Path, PathBuf};

/// Overlay lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Clean,
    Applied,
}

impl OverlayState {
    /// The literal token persisted in the state artifact.
    pub fn token(self) -> &'static str {
        match self {
            OverlayState::Clean => "clean",
            OverlayState::Applied => "applied",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "clean" => Some(OverlayState::Clean),
            "applied" => Some(OverlayState::Applied),
            _ => None,
        }
    }
}

/// Persists an [`OverlayState`] to a file, mirroring it in memory.
///
/// Mutated only after a merge or undo fully completes. Each write replaces
/// the whole artifact via a temp-file rename, so a partially written state
/// is never observable.
#[derive(Debug)]
pub struct StateFile {
    path: PathBuf,
    state: OverlayState,
}

impl StateFile {
    /// Load the persisted state, initializing the artifact to `Clean` if it
    /// does not exist yet.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, OverlayError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut file = StateFile {
                path,
                state: OverlayState::Clean,
            };
            file.set(OverlayState::Clean)?;
            return Ok(file);
        }

        let contents = fs::read_to_string(&path)?;
        let state = OverlayState::from_token(contents.trim())
            .ok_or_else(|| OverlayError::CorruptState(contents.clone()))?;
        Ok(StateFile { path, state })
    }

    /// Current in-memory state (matches disk after every successful `set`).
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Atomically replace the artifact's contents with the new state.
    pub fn set(&mut self, state: OverlayState) -> Result<(), OverlayError> {
        let tmp = self.path.with_extension("state.tmp");
        fs::write(&tmp, state.token())?;
        fs::rename(&tmp, &self.path)?;
        self.state = state;
        Ok(())
    }
}
