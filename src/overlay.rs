//! The overlay controller: composes state tracking, change history, and the
//! tree merger into the two public operations, `apply` and `clean`.

use crate::error::OverlayError;
use crate::history::ChangeLog;
use crate::merge::{MergePolicy, TreeMerger};
use crate::state::{OverlayState, StateFile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Fixed name of the lifecycle state artifact, kept in the state directory.
pub const STATE_FILE: &str = ".overlay.state";

/// Fixed name of the changelog artifact, kept in the state directory.
pub const CHANGES_FILE: &str = ".overlay.list";

/// Which tree overlays which.
///
/// The direction fixes source, destination, and merge policy for the
/// lifetime of an [`Overlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Union-merge: copy base onto custom, never overwriting (custom wins).
    ToCustom,
    /// Override-merge: copy custom onto base, backing up and replacing
    /// (custom wins here too, by replacement).
    ToBase,
}

impl Direction {
    fn policy(self) -> MergePolicy {
        match self {
            Direction::ToCustom => MergePolicy::union(),
            Direction::ToBase => MergePolicy::override_merge(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToCustom => write!(f, "tocustom"),
            Direction::ToBase => write!(f, "tobase"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tocustom" => Ok(Direction::ToCustom),
            "tobase" => Ok(Direction::ToBase),
            other => Err(OverlayError::Config(format!(
                "unknown direction: {} (expected tocustom or tobase)",
                other
            ))),
        }
    }
}

/// A reversible overlay of one directory tree onto another.
///
/// Explicitly constructed and explicitly passed; there is no process-wide
/// instance. Construction canonicalizes the three directories so the paths
/// persisted in the changelog stay valid even if a later invocation runs
/// from a different working directory.
#[derive(Debug)]
pub struct Overlay {
    merger: TreeMerger,
    state: StateFile,
    changes_path: PathBuf,
}

impl Overlay {
    pub fn new<P: AsRef<Path>>(
        base_dir: P,
        custom_dir: P,
        state_dir: P,
        direction: Direction,
    ) -> Result<Self, OverlayError> {
        let base = dunce::canonicalize(base_dir.as_ref())?;
        let custom = dunce::canonicalize(custom_dir.as_ref())?;
        let state_dir = dunce::canonicalize(state_dir.as_ref())?;

        let (source, dest) = match direction {
            Direction::ToCustom => (base, custom),
            Direction::ToBase => (custom, base),
        };

        Ok(Overlay {
            merger: TreeMerger::new(source, dest, direction.policy()),
            state: StateFile::load(state_dir.join(STATE_FILE))?,
            changes_path: state_dir.join(CHANGES_FILE),
        })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> OverlayState {
        self.state.state()
    }

    /// Merge the source tree onto the destination tree.
    ///
    /// Fails with [`OverlayError::AlreadyApplied`] — without touching the
    /// filesystem — if an apply is already in effect and `allow_repeated` is
    /// false. With `allow_repeated`, an existing apply is first undone from
    /// the persisted changelog (state is not flipped in between) and the
    /// merge then runs against the restored tree.
    pub fn apply(&mut self, allow_repeated: bool) -> Result<(), OverlayError> {
        if self.state.state() == OverlayState::Applied {
            if !allow_repeated {
                warn!("already applied; clean first to apply again");
                return Err(OverlayError::AlreadyApplied);
            }
            let previous = ChangeLog::load(&self.changes_path)?;
            self.merger.undo(&previous)?;
        }

        let changes = self.merger.merge()?;
        changes.save(&self.changes_path)?;
        self.state.set(OverlayState::Applied)?;
        info!("applied successfully");
        Ok(())
    }

    /// Undo the last apply, restoring the destination tree.
    ///
    /// A no-op when already clean.
    pub fn clean(&mut self) -> Result<(), OverlayError> {
        if self.state.state() == OverlayState::Clean {
            info!("already clean");
            return Ok(());
        }

        let changes = ChangeLog::load(&self.changes_path)?;
        self.merger.undo(&changes)?;
        self.state.set(OverlayState::Clean)?;
        info!("cleaned successfully");
        Ok(())
    }
}
