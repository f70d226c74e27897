//! Drape: Reversible Directory Overlays
//!
//! Drape merges one directory tree onto another and records exactly what it
//! changed, so the merge can be undone later. Union-merge copies only files
//! missing from the destination; override-merge replaces files after renaming
//! the originals aside as backups. State survives across process invocations
//! through two small sidecar artifacts plus the per-file backups.
//!
//! Drape is single-threaded and assumes one invocation at a time: there is no
//! lockfile and no protection against two concurrent `apply` runs. That is a
//! deliberate scope boundary, not an oversight.

pub mod cli;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod merge;
pub mod overlay;
pub mod state;
