//! CLI parse: clap types for Drape. No behavior; definitions only.
//!
//! The CLI is a thin caller around the core: it validates the configured
//! directories, invokes `apply`/`clean`, and maps errors to exit codes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drape CLI - reversible directory overlays
#[derive(Parser)]
#[command(name = "drape")]
#[command(about = "Reversibly overlay one directory tree onto another")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (default: drape.toml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the source tree onto the destination tree
    Apply,
    /// Undo the current apply from its changelog, then apply again
    Reapply,
    /// Undo the current apply, restoring the destination tree
    Clean,
}

/// Process exit codes
pub mod exit_code {
    /// Generic failure (I/O, corrupt state artifact, configuration).
    pub const FAILURE: i32 = 1;
    /// The configured base or custom directory is missing or not a directory.
    pub const BAD_DIRECTORIES: i32 = 2;
    /// Apply was requested while an apply is already in effect.
    pub const ALREADY_APPLIED: i32 = 50;
}
