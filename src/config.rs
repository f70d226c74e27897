//! Configuration loading for the overlay.
//!
//! Settings come from `drape.toml` in the working directory (or an explicit
//! `--config` path), with `DRAPE_`-prefixed environment variable overrides.
//! The directories named here are validated by the CLI layer before any core
//! operation runs.

use crate::error::OverlayError;
use crate::logging::LoggingConfig;
use crate::overlay::Direction;
use ::config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "drape.toml";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// The base tree (destination under tobase, source under tocustom)
    pub base_dir: PathBuf,

    /// The customized tree (source under tobase, destination under tocustom)
    pub custom_dir: PathBuf,

    /// Where the state and changelog artifacts live
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Merge direction: "tobase" or "tocustom"
    pub direction: Direction,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".")
}

impl OverlayConfig {
    /// Load configuration from the default `drape.toml` (if present) plus
    /// environment overrides. A missing file is an error only if required
    /// fields then stay unset.
    pub fn load() -> Result<Self, OverlayError> {
        Self::build(File::with_name("drape").required(false))
    }

    /// Load configuration from an explicit file path.
    pub fn load_from_file(path: &Path) -> Result<Self, OverlayError> {
        Self::build(File::from(path).required(true))
    }

    fn build(
        source: File<::config::FileSourceFile, ::config::FileFormat>,
    ) -> Result<Self, OverlayError> {
        let config = Config::builder()
            .set_default("state_dir", ".")?
            .add_source(source)
            .add_source(Environment::with_prefix("DRAPE"))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate that the configured trees exist and are directories.
    ///
    /// This is the CLI-layer precondition: the core assumes valid trees.
    pub fn validate(&self) -> Result<(), OverlayError> {
        for (name, dir) in [("base_dir", &self.base_dir), ("custom_dir", &self.custom_dir)] {
            if !dir.is_dir() {
                return Err(OverlayError::Config(format!(
                    "{} is not a directory: {}",
                    name,
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
