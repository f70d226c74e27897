//! Drape CLI Binary
//!
//! Thin command-line caller around the overlay core: loads configuration,
//! validates the configured directories, runs one operation, and maps error
//! conditions to process exit codes.

use clap::Parser;
use drape::cli::{exit_code, Cli, Commands};
use drape::config::OverlayConfig;
use drape::error::OverlayError;
use drape::logging::{init_logging, LoggingConfig};
use drape::overlay::Overlay;
use std::process;
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let logging_config = build_logging_config(&cli);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(exit_code::FAILURE);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            eprintln!("{}", e);
            process::exit(exit_code::FAILURE);
        }
    };

    // The core assumes valid trees; checking them is the CLI's job
    if let Err(e) = config.validate() {
        error!("{}", e);
        eprintln!("{}", e);
        process::exit(exit_code::BAD_DIRECTORIES);
    }

    let result = Overlay::new(
        &config.base_dir,
        &config.custom_dir,
        &config.state_dir,
        config.direction,
    )
    .and_then(|mut overlay| match cli.command {
        Commands::Apply => overlay.apply(false),
        Commands::Reapply => overlay.apply(true),
        Commands::Clean => overlay.clean(),
    });

    if let Err(e) = result {
        error!("Operation failed: {}", e);
        eprintln!("{}", e);
        let code = match e {
            OverlayError::AlreadyApplied => exit_code::ALREADY_APPLIED,
            _ => exit_code::FAILURE,
        };
        process::exit(code);
    }
}

fn load_config(cli: &Cli) -> Result<OverlayConfig, OverlayError> {
    match cli.config {
        Some(ref path) => OverlayConfig::load_from_file(path),
        None => OverlayConfig::load(),
    }
}

/// Build logging configuration from CLI args, environment, and config file.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli) -> LoggingConfig {
    let mut config = load_config(cli)
        .map(|c| c.logging)
        .unwrap_or_default();

    if cli.verbose {
        config.level = "debug".to_string();
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = cli.log_file {
        config.file = file.clone();
    }
    config
}
