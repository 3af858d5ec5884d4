//! cli
//!
//! Command-line interface layer for dbvc.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Merge flags with the user configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`], which owns every load and save of metadata.

pub mod args;
pub mod commands;

pub use args::Cli;

use anyhow::{Context as _, Result};

use crate::core::config::Config;
use crate::engine;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let config = Config::load().context("Failed to load configuration")?;

    let cwd = match &cli.cwd {
        Some(cwd) => cwd.clone(),
        None => std::env::current_dir().context("Failed to determine working directory")?,
    };

    // Flags take precedence over config.
    let metadata_dir = match &cli.metadata_dir {
        Some(dir) => cwd.join(dir),
        None => config.metadata_dir(&cwd),
    };

    let ctx = engine::Context {
        cwd: Some(cwd),
        metadata_dir: Some(metadata_dir),
        debug: cli.debug || config.debug(),
        quiet: cli.quiet,
        verify_after_write: !cli.no_verify && config.verify_after_write(),
    };

    if let Some(path) = config.loaded_from() {
        crate::ui::output::debug(
            format!("Loaded config from {}", path.display()),
            ctx.verbosity(),
        );
    }

    commands::dispatch(cli.command, &ctx)
}
