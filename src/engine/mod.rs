//! engine
//!
//! Command context and the run lifecycle for metadata mutations.
//!
//! # Architecture
//!
//! The engine sits between the CLI and the core. The CLI builds a
//! [`Context`] from flags and configuration, the context resolves the
//! metadata store, and [`runner`] drives one operation through
//! Load -> Mutate -> Verify -> Save.
//!
//! # Invariants
//!
//! - The core never performs I/O; the engine owns every load and save
//! - A rejected operation never reaches the save step
//!
//! # Example
//!
//! ```ignore
//! use dbvc::engine::{Context, runner};
//!
//! let ctx = Context::default();
//! let store = ctx.open_store()?;
//! let entry = runner::create_branch(&store, &db, &request, ctx.run_options())?;
//! ```

pub mod runner;

pub use runner::{CreateBranchRequest, RunError, RunOptions};

use std::path::PathBuf;

use crate::core::metadata::FileMetadataStore;
use crate::core::paths::StorePaths;
use crate::ui::output::Verbosity;

/// Execution context for commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory override.
    pub cwd: Option<PathBuf>,
    /// Metadata cache root. Relative paths resolve against the working
    /// directory; `None` means `<cwd>/.dbvc`.
    pub metadata_dir: Option<PathBuf>,
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Run verification after each mutation.
    pub verify_after_write: bool,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            cwd: None,
            metadata_dir: None,
            debug: false,
            quiet: false,
            verify_after_write: true,
        }
    }
}

/// Errors from setting up the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The working directory could not be determined.
    #[error("cannot determine working directory: {0}")]
    WorkingDir(#[source] std::io::Error),
}

impl Context {
    /// Output verbosity for this context.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Options for the mutation runner.
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            verbosity: self.verbosity(),
            verify_after_write: self.verify_after_write,
        }
    }

    /// Effective working directory.
    pub fn working_dir(&self) -> Result<PathBuf, EngineError> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().map_err(EngineError::WorkingDir),
        }
    }

    /// Paths of the metadata cache.
    pub fn store_paths(&self) -> Result<StorePaths, EngineError> {
        let cwd = self.working_dir()?;
        Ok(match &self.metadata_dir {
            Some(dir) => StorePaths::new(cwd.join(dir)),
            None => StorePaths::in_dir(&cwd),
        })
    }

    /// Open the file-backed metadata store for this context.
    pub fn open_store(&self) -> Result<FileMetadataStore, EngineError> {
        Ok(FileMetadataStore::new(self.store_paths()?))
    }
}
