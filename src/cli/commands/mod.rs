//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output
//!
//! Handlers do NOT read or write metadata directly.

mod branch;
mod verify;

pub use branch::{create, list, recount};
pub use verify::verify;

use anyhow::{Context as _, Result};

use super::args::{BranchAction, Command};
use crate::core::types::DatabaseName;
use crate::engine::Context;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Branch { action } => match action {
            BranchAction::Create {
                database,
                branch,
                commit,
                description,
            } => create(ctx, &database, &branch, &commit, &description),
            BranchAction::List { database } => list(ctx, &database),
            BranchAction::Recount { database, branch } => recount(ctx, &database, &branch),
        },
        Command::Verify { database } => verify(ctx, &database),
    }
}

/// Parse a database argument.
pub(crate) fn database_arg(database: &str) -> Result<DatabaseName> {
    DatabaseName::new(database).with_context(|| format!("database '{}'", database))
}
