//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--metadata-dir <path>`: Use this metadata cache root
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// dbvc - version control metadata for hosted databases
#[derive(Parser, Debug)]
#[command(name = "dbvc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if dbvc was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Root of the local metadata cache (default: .dbvc)
    #[arg(long, global = true, value_name = "PATH")]
    pub metadata_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Skip the verification pass after a change
    #[arg(long, global = true)]
    pub no_verify: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create, list and recount branches
    Branch {
        #[command(subcommand)]
        action: BranchAction,
    },

    /// Check a database's commit history and branches for problems
    #[command(
        long_about = "Check a database's commit history and branches for problems.\n\n\
            Reports parents that point at unknown commits, parent cycles, and \
            branches whose commit is missing. Branches whose cached commit count \
            no longer matches the history are reported as warnings.",
        after_help = "\
EXAMPLES:
    dbvc verify sales.db
    dbvc branch recount sales.db --branch main   # refresh a stale count"
    )]
    Verify {
        /// Database name
        database: String,
    },
}

/// Branch subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum BranchAction {
    /// Create a branch pointing at an existing commit
    #[command(after_help = "\
EXAMPLES:
    dbvc branch create sales.db --branch release --commit 3f2a... --description \"Q3 release\"")]
    Create {
        /// Database name
        database: String,

        /// Name of the new branch
        #[arg(long, default_value = "")]
        branch: String,

        /// Commit the branch should point at
        #[arg(long, default_value = "")]
        commit: String,

        /// Free text description of the branch
        #[arg(long, default_value = "")]
        description: String,
    },

    /// List branches with their commit and commit count
    List {
        /// Database name
        database: String,
    },

    /// Recompute a branch's cached commit count
    Recount {
        /// Database name
        database: String,

        /// Branch to recount
        #[arg(long)]
        branch: String,
    },
}
