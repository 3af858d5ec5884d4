//! dbvc - version control metadata for hosted databases
//!
//! dbvc keeps a per-database commit history and a set of named branch
//! pointers into it. This crate implements the branch side of that model:
//! creating branches at existing commits, keeping their cached commit
//! counts, and checking a history for structural damage.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Load -> Mutate -> Verify -> Save
//! - [`core`] - Domain types, schemas, graph walks, verification and storage
//! - [`ui`] - User-facing output
//!
//! # Correctness Invariants
//!
//! 1. Validation strictly precedes mutation; a failed operation changes nothing
//! 2. Branch operations only ever touch the branch map, never the commits
//! 3. Commit chain walks are bounded, so a corrupt history cannot hang a command
//! 4. Saves are rejected when the stored document moved since it was loaded

pub mod cli;
pub mod core;
pub mod engine;
pub mod ui;
