//! core
//!
//! Core domain types, schemas, and operations for dbvc.
//!
//! # Modules
//!
//! - [`types`] - Strong types: BranchName, CommitId, DatabaseName, etc.
//! - [`graph`] - Commit chain walks and structural queries
//! - [`branch`] - Branch creation and recount against a metadata document
//! - [`verify`] - Structural verification of a metadata document
//! - [`metadata`] - Metadata schema and storage
//! - [`ops`] - Per-database locking
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for the metadata cache
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Validation always precedes mutation

pub mod branch;
pub mod config;
pub mod graph;
pub mod metadata;
pub mod ops;
pub mod paths;
pub mod types;
pub mod verify;
