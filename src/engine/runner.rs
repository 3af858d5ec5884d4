//! engine::runner
//!
//! Load -> Mutate -> Verify -> Save for one metadata document.
//!
//! # Architecture
//!
//! ```text
//! Load -> Mutate (validate, compute, write in memory) -> Verify -> Save
//! ```
//!
//! The mutation step is one of the pure operations in
//! [`crate::core::branch`]; it either succeeds completely or leaves the
//! loaded document untouched, and in the failure case nothing is saved.
//!
//! # Invariants
//!
//! - Only this module saves documents
//! - Saves carry the revision the document was loaded at
//! - Verification findings after a mutation are reported, never repaired

use thiserror::Error;

use crate::core::branch::{self, BranchError};
use crate::core::metadata::schema::{BranchEntry, Metadata};
use crate::core::metadata::store::{MetadataStore, StoreError};
use crate::core::types::DatabaseName;
use crate::core::verify::{self, VerifyReport};
use crate::ui::output::{self, Verbosity};

/// Errors from the engine runner.
///
/// Messages are passed through unchanged so the CLI can show them verbatim.
#[derive(Debug, Error)]
pub enum RunError {
    /// Loading or saving the document failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The branch operation was rejected.
    #[error(transparent)]
    Branch(#[from] BranchError),
}

/// Settings for a mutating run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub verbosity: Verbosity,
    /// Verify the mutated document before saving it.
    pub verify_after_write: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::Normal,
            verify_after_write: true,
        }
    }
}

/// Arguments for creating a branch.
#[derive(Debug, Clone, Default)]
pub struct CreateBranchRequest {
    pub branch: String,
    pub commit: String,
    pub description: String,
}

/// Create a branch in `db` and persist the result.
///
/// Returns the entry as saved.
pub fn create_branch<S: MetadataStore + ?Sized>(
    store: &S,
    db: &DatabaseName,
    request: &CreateBranchRequest,
    options: RunOptions,
) -> Result<BranchEntry, RunError> {
    run_mutation(store, db, options, |meta| {
        let entry = branch::create_branch(
            meta,
            &request.branch,
            &request.commit,
            &request.description,
        )?;
        output::debug(
            format!(
                "branch '{}' at {} ({} commits)",
                request.branch, entry.commit, entry.commit_count
            ),
            options.verbosity,
        );
        Ok(entry.clone())
    })
}

/// Recompute the cached commit count of `branch` in `db` and persist it.
///
/// Returns `(previous, refreshed)`. The document is saved even when the
/// count did not change, so the revision always advances on success.
pub fn recount_branch<S: MetadataStore + ?Sized>(
    store: &S,
    db: &DatabaseName,
    branch_name: &str,
    options: RunOptions,
) -> Result<(u64, u64), RunError> {
    run_mutation(store, db, options, |meta| {
        Ok(branch::recount_branch(meta, branch_name)?)
    })
}

/// Load `db` read-only.
pub fn load<S: MetadataStore + ?Sized>(
    store: &S,
    db: &DatabaseName,
    verbosity: Verbosity,
) -> Result<Metadata, RunError> {
    output::debug(format!("Loading metadata for {}", db), verbosity);
    let meta = store.load(db)?;
    output::debug(
        format!(
            "Loaded revision {} ({} commits, {} branches)",
            meta.revision,
            meta.commits.len(),
            meta.branches.len()
        ),
        verbosity,
    );
    Ok(meta)
}

/// Load `db` and verify it.
pub fn verify_database<S: MetadataStore + ?Sized>(
    store: &S,
    db: &DatabaseName,
    verbosity: Verbosity,
) -> Result<VerifyReport, RunError> {
    let meta = load(store, db, verbosity)?;
    Ok(verify::verify(&meta))
}

fn run_mutation<S, T, F>(
    store: &S,
    db: &DatabaseName,
    options: RunOptions,
    mutate: F,
) -> Result<T, RunError>
where
    S: MetadataStore + ?Sized,
    F: FnOnce(&mut Metadata) -> Result<T, BranchError>,
{
    let verbosity = options.verbosity;

    // 1. Load
    let mut meta = load(store, db, verbosity)?;

    // 2. Mutate
    output::debug("Applying change", verbosity);
    let result = mutate(&mut meta)?;

    // 3. Verify
    if options.verify_after_write {
        output::debug("Verifying document", verbosity);
        for finding in verify::verify(&meta).findings {
            output::warn(finding, verbosity);
        }
    }

    // 4. Save
    output::debug(
        format!("Saving metadata for {} at revision {}", db, meta.revision),
        verbosity,
    );
    let revision = store.save(db, &meta)?;
    output::debug(format!("Saved revision {}", revision), verbosity);

    Ok(result)
}
