//! core::branch
//!
//! Branch creation against an in-memory metadata document.
//!
//! # Lifecycle
//!
//! Every operation here follows validate -> compute -> mutate:
//! 1. Reject missing inputs
//! 2. Check the document (branch uniqueness, commit existence)
//! 3. Walk the commit chain to compute `commit_count`
//! 4. Write the branch entry
//!
//! Nothing is written until every check has passed, so a failed call
//! leaves the document exactly as it was. No I/O happens here; loading and
//! saving belong to [`crate::core::metadata::store`].
//!
//! # Example
//!
//! ```
//! use dbvc::core::branch::{create_branch, BranchError};
//! use dbvc::core::metadata::schema::{CommitEntry, Metadata};
//! use dbvc::core::types::CommitId;
//!
//! let mut meta = Metadata::new();
//! let c1 = CommitId::new("c1").unwrap();
//! let c2 = CommitId::new("c2").unwrap();
//! meta.insert_commit(CommitEntry::new(c1.clone(), None));
//! meta.insert_commit(CommitEntry::new(c2, Some(c1)));
//!
//! let entry = create_branch(&mut meta, "main", "c2", "release").unwrap();
//! assert_eq!(entry.commit_count, 2);
//!
//! let again = create_branch(&mut meta, "main", "c1", "");
//! assert!(matches!(again, Err(BranchError::AlreadyExists(_))));
//! ```

use thiserror::Error;

use super::graph::{CommitGraph, GraphError};
use super::metadata::schema::{BranchEntry, Metadata};
use super::types::{BranchName, CommitId};

/// Errors from branch operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BranchError {
    /// A required input was empty.
    #[error("{0}")]
    MissingInput(MissingField),

    /// The branch name is already taken.
    #[error("a branch named '{0}' already exists")]
    AlreadyExists(String),

    /// The commit is not part of the database's commit list.
    #[error("commit '{0}' isn't in the database commit list")]
    CommitNotFound(String),

    /// The branch does not exist.
    #[error("no branch named '{0}'")]
    BranchNotFound(String),

    /// The commit chain is broken (dangling parent or cycle).
    #[error("corrupt commit history: {0}")]
    CorruptHistory(GraphError),
}

/// Which required input was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    BranchName,
    CommitId,
}

impl std::fmt::Display for MissingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingField::BranchName => write!(f, "no branch name given"),
            MissingField::CommitId => write!(f, "no commit id given"),
        }
    }
}

impl BranchError {
    /// Whether this error means the caller asked for something absent.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BranchError::CommitNotFound(_) | BranchError::BranchNotFound(_)
        )
    }
}

/// Create a branch named `branch` at `commit`.
///
/// On success the new entry is inserted into `meta.branches` and a
/// reference to it is returned. `meta.commits` is never touched.
///
/// # Errors
///
/// Checked in this order:
/// - [`BranchError::MissingInput`] if `branch` or `commit` is empty
/// - [`BranchError::AlreadyExists`] if `branch` is already in the document
/// - [`BranchError::CommitNotFound`] if `commit` is not in the document
/// - [`BranchError::CorruptHistory`] if the chain from `commit` is broken
pub fn create_branch<'m>(
    meta: &'m mut Metadata,
    branch: &str,
    commit: &str,
    description: &str,
) -> Result<&'m BranchEntry, BranchError> {
    let name = BranchName::new(branch)
        .map_err(|_| BranchError::MissingInput(MissingField::BranchName))?;
    let commit_id =
        CommitId::new(commit).map_err(|_| BranchError::MissingInput(MissingField::CommitId))?;

    if meta.branches.contains_key(&name) {
        return Err(BranchError::AlreadyExists(name.to_string()));
    }

    let commit_count = count_commits(meta, &commit_id)?;

    let entry: &BranchEntry = meta.branches.entry(name).or_insert(BranchEntry {
        commit: commit_id,
        commit_count,
        description: description.to_string(),
    });
    Ok(entry)
}

/// Recompute the cached `commit_count` of an existing branch.
///
/// Returns the previous and the refreshed count. The branch head and
/// description are left alone.
///
/// # Errors
///
/// - [`BranchError::MissingInput`] if `branch` is empty
/// - [`BranchError::BranchNotFound`] if the branch does not exist
/// - [`BranchError::CommitNotFound`] if the branch head is no longer in the document
/// - [`BranchError::CorruptHistory`] if the chain from the head is broken
pub fn recount_branch(meta: &mut Metadata, branch: &str) -> Result<(u64, u64), BranchError> {
    if branch.is_empty() {
        return Err(BranchError::MissingInput(MissingField::BranchName));
    }

    let head = meta
        .branches
        .get(branch)
        .map(|entry| entry.commit.clone())
        .ok_or_else(|| BranchError::BranchNotFound(branch.to_string()))?;

    let fresh = count_commits(meta, &head)?;

    let entry = meta
        .branches
        .get_mut(branch)
        .ok_or_else(|| BranchError::BranchNotFound(branch.to_string()))?;
    let previous = std::mem::replace(&mut entry.commit_count, fresh);
    Ok((previous, fresh))
}

/// Chain length from `commit` to its root, mapped into branch errors.
fn count_commits(meta: &Metadata, commit: &CommitId) -> Result<u64, BranchError> {
    CommitGraph::new(&meta.commits)
        .chain_length(commit.as_str())
        .map_err(|e| match e {
            GraphError::CommitNotFound(id) => BranchError::CommitNotFound(id),
            other => BranchError::CorruptHistory(other),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::schema::CommitEntry;

    fn id(s: &str) -> CommitId {
        CommitId::new(s).unwrap()
    }

    /// c1 <- c2 <- c3
    fn three_commits() -> Metadata {
        let mut meta = Metadata::new();
        meta.insert_commit(CommitEntry::new(id("c1"), None));
        meta.insert_commit(CommitEntry::new(id("c2"), Some(id("c1"))));
        meta.insert_commit(CommitEntry::new(id("c3"), Some(id("c2"))));
        meta
    }

    mod create {
        use super::*;

        #[test]
        fn release_scenario() {
            let mut meta = three_commits();
            let commits_before = meta.commits.clone();

            let entry = create_branch(&mut meta, "main", "c3", "release").unwrap();
            assert_eq!(
                entry,
                &BranchEntry {
                    commit: id("c3"),
                    commit_count: 3,
                    description: "release".into(),
                }
            );
            assert_eq!(meta.branches.len(), 1);
            assert_eq!(meta.commits, commits_before);

            let again = create_branch(&mut meta, "main", "c1", "");
            assert_eq!(again, Err(BranchError::AlreadyExists("main".into())));
        }

        #[test]
        fn root_commit_counts_one() {
            let mut meta = three_commits();
            let entry = create_branch(&mut meta, "first", "c1", "").unwrap();
            assert_eq!(entry.commit_count, 1);
            assert!(entry.description.is_empty());
        }

        #[test]
        fn empty_branch_name() {
            let mut meta = three_commits();
            let before = meta.clone();
            assert_eq!(
                create_branch(&mut meta, "", "c1", ""),
                Err(BranchError::MissingInput(MissingField::BranchName))
            );
            assert_eq!(meta, before);
        }

        #[test]
        fn empty_commit_id() {
            let mut meta = three_commits();
            let before = meta.clone();
            assert_eq!(
                create_branch(&mut meta, "dev", "", ""),
                Err(BranchError::MissingInput(MissingField::CommitId))
            );
            assert_eq!(meta, before);
        }

        #[test]
        fn missing_name_checked_before_duplicate() {
            let mut meta = three_commits();
            create_branch(&mut meta, "main", "c1", "").unwrap();
            assert_eq!(
                create_branch(&mut meta, "main", "", ""),
                Err(BranchError::MissingInput(MissingField::CommitId))
            );
        }

        #[test]
        fn duplicate_checked_before_commit_lookup() {
            let mut meta = three_commits();
            create_branch(&mut meta, "main", "c1", "").unwrap();
            assert_eq!(
                create_branch(&mut meta, "main", "nope", ""),
                Err(BranchError::AlreadyExists("main".into()))
            );
        }

        #[test]
        fn unknown_commit() {
            let mut meta = three_commits();
            let before = meta.clone();
            let err = create_branch(&mut meta, "dev", "c9", "").unwrap_err();
            assert_eq!(err, BranchError::CommitNotFound("c9".into()));
            assert!(err.is_not_found());
            assert_eq!(meta, before);
        }

        #[test]
        fn dangling_parent_is_corrupt_history() {
            let mut meta = Metadata::new();
            meta.insert_commit(CommitEntry::new(id("c2"), Some(id("c1"))));
            let before = meta.clone();

            let err = create_branch(&mut meta, "dev", "c2", "").unwrap_err();
            assert!(matches!(
                err,
                BranchError::CorruptHistory(GraphError::DanglingParent { .. })
            ));
            assert_eq!(meta, before);
        }

        #[test]
        fn cycle_is_corrupt_history() {
            let mut meta = Metadata::new();
            meta.insert_commit(CommitEntry::new(id("a"), Some(id("b"))));
            meta.insert_commit(CommitEntry::new(id("b"), Some(id("a"))));

            let err = create_branch(&mut meta, "dev", "a", "").unwrap_err();
            assert!(matches!(
                err,
                BranchError::CorruptHistory(GraphError::CycleDetected(_))
            ));
            assert!(meta.branches.is_empty());
        }

        #[test]
        fn error_messages() {
            assert_eq!(
                BranchError::MissingInput(MissingField::BranchName).to_string(),
                "no branch name given"
            );
            assert_eq!(
                BranchError::AlreadyExists("main".into()).to_string(),
                "a branch named 'main' already exists"
            );
            assert!(BranchError::CommitNotFound("c9".into())
                .to_string()
                .contains("c9"));
        }
    }

    mod recount {
        use super::*;

        #[test]
        fn refreshes_stale_count() {
            let mut meta = three_commits();
            create_branch(&mut meta, "main", "c3", "keep me").unwrap();
            meta.branches.get_mut("main").unwrap().commit_count = 10;

            assert_eq!(recount_branch(&mut meta, "main"), Ok((10, 3)));
            let entry = meta.branch("main").unwrap();
            assert_eq!(entry.commit_count, 3);
            assert_eq!(entry.description, "keep me");
        }

        #[test]
        fn unknown_branch() {
            let mut meta = three_commits();
            assert_eq!(
                recount_branch(&mut meta, "ghost"),
                Err(BranchError::BranchNotFound("ghost".into()))
            );
        }

        #[test]
        fn head_removed_leaves_entry_untouched() {
            let mut meta = three_commits();
            create_branch(&mut meta, "main", "c3", "").unwrap();
            meta.commits.remove("c3");
            let before = meta.clone();

            assert_eq!(
                recount_branch(&mut meta, "main"),
                Err(BranchError::CommitNotFound("c3".into()))
            );
            assert_eq!(meta, before);
        }
    }
}
