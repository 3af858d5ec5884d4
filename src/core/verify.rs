//! core::verify
//!
//! Structural verification of a metadata document.
//!
//! # Checks
//!
//! - Every parent link resolves to a commit in the document
//! - No parent chain loops back on itself
//! - Every branch points at an existing commit
//! - Every branch's cached `commit_count` matches the live chain length
//!
//! A stale `commit_count` is reported but does not fail verification:
//! the count is a snapshot and may legitimately lag behind history
//! rewrites until the branch is recounted.
//!
//! # Invariants
//!
//! - Never mutates the document
//! - Must be deterministic (findings are ordered)

use thiserror::Error;

use super::graph::CommitGraph;
use super::metadata::schema::Metadata;

/// A single verification finding.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Finding {
    #[error("commit {commit} references missing parent {parent}")]
    DanglingParent { commit: String, parent: String },

    #[error("cycle detected in commit history at {0}")]
    CycleDetected(String),

    #[error("branch '{branch}' points at missing commit {commit}")]
    BranchCommitMissing { branch: String, commit: String },

    #[error("branch '{branch}' caches {cached} commits but its chain has {actual}")]
    StaleCommitCount {
        branch: String,
        cached: u64,
        actual: u64,
    },
}

impl Finding {
    /// Whether this finding means the document is structurally broken.
    pub fn is_error(&self) -> bool {
        !matches!(self, Finding::StaleCommitCount { .. })
    }
}

/// Result of verification.
#[derive(Debug, Default)]
pub struct VerifyReport {
    /// All findings, errors first in check order
    pub findings: Vec<Finding>,
}

impl VerifyReport {
    /// Whether no structural errors were found.
    pub fn ok(&self) -> bool {
        !self.findings.iter().any(Finding::is_error)
    }

    /// Structural errors only.
    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_error())
    }

    /// Informational findings only.
    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| !f.is_error())
    }
}

/// Verify the commit graph and branch pointers of `meta`.
pub fn verify(meta: &Metadata) -> VerifyReport {
    let graph = CommitGraph::new(&meta.commits);
    let mut findings = Vec::new();

    for (commit, parent) in graph.dangling_parents() {
        findings.push(Finding::DanglingParent {
            commit: commit.to_string(),
            parent: parent.to_string(),
        });
    }

    if let Some(commit) = graph.find_cycle() {
        findings.push(Finding::CycleDetected(commit.to_string()));
    }

    for (name, branch) in &meta.branches {
        if !graph.contains(branch.commit.as_str()) {
            findings.push(Finding::BranchCommitMissing {
                branch: name.to_string(),
                commit: branch.commit.to_string(),
            });
            continue;
        }

        // Broken chains are already reported above.
        if let Ok(actual) = graph.chain_length(branch.commit.as_str()) {
            if actual != branch.commit_count {
                findings.push(Finding::StaleCommitCount {
                    branch: name.to_string(),
                    cached: branch.commit_count,
                    actual,
                });
            }
        }
    }

    VerifyReport { findings }
}
