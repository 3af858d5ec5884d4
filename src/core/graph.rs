//! core::graph
//!
//! Read-only view over the commit chain of a metadata document.
//!
//! # Architecture
//!
//! Commits form singly-parented chains:
//! - Nodes are commits keyed by id
//! - Edges point from child to parent (the `parent` field)
//! - A root is a commit whose parent is empty
//!
//! # Invariants
//!
//! - Every parent link resolves to a commit in the same document
//! - Following parents from any commit terminates at a root
//!
//! Neither invariant is guaranteed by the document format. Walks are
//! bounded by the number of commits so a corrupt history surfaces as an
//! error instead of a hang.

use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use super::metadata::schema::CommitEntry;
use super::types::CommitId;

/// Errors from walking the commit chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("commit not found: {0}")]
    CommitNotFound(String),

    #[error("commit {commit} references missing parent {parent}")]
    DanglingParent { commit: String, parent: String },

    #[error("cycle detected in commit history at {0}")]
    CycleDetected(String),
}

/// Borrowed view of a commit set.
#[derive(Debug, Clone, Copy)]
pub struct CommitGraph<'a> {
    commits: &'a BTreeMap<CommitId, CommitEntry>,
}

impl<'a> CommitGraph<'a> {
    /// Create a view over a commit map.
    pub fn new(commits: &'a BTreeMap<CommitId, CommitEntry>) -> Self {
        Self { commits }
    }

    /// Whether the commit set contains `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.commits.contains_key(id)
    }

    /// Number of commits from `start` back to its root, inclusive.
    ///
    /// # Errors
    ///
    /// - [`GraphError::CommitNotFound`] if `start` is not in the set
    /// - [`GraphError::DanglingParent`] if a parent link resolves to nothing
    /// - [`GraphError::CycleDetected`] if the walk exceeds the commit count
    ///
    /// # Example
    ///
    /// ```
    /// use dbvc::core::graph::CommitGraph;
    /// use dbvc::core::metadata::schema::{CommitEntry, Metadata};
    /// use dbvc::core::types::CommitId;
    ///
    /// let c1 = CommitId::new("c1").unwrap();
    /// let c2 = CommitId::new("c2").unwrap();
    /// let mut meta = Metadata::new();
    /// meta.insert_commit(CommitEntry::new(c1.clone(), None));
    /// meta.insert_commit(CommitEntry::new(c2.clone(), Some(c1)));
    ///
    /// let graph = CommitGraph::new(&meta.commits);
    /// assert_eq!(graph.chain_length("c2"), Ok(2));
    /// ```
    pub fn chain_length(&self, start: &str) -> Result<u64, GraphError> {
        let mut count = 0;
        self.walk(start, |_| count += 1)?;
        Ok(count)
    }

    /// Ancestors of `start`, from the immediate parent to the root.
    pub fn ancestors(&self, start: &str) -> Result<Vec<CommitId>, GraphError> {
        let mut result = Vec::new();
        self.walk(start, |commit| result.push(commit.id.clone()))?;
        // The walk visits `start` first.
        result.remove(0);
        Ok(result)
    }

    /// Visit `start` and each of its ancestors in order.
    fn walk(&self, start: &str, mut visit: impl FnMut(&CommitEntry)) -> Result<(), GraphError> {
        let mut current = self
            .commits
            .get(start)
            .ok_or_else(|| GraphError::CommitNotFound(start.to_string()))?;
        let bound = self.commits.len();
        let mut steps = 1;
        visit(current);

        while let Some(parent_id) = &current.parent {
            let parent = self
                .commits
                .get(parent_id)
                .ok_or_else(|| GraphError::DanglingParent {
                    commit: current.id.to_string(),
                    parent: parent_id.to_string(),
                })?;

            // A chain longer than the commit set must revisit a commit.
            if steps >= bound {
                return Err(GraphError::CycleDetected(parent_id.to_string()));
            }

            steps += 1;
            visit(parent);
            current = parent;
        }

        Ok(())
    }

    /// Commits with no parent.
    pub fn roots(&self) -> impl Iterator<Item = &'a CommitId> {
        self.commits
            .values()
            .filter(|c| c.is_root())
            .map(|c| &c.id)
    }

    /// Every `(commit, parent)` pair whose parent is missing from the set.
    pub fn dangling_parents(&self) -> Vec<(CommitId, CommitId)> {
        self.commits
            .values()
            .filter_map(|c| match &c.parent {
                Some(parent) if !self.commits.contains_key(parent) => {
                    Some((c.id.clone(), parent.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Find a commit that lies on a parent cycle.
    ///
    /// Commits already proven to reach a root (or a dangling link) are
    /// remembered, so the whole scan is linear in the number of commits.
    pub fn find_cycle(&self) -> Option<CommitId> {
        let mut settled: HashSet<&CommitId> = HashSet::new();

        for start in self.commits.keys() {
            let mut path: HashSet<&CommitId> = HashSet::new();
            let mut current = Some(start);

            while let Some(id) = current {
                if settled.contains(id) {
                    break;
                }
                if !path.insert(id) {
                    return Some(id.clone());
                }
                current = self.commits.get(id).and_then(|c| c.parent.as_ref());
            }

            settled.extend(path);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> CommitId {
        CommitId::new(s).unwrap()
    }

    fn commits(edges: &[(&str, &str)]) -> BTreeMap<CommitId, CommitEntry> {
        edges
            .iter()
            .map(|(child, parent)| {
                let parent = if parent.is_empty() {
                    None
                } else {
                    Some(id(parent))
                };
                (id(child), CommitEntry::new(id(child), parent))
            })
            .collect()
    }

    #[test]
    fn single_root_has_length_one() {
        let set = commits(&[("c1", "")]);
        let graph = CommitGraph::new(&set);
        assert_eq!(graph.chain_length("c1"), Ok(1));
        assert_eq!(graph.ancestors("c1"), Ok(vec![]));
    }

    #[test]
    fn linear_chain_length() {
        let set = commits(&[("c1", ""), ("c2", "c1"), ("c3", "c2")]);
        let graph = CommitGraph::new(&set);
        assert_eq!(graph.chain_length("c3"), Ok(3));
        assert_eq!(graph.chain_length("c2"), Ok(2));
        assert_eq!(graph.ancestors("c3"), Ok(vec![id("c2"), id("c1")]));
    }

    #[test]
    fn branching_history_counts_only_own_chain() {
        let set = commits(&[("c1", ""), ("c2", "c1"), ("b1", "c1"), ("b2", "b1"), ("b3", "b2")]);
        let graph = CommitGraph::new(&set);
        assert_eq!(graph.chain_length("c2"), Ok(2));
        assert_eq!(graph.chain_length("b3"), Ok(4));
    }

    #[test]
    fn unknown_start() {
        let set = commits(&[("c1", "")]);
        let graph = CommitGraph::new(&set);
        assert_eq!(
            graph.chain_length("nope"),
            Err(GraphError::CommitNotFound("nope".into()))
        );
    }

    #[test]
    fn dangling_parent_is_reported() {
        let set = commits(&[("c2", "c1"), ("c3", "c2")]);
        let graph = CommitGraph::new(&set);
        assert_eq!(
            graph.chain_length("c3"),
            Err(GraphError::DanglingParent {
                commit: "c2".into(),
                parent: "c1".into(),
            })
        );
        assert_eq!(graph.dangling_parents(), vec![(id("c2"), id("c1"))]);
    }

    #[test]
    fn cycle_terminates() {
        let set = commits(&[("a", "b"), ("b", "c"), ("c", "a")]);
        let graph = CommitGraph::new(&set);
        assert!(matches!(
            graph.chain_length("a"),
            Err(GraphError::CycleDetected(_))
        ));
        assert!(graph.find_cycle().is_some());
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let set = commits(&[("a", "a")]);
        let graph = CommitGraph::new(&set);
        assert_eq!(
            graph.chain_length("a"),
            Err(GraphError::CycleDetected("a".into()))
        );
        assert_eq!(graph.find_cycle(), Some(id("a")));
    }

    #[test]
    fn tail_into_cycle_is_detected() {
        let set = commits(&[("t", "a"), ("a", "b"), ("b", "a"), ("r", "")]);
        let graph = CommitGraph::new(&set);
        assert!(matches!(
            graph.chain_length("t"),
            Err(GraphError::CycleDetected(_))
        ));
        assert!(graph.find_cycle().is_some());
    }

    #[test]
    fn acyclic_history_has_no_cycle() {
        let set = commits(&[("c1", ""), ("c2", "c1"), ("b1", "c1"), ("x", "missing")]);
        let graph = CommitGraph::new(&set);
        assert!(graph.find_cycle().is_none());
        let roots: Vec<_> = graph.roots().cloned().collect();
        assert_eq!(roots, vec![id("c1")]);
    }
}
