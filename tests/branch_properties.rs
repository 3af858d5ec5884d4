//! Property-based tests for branch creation.
//!
//! These tests use proptest to check the branch operations against
//! randomly generated commit chains and branch sets.

use proptest::prelude::*;

use dbvc::core::branch::{create_branch, recount_branch, BranchError, MissingField};
use dbvc::core::graph::GraphError;
use dbvc::core::metadata::schema::{BranchEntry, CommitEntry, Metadata};
use dbvc::core::types::{BranchName, CommitId};
use dbvc::core::verify::verify;

/// Build a linear chain `c0 <- c1 <- ... <- c{len-1}`.
fn chain(len: usize) -> Metadata {
    let mut meta = Metadata::new();
    let mut parent: Option<CommitId> = None;
    for i in 0..len {
        let id = CommitId::new(format!("c{}", i)).unwrap();
        meta.insert_commit(CommitEntry::new(id.clone(), parent.take()));
        parent = Some(id);
    }
    meta
}

/// Strategy for branch names: non-empty, arbitrary printable text.
fn branch_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._/ -]{1,24}"
}

/// A chain of 1..40 commits with a few branches already on it.
fn populated_chain() -> impl Strategy<Value = Metadata> {
    (1usize..40)
        .prop_flat_map(|len| {
            (
                Just(len),
                prop::collection::btree_map(branch_name(), 0..len, 0..5),
            )
        })
        .prop_map(|(len, branches)| {
            let mut meta = chain(len);
            for (name, head) in branches {
                create_branch(&mut meta, &name, &format!("c{}", head), "").unwrap();
            }
            meta
        })
}

proptest! {
    /// Empty branch names or commit ids are rejected before anything else.
    #[test]
    fn empty_inputs_are_missing(meta in populated_chain(), name in branch_name()) {
        let before = meta.clone();

        let mut m = meta.clone();
        prop_assert_eq!(
            create_branch(&mut m, "", "c0", "d").unwrap_err(),
            BranchError::MissingInput(MissingField::BranchName)
        );
        prop_assert_eq!(&m, &before);

        let mut m = meta.clone();
        prop_assert_eq!(
            create_branch(&mut m, &name, "", "d").unwrap_err(),
            BranchError::MissingInput(MissingField::CommitId)
        );
        prop_assert_eq!(&m, &before);
    }

    /// An existing name is rejected whatever the commit argument is.
    #[test]
    fn existing_name_rejected(meta in populated_chain(), commit in "[a-z0-9]{1,8}") {
        let existing: Vec<BranchName> = meta.branches.keys().cloned().collect();
        for name in existing {
            let mut m = meta.clone();
            prop_assert_eq!(
                create_branch(&mut m, name.as_str(), &commit, "x").unwrap_err(),
                BranchError::AlreadyExists(name.to_string())
            );
            prop_assert_eq!(&m, &meta);
        }
    }

    /// Commits outside the document are reported as not found.
    #[test]
    fn unknown_commit_not_found(meta in populated_chain(), suffix in "[a-z]{1,8}") {
        let commit = format!("x{}", suffix);
        let mut m = meta.clone();
        let name = "prop-new-branch";
        prop_assume!(m.branch(name).is_none());

        let err = create_branch(&mut m, name, &commit, "").unwrap_err();
        prop_assert!(err.is_not_found());
        prop_assert_eq!(m.fingerprint().unwrap(), meta.fingerprint().unwrap());
    }

    /// A branch at position k of a chain counts k + 1 commits.
    #[test]
    fn count_matches_chain_length(len in 1usize..200, pick in any::<prop::sample::Index>()) {
        let mut meta = chain(len);
        let k = pick.index(len);

        let entry = create_branch(&mut meta, "b", &format!("c{}", k), "").unwrap();
        prop_assert_eq!(entry.commit_count, (k + 1) as u64);
    }

    /// Success inserts exactly one entry and leaves everything else alone.
    #[test]
    fn success_inserts_exactly_one(
        meta in populated_chain(),
        name in branch_name(),
        pick in any::<prop::sample::Index>(),
        description in ".{0,32}",
    ) {
        prop_assume!(meta.branch(&name).is_none());
        let k = pick.index(meta.commits.len());
        let commit = format!("c{}", k);

        let mut m = meta.clone();
        create_branch(&mut m, &name, &commit, &description).unwrap();

        prop_assert_eq!(&m.commits, &meta.commits);
        prop_assert_eq!(m.branches.len(), meta.branches.len() + 1);

        let inserted = m.branches.remove(name.as_str()).unwrap();
        prop_assert_eq!(
            inserted,
            BranchEntry {
                commit: CommitId::new(commit).unwrap(),
                commit_count: (k + 1) as u64,
                description,
            }
        );
        prop_assert_eq!(&m.branches, &meta.branches);
        prop_assert!(verify(&meta).findings.is_empty());
    }

    /// A parent cycle is reported instead of walking forever.
    #[test]
    fn cycle_is_corrupt_history(len in 1usize..50, pick in any::<prop::sample::Index>()) {
        let mut meta = chain(len);
        let root = CommitId::new("c0").unwrap();
        let last = CommitId::new(format!("c{}", len - 1)).unwrap();
        meta.commits.get_mut(&root).unwrap().parent = Some(last);
        let before = meta.clone();

        let k = pick.index(len);
        let err = create_branch(&mut meta, "b", &format!("c{}", k), "").unwrap_err();
        prop_assert!(matches!(
            err,
            BranchError::CorruptHistory(GraphError::CycleDetected(_))
        ));
        prop_assert_eq!(&meta, &before);
    }

    /// Recount restores the live length after the cache drifts.
    #[test]
    fn recount_restores_live_length(meta in populated_chain(), drift in 0u64..1000) {
        let names: Vec<BranchName> = meta.branches.keys().cloned().collect();
        for name in names {
            let mut m = meta.clone();
            let expected = m.branches[&name].commit_count;
            m.branches.get_mut(&name).unwrap().commit_count = drift;

            let (previous, fresh) = recount_branch(&mut m, name.as_str()).unwrap();
            prop_assert_eq!(previous, drift);
            prop_assert_eq!(fresh, expected);
            prop_assert_eq!(&m, &meta);
        }
    }
}

#[test]
fn release_scenario() {
    let mut meta = chain(3);

    create_branch(&mut meta, "main", "c2", "release").unwrap();
    assert_eq!(
        meta.branch("main"),
        Some(&BranchEntry {
            commit: CommitId::new("c2").unwrap(),
            commit_count: 3,
            description: "release".into(),
        })
    );

    assert_eq!(
        create_branch(&mut meta, "main", "c0", "").unwrap_err(),
        BranchError::AlreadyExists("main".into())
    );
}
