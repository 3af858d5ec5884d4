//! core::metadata::schema
//!
//! Metadata document schema (v1).
//!
//! # Schema Design
//!
//! One document per database holds the full commit set and every branch:
//! - Self-describing with `kind` and `schema_version`
//! - Strictly parsed (unknown fields rejected), except commit payload,
//!   which is opaque and round-trips unchanged
//! - A `revision` stamp that the store bumps on every successful save
//!
//! # Structural vs Cached
//!
//! - **Structural**: commit ids, parent links, branch heads
//! - **Cached**: `commit_count` on a branch, a snapshot of the chain length
//!   taken when the branch was written and never refreshed implicitly
//!
//! # Example
//!
//! ```
//! use dbvc::core::metadata::schema::{parse_metadata, CommitEntry, Metadata, METADATA_KIND};
//! use dbvc::core::types::CommitId;
//!
//! let mut meta = Metadata::new();
//! let c1 = CommitId::new("c1").unwrap();
//! meta.insert_commit(CommitEntry::new(c1.clone(), None));
//! assert_eq!(meta.kind, METADATA_KIND);
//!
//! let json = meta.to_canonical_json().unwrap();
//! let parsed = parse_metadata(&json).unwrap();
//! assert!(parsed.commits.contains_key(&c1));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{BranchName, CommitId, ContentHash};

/// The kind identifier for a metadata document.
pub const METADATA_KIND: &str = "dbvc.metadata";

/// Current schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// Errors from metadata operations.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("failed to parse metadata: {0}")]
    ParseError(String),

    #[error("failed to serialize metadata: {0}")]
    SerializeError(String),

    #[error("invalid kind '{found}', expected '{}'", METADATA_KIND)]
    InvalidKind { found: String },

    #[error("unsupported schema version {0}, supported: {SCHEMA_VERSION}")]
    UnsupportedVersion(u32),

    #[error("commit stored under key '{key}' has id '{id}'")]
    CommitKeyMismatch { key: String, id: String },
}

/// Envelope for version dispatch before full parsing.
#[derive(Debug, Deserialize)]
struct MetadataEnvelope {
    kind: String,
    schema_version: u32,
}

/// Parse a metadata document with version dispatch.
///
/// # Errors
///
/// Returns an error if:
/// - The JSON is malformed or has unknown fields
/// - The `kind` field doesn't match `METADATA_KIND`
/// - The `schema_version` is not supported
/// - A commit is stored under a key other than its own id
///
/// # Example
///
/// ```
/// use dbvc::core::metadata::schema::parse_metadata;
///
/// let json = r#"{
///     "kind": "dbvc.metadata",
///     "schema_version": 1,
///     "revision": 4,
///     "commits": {
///         "c1": { "id": "c1", "parent": "" },
///         "c2": { "id": "c2", "parent": "c1" }
///     },
///     "branches": {
///         "main": { "commit": "c2", "commit_count": 2, "description": "" }
///     }
/// }"#;
///
/// let meta = parse_metadata(json).unwrap();
/// assert_eq!(meta.revision, 4);
/// assert_eq!(meta.commits.len(), 2);
/// ```
pub fn parse_metadata(json: &str) -> Result<Metadata, MetadataError> {
    let envelope: MetadataEnvelope =
        serde_json::from_str(json).map_err(|e| MetadataError::ParseError(e.to_string()))?;

    if envelope.kind != METADATA_KIND {
        return Err(MetadataError::InvalidKind {
            found: envelope.kind,
        });
    }

    match envelope.schema_version {
        1 => {
            let meta: Metadata =
                serde_json::from_str(json).map_err(|e| MetadataError::ParseError(e.to_string()))?;
            meta.validate()?;
            Ok(meta)
        }
        v => Err(MetadataError::UnsupportedVersion(v)),
    }
}

/// The metadata document for one database.
///
/// Loaded wholesale from a [`MetadataStore`](super::store::MetadataStore),
/// mutated in memory, and saved wholesale back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Metadata {
    /// Kind identifier (always "dbvc.metadata")
    pub kind: String,

    /// Schema version (always 1 for this struct)
    pub schema_version: u32,

    /// Store revision this document was read at.
    ///
    /// Zero for a document that has never been saved.
    #[serde(default)]
    pub revision: u64,

    /// All commits, keyed by id
    #[serde(default)]
    pub commits: BTreeMap<CommitId, CommitEntry>,

    /// All branches, keyed by name
    #[serde(default)]
    pub branches: BTreeMap<BranchName, BranchEntry>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Metadata {
    /// Create an empty, never-saved document.
    pub fn new() -> Self {
        Self {
            kind: METADATA_KIND.to_string(),
            schema_version: SCHEMA_VERSION,
            revision: 0,
            commits: BTreeMap::new(),
            branches: BTreeMap::new(),
        }
    }

    /// Insert a commit under its own id, replacing any previous entry.
    pub fn insert_commit(&mut self, commit: CommitEntry) {
        self.commits.insert(commit.id.clone(), commit);
    }

    /// Look up a commit by id.
    pub fn commit(&self, id: &str) -> Option<&CommitEntry> {
        self.commits.get(id)
    }

    /// Look up a branch by name.
    pub fn branch(&self, name: &str) -> Option<&BranchEntry> {
        self.branches.get(name)
    }

    /// Validate the document envelope and commit keys.
    ///
    /// Graph-level problems (dangling parents, cycles) are not checked
    /// here; see [`crate::core::verify`].
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.kind != METADATA_KIND {
            return Err(MetadataError::InvalidKind {
                found: self.kind.clone(),
            });
        }

        if self.schema_version != SCHEMA_VERSION {
            return Err(MetadataError::UnsupportedVersion(self.schema_version));
        }

        for (key, commit) in &self.commits {
            if key != &commit.id {
                return Err(MetadataError::CommitKeyMismatch {
                    key: key.to_string(),
                    id: commit.id.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Serialize to canonical JSON (compact, deterministic).
    ///
    /// Maps are ordered, so equal documents produce equal strings.
    pub fn to_canonical_json(&self) -> Result<String, MetadataError> {
        serde_json::to_string(self).map_err(|e| MetadataError::SerializeError(e.to_string()))
    }

    /// Serialize to indented JSON for on-disk storage.
    pub fn to_pretty_json(&self) -> Result<String, MetadataError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| MetadataError::SerializeError(e.to_string()))
    }

    /// Hash of the commit and branch content, ignoring `revision`.
    ///
    /// Two documents with the same fingerprint hold identical commits and
    /// branches.
    pub fn fingerprint(&self) -> Result<ContentHash, MetadataError> {
        let commits = serde_json::to_string(&self.commits)
            .map_err(|e| MetadataError::SerializeError(e.to_string()))?;
        let branches = serde_json::to_string(&self.branches)
            .map_err(|e| MetadataError::SerializeError(e.to_string()))?;
        Ok(ContentHash::compute(&[
            commits.as_bytes(),
            branches.as_bytes(),
        ]))
    }
}

/// A node in the commit chain.
///
/// Only `id` and `parent` carry meaning for branch bookkeeping. Every
/// other field (author, timestamp, message, tree, ...) is payload that is
/// never inspected and is written back exactly as it was read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommitEntry {
    /// Content hash identifying this commit
    pub id: CommitId,

    /// Preceding commit; `None` for a root (stored as `""`)
    #[serde(default, with = "parent_sentinel")]
    pub parent: Option<CommitId>,

    /// Opaque payload fields
    #[serde(flatten)]
    pub payload: BTreeMap<String, serde_json::Value>,
}

impl CommitEntry {
    /// Create a commit with an empty payload.
    pub fn new(id: CommitId, parent: Option<CommitId>) -> Self {
        Self {
            id,
            parent,
            payload: BTreeMap::new(),
        }
    }

    /// Whether this commit starts a chain.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// A named pointer at a commit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BranchEntry {
    /// Head commit of the branch
    pub commit: CommitId,

    /// Chain length from `commit` to the root, inclusive, as of the last write
    pub commit_count: u64,

    /// Free-text description (may be empty)
    #[serde(default)]
    pub description: String,
}

/// Wire mapping between `Option<CommitId>` and the `""` root sentinel.
mod parent_sentinel {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::core::types::CommitId;

    pub fn serialize<S: Serializer>(
        parent: &Option<CommitId>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(parent.as_ref().map(CommitId::as_str).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CommitId>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            Ok(None)
        } else {
            CommitId::new(raw).map(Some).map_err(serde::de::Error::custom)
        }
    }
}
