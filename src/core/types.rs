//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`BranchName`] - Non-empty branch name
//! - [`CommitId`] - Content-addressed commit identifier
//! - [`DatabaseName`] - Name of a hosted database, safe to use as a path segment
//! - [`ContentHash`] - SHA-256 digest used for document fingerprints
//!
//! # Validation
//!
//! These types enforce validity at construction time. Branch names and
//! commit ids are otherwise arbitrary strings chosen by the caller, so the
//! only rule they carry is that they cannot be empty.
//!
//! # Examples
//!
//! ```
//! use dbvc::core::types::{BranchName, CommitId, DatabaseName};
//!
//! let branch = BranchName::new("main").unwrap();
//! let commit = CommitId::new("c3").unwrap();
//! let db = DatabaseName::new("chinook.sqlite").unwrap();
//!
//! assert!(BranchName::new("").is_err());
//! assert!(CommitId::new("").is_err());
//! assert!(DatabaseName::new("../escape").is_err());
//! # let _ = (branch, commit, db);
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("branch name cannot be empty")]
    EmptyBranchName,

    #[error("commit id cannot be empty")]
    EmptyCommitId,

    #[error("invalid database name: {0}")]
    InvalidDatabaseName(String),
}

/// A branch name.
///
/// Any non-empty string is accepted. Uniqueness is a property of the
/// metadata document, not of the name itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyBranchName` if the name is empty.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(TypeError::EmptyBranchName);
        }
        Ok(Self(name))
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for BranchName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A commit identifier.
///
/// Commit ids are content hashes in practice, but the
/// metadata format treats them as opaque keys.
///
/// # Example
///
/// ```
/// use dbvc::core::types::CommitId;
///
/// let id = CommitId::new("7f3a9c01d2e4b5a6978812345678abcdef0123456789abcdef0123456789abcd").unwrap();
/// assert_eq!(id.short(7), "7f3a9c0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommitId(String);

impl CommitId {
    /// Create a new commit id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::EmptyCommitId` if the id is empty. The empty
    /// string is reserved as the "no parent" sentinel on the wire.
    pub fn new(id: impl Into<String>) -> Result<Self, TypeError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TypeError::EmptyCommitId);
        }
        Ok(Self(id))
    }

    /// Get an abbreviated form of the id.
    ///
    /// Returns the first `len` characters, or the whole id if it is shorter.
    pub fn short(&self, len: usize) -> &str {
        match self.0.char_indices().nth(len) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }

    /// Get the commit id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CommitId {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<CommitId> for String {
    fn from(id: CommitId) -> Self {
        id.0
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for CommitId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CommitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The name of a hosted database.
///
/// Database names become directory names in the local metadata cache, so
/// they must be a single, non-hidden path segment.
///
/// # Example
///
/// ```
/// use dbvc::core::types::DatabaseName;
///
/// assert!(DatabaseName::new("sales.db").is_ok());
/// assert!(DatabaseName::new("a/b").is_err());
/// assert!(DatabaseName::new(".hidden").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatabaseName(String);

impl DatabaseName {
    /// Create a new validated database name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDatabaseName` if the name is empty, starts
    /// with `.`, or contains a path separator or control character.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidDatabaseName(
                "database name cannot be empty".into(),
            ));
        }
        if name.starts_with('.') {
            return Err(TypeError::InvalidDatabaseName(
                "database name cannot start with '.'".into(),
            ));
        }
        if name.contains('/') || name.contains('\\') {
            return Err(TypeError::InvalidDatabaseName(
                "database name cannot contain path separators".into(),
            ));
        }
        if name.chars().any(|c| c.is_control()) {
            return Err(TypeError::InvalidDatabaseName(
                "database name cannot contain control characters".into(),
            ));
        }
        Ok(())
    }

    /// Get the database name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DatabaseName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<DatabaseName> for String {
    fn from(name: DatabaseName) -> Self {
        name.0
    }
}

impl AsRef<str> for DatabaseName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hex-encoded SHA-256 digest.
///
/// Used to fingerprint a whole metadata document.
///
/// # Example
///
/// ```
/// use dbvc::core::types::ContentHash;
///
/// let a = ContentHash::compute(&[b"tree", b"parent"]);
/// let b = ContentHash::compute(&[b"tree", b"parent"]);
/// assert_eq!(a, b);
/// assert_eq!(a.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(String);

impl ContentHash {
    /// Hash a sequence of byte fields.
    ///
    /// Fields are NUL-separated so that `["ab", "c"]` and `["a", "bc"]`
    /// produce different digests.
    pub fn compute(fields: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for field in fields {
            hasher.update(field);
            hasher.update(b"\0");
        }
        Self(hex::encode(hasher.finalize()))
    }

    /// Get the digest as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
