//! core::metadata::store
//!
//! Whole-document load and save of per-database metadata.
//!
//! # Architecture
//!
//! A store maps a [`DatabaseName`] to exactly one [`Metadata`] document.
//! There is no partial access: callers load the full document, change it in
//! memory, and save the full document back.
//!
//! # Revision Semantics
//!
//! Every saved document carries a `revision` stamp. `save` only succeeds if
//! the stored revision still equals the revision the caller loaded (zero
//! meaning "must not exist yet"), and returns the new revision. A second
//! writer working from a stale copy gets
//! [`StoreError::ConcurrentModification`] instead of silently overwriting
//! the first writer's change.
//!
//! # Example
//!
//! ```
//! use dbvc::core::metadata::schema::Metadata;
//! use dbvc::core::metadata::store::{MemoryMetadataStore, MetadataStore, StoreError};
//! use dbvc::core::types::DatabaseName;
//!
//! let store = MemoryMetadataStore::new();
//! let db = DatabaseName::new("sales.db").unwrap();
//!
//! let mut meta = Metadata::new();
//! meta.revision = store.save(&db, &meta).unwrap();
//!
//! let stale = Metadata::new();
//! assert!(matches!(
//!     store.save(&db, &stale),
//!     Err(StoreError::ConcurrentModification { .. })
//! ));
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

use super::schema::{parse_metadata, Metadata, MetadataError};
use crate::core::ops::lock::{DatabaseLock, LockError};
use crate::core::paths::StorePaths;
use crate::core::types::DatabaseName;

/// Errors from metadata storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No metadata exists for the database.
    #[error("no metadata found for database '{0}'")]
    NotFound(String),

    /// The stored revision moved since the document was loaded.
    #[error(
        "metadata for '{database}' changed since it was loaded \
         (expected revision {expected}, found {actual})"
    )]
    ConcurrentModification {
        database: String,
        expected: u64,
        actual: u64,
    },

    /// Reading or writing the backing storage failed.
    #[error("i/o error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The stored document could not be parsed or serialized.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// The database lock could not be taken.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl StoreError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Load/save collaborator for metadata documents.
///
/// Implementations must give whole-document overwrite semantics and honor
/// the revision check described in the module docs.
pub trait MetadataStore {
    /// Load the document for `db`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] if no document exists
    /// - [`StoreError::Io`] / [`StoreError::Metadata`] if it cannot be read
    fn load(&self, db: &DatabaseName) -> Result<Metadata, StoreError>;

    /// Save `meta` for `db`, returning the new revision.
    ///
    /// `meta.revision` is the revision the document was loaded at. The
    /// caller's copy is not modified.
    ///
    /// # Errors
    ///
    /// - [`StoreError::ConcurrentModification`] if the stored revision differs
    /// - [`StoreError::Io`] on storage failure
    fn save(&self, db: &DatabaseName, meta: &Metadata) -> Result<u64, StoreError>;

    /// Whether a document exists for `db`.
    fn exists(&self, db: &DatabaseName) -> Result<bool, StoreError>;

    /// All databases with a stored document, sorted by name.
    fn list(&self) -> Result<Vec<DatabaseName>, StoreError>;
}

/// Store backed by one JSON file per database.
///
/// Writes go to a staging file that is synced and renamed over the
/// document, while holding the [`DatabaseLock`].
#[derive(Debug, Clone)]
pub struct FileMetadataStore {
    paths: StorePaths,
}

impl FileMetadataStore {
    /// Create a store over the given paths.
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// Get the store's paths.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Revision currently on disk, or zero if there is no document.
    fn stored_revision(&self, db: &DatabaseName) -> Result<u64, StoreError> {
        match self.load(db) {
            Ok(meta) => Ok(meta.revision),
            Err(StoreError::NotFound(_)) => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Stage `contents` next to the document and rename it into place.
    ///
    /// The staging file never outlives a failed write.
    fn write_atomic(&self, db: &DatabaseName, contents: &str) -> Result<(), StoreError> {
        let temp_path = self.paths.metadata_temp_path(db);
        let path = self.paths.metadata_path(db);

        let result = write_synced(&temp_path, contents)
            .and_then(|()| fs::rename(&temp_path, &path).map_err(|e| StoreError::io(&path, e)));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

fn write_synced(path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut file = fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
    file.write_all(contents.as_bytes())
        .map_err(|e| StoreError::io(path, e))?;
    file.sync_all().map_err(|e| StoreError::io(path, e))
}

impl MetadataStore for FileMetadataStore {
    fn load(&self, db: &DatabaseName) -> Result<Metadata, StoreError> {
        let path = self.paths.metadata_path(db);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(db.to_string()))
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        Ok(parse_metadata(&json)?)
    }

    fn save(&self, db: &DatabaseName, meta: &Metadata) -> Result<u64, StoreError> {
        let _lock = DatabaseLock::acquire(&self.paths, db)?;

        let actual = self.stored_revision(db)?;
        if actual != meta.revision {
            return Err(StoreError::ConcurrentModification {
                database: db.to_string(),
                expected: meta.revision,
                actual,
            });
        }

        let mut next = meta.clone();
        next.revision = actual + 1;
        self.write_atomic(db, &next.to_pretty_json()?)?;
        Ok(next.revision)
    }

    fn exists(&self, db: &DatabaseName) -> Result<bool, StoreError> {
        Ok(self.paths.metadata_path(db).is_file())
    }

    fn list(&self) -> Result<Vec<DatabaseName>, StoreError> {
        let root = self.paths.root();
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(root, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(root, e))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let Ok(db) = DatabaseName::new(name) else {
                continue;
            };
            if self.exists(&db)? {
                names.push(db);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-process store with the same revision semantics as the file store.
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    documents: Mutex<HashMap<DatabaseName, Metadata>>,
}

impl MemoryMetadataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> std::sync::MutexGuard<'_, HashMap<DatabaseName, Metadata>> {
        // A panic while holding the guard cannot leave a half-written document.
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn load(&self, db: &DatabaseName) -> Result<Metadata, StoreError> {
        self.documents()
            .get(db)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(db.to_string()))
    }

    fn save(&self, db: &DatabaseName, meta: &Metadata) -> Result<u64, StoreError> {
        let mut documents = self.documents();
        let actual = documents.get(db).map(|m| m.revision).unwrap_or(0);
        if actual != meta.revision {
            return Err(StoreError::ConcurrentModification {
                database: db.to_string(),
                expected: meta.revision,
                actual,
            });
        }

        let mut next = meta.clone();
        next.revision = actual + 1;
        let revision = next.revision;
        documents.insert(db.clone(), next);
        Ok(revision)
    }

    fn exists(&self, db: &DatabaseName) -> Result<bool, StoreError> {
        Ok(self.documents().contains_key(db))
    }

    fn list(&self) -> Result<Vec<DatabaseName>, StoreError> {
        let mut names: Vec<_> = self.documents().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
