//! core::ops::lock
//!
//! Exclusive per-database lock for metadata writes.
//!
//! # Architecture
//!
//! Saving a metadata document is a read-check-write sequence: the store
//! reads the on-disk revision, compares it with the revision the caller
//! loaded, then replaces the file. The lock makes that sequence atomic with
//! respect to other `dbvc` processes writing the same database.
//!
//! # Storage
//!
//! - `<root>/<database>/lock` - Lock file with OS-level exclusive lock
//!
//! # Invariants
//!
//! - Lock must be held across the revision check and the rename
//! - Lock is automatically released on drop (RAII pattern)
//! - Lock acquisition is non-blocking (fails fast if locked)
//!
//! # Example
//!
//! ```
//! use dbvc::core::ops::lock::DatabaseLock;
//! use dbvc::core::paths::StorePaths;
//! use dbvc::core::types::DatabaseName;
//!
//! let temp = tempfile::TempDir::new().unwrap();
//! let paths = StorePaths::new(temp.path().to_path_buf());
//! let db = DatabaseName::new("sales.db").unwrap();
//!
//! let lock = DatabaseLock::acquire(&paths, &db).unwrap();
//! assert!(DatabaseLock::acquire(&paths, &db).is_err());
//! drop(lock);
//! assert!(DatabaseLock::acquire(&paths, &db).is_ok());
//! ```

use std::fs::{File, OpenOptions};

use fs2::FileExt;
use thiserror::Error;

use crate::core::paths::StorePaths;
use crate::core::types::DatabaseName;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("database '{0}' is locked by another dbvc process")]
    AlreadyLocked(String),

    /// Failed to create lock file or directory.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on one database's metadata, held until dropped.
#[derive(Debug)]
pub struct DatabaseLock {
    file: File,
}

impl DatabaseLock {
    /// Attempt to acquire the lock for `db`.
    ///
    /// Uses OS-level file locking via `fs2`, which works across processes.
    /// Creates the database directory if needed.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(paths: &StorePaths, db: &DatabaseName) -> Result<Self, LockError> {
        paths.ensure_database_dir(db).map_err(|e| {
            LockError::CreateFailed(format!(
                "cannot create {}: {}",
                paths.database_dir(db).display(),
                e
            ))
        })?;

        let path = paths.lock_path(db);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(Self { file }),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                Err(LockError::AlreadyLocked(db.to_string()))
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }
}

impl Drop for DatabaseLock {
    fn drop(&mut self) {
        // Best-effort; the OS drops the lock with the handle anyway.
        let _ = self.file.unlock();
    }
}
