//! core::paths
//!
//! Centralized path routing for the local metadata cache.
//!
//! # Storage Layout
//!
//! Everything lives under a single root (by default `.dbvc/` in the working
//! directory, see [`crate::core::config`]):
//! - `<root>/<database>/metadata.json` - The metadata document
//! - `<root>/<database>/metadata.json.tmp` - Staging file for atomic writes
//! - `<root>/<database>/lock` - Exclusive lock file
//!
//! **Hard rule:** no code outside this module joins path segments onto the
//! metadata root.
//!
//! # Example
//!
//! ```
//! use dbvc::core::paths::StorePaths;
//! use dbvc::core::types::DatabaseName;
//! use std::path::PathBuf;
//!
//! let paths = StorePaths::new(PathBuf::from("/work/.dbvc"));
//! let db = DatabaseName::new("sales.db").unwrap();
//!
//! assert_eq!(
//!     paths.metadata_path(&db),
//!     PathBuf::from("/work/.dbvc/sales.db/metadata.json")
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::core::types::DatabaseName;

/// Name of the default metadata root, relative to the working directory.
pub const DEFAULT_ROOT_DIR: &str = ".dbvc";

/// Centralized path routing for the metadata cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Root directory holding one subdirectory per database.
    pub root: PathBuf,
}

impl StorePaths {
    /// Create paths rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Paths rooted at `<cwd>/.dbvc`.
    pub fn in_dir(cwd: &Path) -> Self {
        Self::new(cwd.join(DEFAULT_ROOT_DIR))
    }

    /// Directory for one database.
    pub fn database_dir(&self, db: &DatabaseName) -> PathBuf {
        self.root.join(db.as_str())
    }

    /// Path to a database's metadata document.
    pub fn metadata_path(&self, db: &DatabaseName) -> PathBuf {
        self.database_dir(db).join("metadata.json")
    }

    /// Staging path used while writing the metadata document.
    pub fn metadata_temp_path(&self, db: &DatabaseName) -> PathBuf {
        self.database_dir(db).join("metadata.json.tmp")
    }

    /// Path to a database's lock file.
    pub fn lock_path(&self, db: &DatabaseName) -> PathBuf {
        self.database_dir(db).join("lock")
    }

    /// Get the root as a Path reference.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the directory for `db` exists.
    ///
    /// # Errors
    ///
    /// Returns an IO error if directory creation fails.
    pub fn ensure_database_dir(&self, db: &DatabaseName) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir(db))
    }
}
