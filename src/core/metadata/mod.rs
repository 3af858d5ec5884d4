//! core::metadata
//!
//! Metadata document schema and storage.
//!
//! # Modules
//!
//! - [`schema`] - Document types (v1): commits, branches, revision stamp
//! - [`store`] - Load/save collaborators (file-backed and in-memory)
//!
//! # Architecture
//!
//! Each database has a single JSON document holding its commit set and
//! branch pointers. The document is always read and written as a whole.
//!
//! # Example
//!
//! ```
//! use dbvc::core::metadata::{Metadata, MemoryMetadataStore, MetadataStore};
//! use dbvc::core::types::DatabaseName;
//!
//! let store = MemoryMetadataStore::new();
//! let db = DatabaseName::new("sales.db").unwrap();
//! store.save(&db, &Metadata::new()).unwrap();
//!
//! let loaded = store.load(&db).unwrap();
//! assert_eq!(loaded.revision, 1);
//! ```

pub mod schema;
pub mod store;

pub use schema::{
    parse_metadata, BranchEntry, CommitEntry, Metadata, MetadataError, METADATA_KIND,
    SCHEMA_VERSION,
};
pub use store::{FileMetadataStore, MemoryMetadataStore, MetadataStore, StoreError};
