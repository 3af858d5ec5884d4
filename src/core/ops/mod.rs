//! core::ops
//!
//! Locking for mutating operations.
//!
//! # Modules
//!
//! - [`lock`] - Exclusive per-database lock
//!
//! # Architecture
//!
//! Every write of a metadata document:
//! 1. Acquires the exclusive database lock
//! 2. Checks the stored revision against the caller's revision
//! 3. Replaces the document atomically
//! 4. Releases the lock on drop

pub mod lock;

pub use lock::{DatabaseLock, LockError};
