//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order of precedence:
//! 1. `$DBVC_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dbvc/config.toml`
//! 3. `~/.dbvc/config.toml`
//!
//! # Validation
//!
//! Config values are validated after parsing, and unknown keys are
//! rejected so typos surface instead of being ignored.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User configuration.
///
/// # Example
///
/// ```toml
/// metadata_dir = "/home/me/.cache/dbvc"
/// debug = false
/// verify_after_write = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Root of the local metadata cache
    pub metadata_dir: Option<PathBuf>,

    /// Enable debug output by default
    pub debug: Option<bool>,

    /// Verify the document after each mutation
    pub verify_after_write: Option<bool>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.metadata_dir {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "metadata_dir cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
