//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. `$DBVC_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/dbvc/config.toml`
//! 3. `~/.dbvc/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use dbvc::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load().unwrap();
//! println!("Metadata root: {}", config.metadata_dir(Path::new(".")).display());
//! println!("Verify after write: {}", config.verify_after_write());
//! ```

pub mod schema;

pub use schema::GlobalConfig;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::paths::DEFAULT_ROOT_DIR;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents (all fields optional)
    pub global: GlobalConfig,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    /// A missing config file is not an error (defaults are used).
    pub fn load() -> Result<Config, ConfigError> {
        let path = resolve_config_path(
            std::env::var_os("DBVC_CONFIG").map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        );
        Self::load_from(path.as_deref())
    }

    /// Load configuration from an explicit file, or defaults for `None`.
    pub fn load_from(path: Option<&Path>) -> Result<Config, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };

        let global = Self::read_config(path)?;
        global.validate()?;

        Ok(Config {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    fn read_config(path: &Path) -> Result<GlobalConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Root of the metadata cache.
    ///
    /// Defaults to `<cwd>/.dbvc`. Relative configured paths are resolved
    /// against `cwd`.
    pub fn metadata_dir(&self, cwd: &Path) -> PathBuf {
        match &self.global.metadata_dir {
            Some(dir) => cwd.join(dir),
            None => cwd.join(DEFAULT_ROOT_DIR),
        }
    }

    /// Whether debug output is on by default.
    ///
    /// Defaults to `false`.
    pub fn debug(&self) -> bool {
        self.global.debug.unwrap_or(false)
    }

    /// Whether to verify the document after each mutation.
    ///
    /// Defaults to `true`.
    pub fn verify_after_write(&self) -> bool {
        self.global.verify_after_write.unwrap_or(true)
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Pick the first existing config file among the standard locations.
fn resolve_config_path(
    env_config: Option<PathBuf>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Option<PathBuf> {
    let candidates = [
        env_config,
        xdg_config_home.map(|dir| dir.join("dbvc/config.toml")),
        home.map(|dir| dir.join(".dbvc/config.toml")),
    ];
    candidates.into_iter().flatten().find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::load_from(None).unwrap();

        assert_eq!(
            config.metadata_dir(Path::new("/work")),
            PathBuf::from("/work/.dbvc")
        );
        assert!(!config.debug());
        assert!(config.verify_after_write());
        assert!(config.loaded_from().is_none());
    }

    #[test]
    fn load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            metadata_dir = "cache"
            debug = true
            "#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert!(config.debug());
        assert_eq!(
            config.metadata_dir(Path::new("/work")),
            PathBuf::from("/work/cache")
        );
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn absolute_metadata_dir_ignores_cwd() {
        let config = Config {
            global: GlobalConfig {
                metadata_dir: Some(PathBuf::from("/abs/root")),
                ..Default::default()
            },
            path: None,
        };
        assert_eq!(
            config.metadata_dir(Path::new("/work")),
            PathBuf::from("/abs/root")
        );
    }

    #[test]
    fn parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "debug = [").unwrap();

        let err = Config::load_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn resolve_prefers_env_then_xdg_then_home() {
        let temp = TempDir::new().unwrap();
        let env_file = temp.path().join("env.toml");
        let xdg = temp.path().join("xdg");
        let home = temp.path().join("home");
        fs::create_dir_all(xdg.join("dbvc")).unwrap();
        fs::create_dir_all(home.join(".dbvc")).unwrap();
        fs::write(xdg.join("dbvc/config.toml"), "").unwrap();
        fs::write(home.join(".dbvc/config.toml"), "").unwrap();

        // Missing env file falls through to XDG.
        assert_eq!(
            resolve_config_path(Some(env_file.clone()), Some(xdg.clone()), Some(home.clone())),
            Some(xdg.join("dbvc/config.toml"))
        );

        fs::write(&env_file, "").unwrap();
        assert_eq!(
            resolve_config_path(Some(env_file.clone()), Some(xdg.clone()), Some(home.clone())),
            Some(env_file)
        );

        assert_eq!(
            resolve_config_path(None, None, Some(home.clone())),
            Some(home.join(".dbvc/config.toml"))
        );
        assert_eq!(resolve_config_path(None, None, None), None);
    }
}
