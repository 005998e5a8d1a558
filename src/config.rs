//! Application configuration management.
//!
//! Configuration is layered with figment, later layers winning:
//!
//! 1. built-in defaults
//! 2. a TOML file: `--config PATH`, else `config.toml` in the platform
//!    configuration directory when it exists
//! 3. `DUPESIFT_*` environment variables (e.g. `DUPESIFT_CHUNK_SIZE=4096`)
//!
//! Command-line flags are applied on top by the caller.
//!
//! ```toml
//! follow_symlinks = false
//! match_modified = true
//! chunk_size = 131072
//! purge_empty = false
//! report_name = "report.txt"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::scanner::DEFAULT_CHUNK_SIZE;
use crate::settings::DEFAULT_REPORT_NAME;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPESIFT_";

/// Errors that can occur while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested configuration file does not exist.
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    /// A layer holds a malformed or mistyped value.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Follow symbolic links while walking sources.
    pub follow_symlinks: bool,
    /// Include the last-modified second in the bucket key.
    pub match_modified: bool,
    /// Read window for content hashing, in bytes.
    pub chunk_size: usize,
    /// Remove emptied source subdirectories after moving.
    pub purge_empty: bool,
    /// File name of the report written into the destination.
    pub report_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            match_modified: false,
            chunk_size: DEFAULT_CHUNK_SIZE,
            purge_empty: false,
            report_name: DEFAULT_REPORT_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// With `path` set, that file must exist. Without it, the platform
    /// configuration file is used only if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any layer
    /// holds an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().filter(|p| p.is_file()),
        };

        if let Some(file) = &file {
            log::debug!("Loading configuration from {}", file.display());
        }
        Self::figment(file.as_deref())
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// The layered figment, without extracting it.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Platform-specific default configuration file.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "dupesift", "dupesift")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
