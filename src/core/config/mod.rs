//! core::config
//!
//! Configuration schema and loading.
//!
//! # Locations
//!
//! The pipeline config is resolved in this order (first hit wins):
//!
//! 1. An explicit `--config <path>` (must exist)
//! 2. `$GANTRY_CONFIG` if set (must exist)
//! 3. `<workspace>/gantry.toml` if present
//! 4. Built-in defaults
//!
//! A missing `gantry.toml` is not an error: the defaults describe the
//! conventional package layout, and the branch selection comes from
//! environment flags, not from this file.
//!
//! # Example
//!
//! ```no_run
//! use gantry::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("/path/to/package"), None).unwrap();
//! println!("interpreter: {}", config.pipeline.python);
//! ```

pub mod schema;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use schema::PipelineConfig;

/// Default config file name, relative to the workspace root.
pub const CONFIG_FILE: &str = "gantry.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "GANTRY_CONFIG";

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read a config file.
    #[error("failed to read {path}: {source}")]
    ReadFailed {
        /// The file being read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse a config file.
    #[error("failed to parse {path}: {source}")]
    ParseFailed {
        /// The file being parsed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A config value failed validation.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with its provenance.
#[derive(Debug, Clone)]
pub struct Config {
    /// The resolved pipeline configuration.
    pub pipeline: PipelineConfig,
    /// File the configuration came from, if any.
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load and validate the configuration for a workspace.
    ///
    /// `explicit` is the `--config` flag; when given, the file must exist.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file is missing (explicit paths
    /// only), unreadable, unparsable, or fails validation.
    pub fn load(workspace: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config = if let Some(path) = explicit {
            Self::from_file(path)?
        } else if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            Self::from_file(Path::new(&env_path))?
        } else {
            let default_path = workspace.join(CONFIG_FILE);
            if default_path.is_file() {
                Self::from_file(&default_path)?
            } else {
                Self {
                    pipeline: PipelineConfig::default(),
                    path: None,
                }
            }
        };

        config.pipeline.validate()?;
        Ok(config)
    }

    /// Load the configuration from a specific file.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline = toml::from_str(&text).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            pipeline,
            path: Some(path.to_path_buf()),
        })
    }
}
