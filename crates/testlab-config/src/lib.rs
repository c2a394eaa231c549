//! TestLab Configuration System
//!
//! Provides the run settings consumed by the test runner:
//! - Settings file (testlab.toml)
//! - Environment variable overrides (TESTLAB_*)
//! - Explicit overrides supplied by the command line
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Settings file (./testlab.toml, searched upwards)
//! 3. Environment variables (TESTLAB_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use testlab_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("timeout: {}ms", config.settings.timeout);
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
pub use settings::{ReportSettings, ReporterKind, Settings, SettingsOverrides};
