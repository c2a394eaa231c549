//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::settings::{ReporterKind, Settings};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the settings file searched for by the loader
pub const CONFIG_FILE_NAME: &str = "testlab.toml";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Settings file (./testlab.toml) - overrides defaults
/// 3. Environment variables (TESTLAB_*) - overrides the file
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Prefix of the environment variables consulted for overrides
    env_prefix: String,
}

/// Merged configuration result
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Effective settings
    pub settings: Settings,

    /// Directory where testlab.toml was found
    pub config_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            env_prefix: "TESTLAB".to_string(),
        }
    }

    /// Use a different environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find testlab.toml; falls back to the
    /// defaults when none exists.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (config_root, settings) = self.find_settings(start_dir)?;
        let settings = self.apply_env_overrides(settings)?;

        Ok(Config {
            settings,
            config_root,
        })
    }

    /// Load configuration from a specific settings file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let settings = Settings::load_from_file(config_path)?;
        let settings = self.apply_env_overrides(settings)?;

        Ok(Config {
            settings,
            config_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    /// Find the settings file by walking up the directory tree
    fn find_settings(&self, start_dir: &Path) -> ConfigResult<(Option<PathBuf>, Settings)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let settings = Settings::load_from_file(&config_path)?;
                return Ok((Some(current), settings));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, Settings::default())),
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Environment variables follow the pattern: TESTLAB_<KEY>
    /// Example: TESTLAB_TIMEOUT=250
    fn apply_env_overrides(&self, mut settings: Settings) -> ConfigResult<Settings> {
        if let Some(dir) = self.env_var("TEST_DIRECTORY") {
            settings.test_directory = PathBuf::from(dir);
        }

        if let Some(timeout) = self.env_var("TIMEOUT") {
            settings.timeout = timeout
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    field: self.env_name("TIMEOUT"),
                    reason: format!("'{}' is not a number of milliseconds", timeout),
                })?;
        }

        if let Some(debug) = self.env_var("DEBUG") {
            settings.debug = parse_bool(&debug);
        }

        if let Some(reporter) = self.env_var("REPORTER") {
            settings.reporter = reporter.parse::<ReporterKind>()?;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn env_name(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key)
    }

    fn env_var(&self, key: &str) -> Option<String> {
        env::var(self.env_name(key)).ok()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Test directory, resolved against the directory holding testlab.toml
    pub fn test_directory(&self) -> PathBuf {
        match &self.config_root {
            Some(root) if self.settings.test_directory.is_relative() => {
                root.join(&self.settings.test_directory)
            }
            _ => self.settings.test_directory.clone(),
        }
    }

    /// Check if a settings file was found
    pub fn has_config_file(&self) -> bool {
        self.config_root.is_some()
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
