//! Run Settings (testlab.toml)
//!
//! Handles the run-level settings stored in `testlab.toml`. Every key is
//! optional; missing keys fall back to the built-in defaults.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default per-test timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default file name of the JSON report
pub const DEFAULT_REPORT_FILE: &str = "testReport.json";

/// Run settings from testlab.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct Settings {
    /// Root directory for test discovery (default: "tests")
    #[serde(alias = "testDirectory")]
    pub test_directory: PathBuf,

    /// Per-test timeout in milliseconds (default: 5000)
    pub timeout: u64,

    /// Verbose tracing of discovery and registration
    pub debug: bool,

    /// Which reporter renders the results
    pub reporter: ReporterKind,

    /// JSON report persistence, consulted only with the JSON reporter
    pub report: ReportSettings,
}

/// Reporter selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReporterKind {
    /// Coloured line-per-test console output
    #[default]
    #[serde(alias = "CONSOLE", alias = "Console")]
    Console,
    /// Console output plus a persisted JSON report
    #[serde(alias = "JSON", alias = "Json")]
    Json,
}

/// JSON report persistence controls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct ReportSettings {
    /// Write the report file at the end of the run
    #[serde(alias = "enableReport")]
    pub enabled: bool,

    /// Directory the report is written to (default: ".")
    #[serde(alias = "reportPath")]
    pub path: PathBuf,

    /// Report file name (default: "testReport.json")
    #[serde(alias = "reportFile")]
    pub file: String,
}

/// Explicit overrides, applied last (typically from CLI flags)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub test_directory: Option<PathBuf>,
    pub timeout: Option<u64>,
    pub debug: Option<bool>,
    pub reporter: Option<ReporterKind>,
    pub report_enabled: Option<bool>,
    pub report_path: Option<PathBuf>,
    pub report_file: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            test_directory: PathBuf::from("tests"),
            timeout: DEFAULT_TIMEOUT_MS,
            debug: false,
            reporter: ReporterKind::Console,
            report: ReportSettings::default(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("."),
            file: DEFAULT_REPORT_FILE.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Parse settings from TOML text; `origin` is only used in error messages
    pub fn from_toml_str(content: &str, origin: &Path) -> ConfigResult<Self> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: origin.to_path_buf(),
            error: e,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings
    pub fn validate(&self) -> ConfigResult<()> {
        if self.timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        if self.test_directory.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "test_directory".to_string(),
                reason: "test directory cannot be empty".to_string(),
            });
        }

        if self.report.file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "report.file".to_string(),
                reason: "report file name cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Apply explicit overrides; only the fields that are set change
    pub fn apply_overrides(&mut self, overrides: SettingsOverrides) -> ConfigResult<()> {
        if let Some(dir) = overrides.test_directory {
            self.test_directory = dir;
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = timeout;
        }
        if let Some(debug) = overrides.debug {
            self.debug = debug;
        }
        if let Some(reporter) = overrides.reporter {
            self.reporter = reporter;
        }
        if let Some(enabled) = overrides.report_enabled {
            self.report.enabled = enabled;
        }
        if let Some(path) = overrides.report_path {
            self.report.path = path;
        }
        if let Some(file) = overrides.report_file {
            self.report.file = file;
        }

        self.validate()
    }

    /// Whether a JSON report file should be written at the end of the run
    pub fn writes_report(&self) -> bool {
        self.reporter == ReporterKind::Json && self.report.enabled
    }

    /// Full path of the JSON report file
    pub fn report_output_path(&self) -> PathBuf {
        self.report.path.join(&self.report.file)
    }
}

impl FromStr for ReporterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(ReporterKind::Console),
            "json" => Ok(ReporterKind::Json),
            other => Err(ConfigError::InvalidValue {
                field: "reporter".to_string(),
                reason: format!("unknown reporter '{}' (expected 'console' or 'json')", other),
            }),
        }
    }
}

impl fmt::Display for ReporterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterKind::Console => write!(f, "console"),
            ReporterKind::Json => write!(f, "json"),
        }
    }
}
