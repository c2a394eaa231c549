//! Error taxonomy of the test runtime
//!
//! Per-test failures ([`AssertionFailure`], [`TestTimeoutError`], any error a
//! body returns) are converted into failed outcomes by the engine. Only
//! [`HookFailure`] from the global hooks aborts a run.

use crate::hooks::HookKind;
use std::path::PathBuf;
use thiserror::Error;

/// A failed check raised by [`crate::Assert`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Raised when a test body does not settle within the per-test timeout
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Test timed out after {timeout_ms}ms")]
pub struct TestTimeoutError {
    pub timeout_ms: u128,
}

/// Raised when a description is registered twice in one run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("A test with the description '{description}' already exists")]
pub struct DuplicateTestError {
    pub description: String,
}

/// A lifecycle hook returned an error or panicked
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{hook} hook failed: {message}")]
pub struct HookFailure {
    pub hook: HookKind,
    pub message: String,
}

/// The JSON report could not be persisted
#[derive(Error, Debug)]
#[error("Failed to write report to {}: {source}", path.display())]
pub struct ReportWriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            TestTimeoutError { timeout_ms: 50 }.to_string(),
            "Test timed out after 50ms"
        );
        assert_eq!(
            DuplicateTestError {
                description: "adds".to_string()
            }
            .to_string(),
            "A test with the description 'adds' already exists"
        );
        assert_eq!(
            HookFailure {
                hook: HookKind::BeforeAll,
                message: "db down".to_string()
            }
            .to_string(),
            "beforeAll hook failed: db down"
        );
    }
}
