//! JSON reporter - console progress plus a persisted report document

use super::{ConsoleReporter, Reporter, ReporterState};
use crate::error::ReportWriteError;
use crate::outcome::{Outcome, RunSummary};
use crate::util::Timer;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Top-level shape of the written report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonReport {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    /// Milliseconds
    pub total_time: f64,
    pub tests: Vec<JsonTestEntry>,
}

/// One test in the written report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTestEntry {
    pub description: String,
    /// `"passed"` or `"failed"`
    pub status: String,
    pub message: String,
    /// Milliseconds
    pub execution_time: f64,
}

impl From<&Outcome> for JsonTestEntry {
    fn from(outcome: &Outcome) -> Self {
        Self {
            description: outcome.description.clone(),
            status: outcome.status().to_string(),
            message: outcome.message.clone(),
            execution_time: outcome.execution_time_ms,
        }
    }
}

/// Console output while running, plus [`JsonReporter::write_report`]
pub struct JsonReporter {
    console: ConsoleReporter,
    timer: Timer,
    total_time_ms: Option<f64>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_console(ConsoleReporter::new())
    }

    /// Create a reporter whose live output goes to the given sink
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self::with_console(ConsoleReporter::with_writer(writer))
    }

    fn with_console(console: ConsoleReporter) -> Self {
        Self {
            console,
            timer: Timer::start(),
            total_time_ms: None,
        }
    }

    pub fn state(&self) -> ReporterState {
        self.console.state()
    }

    pub fn outcomes(&self) -> &[Outcome] {
        self.console.outcomes()
    }

    /// Snapshot of the report document
    ///
    /// Before the summary is printed the total time is the time elapsed
    /// since the reporter was created.
    pub fn report(&self) -> JsonReport {
        let outcomes = self.console.outcomes();
        JsonReport {
            total_tests: outcomes.len(),
            passed_tests: self.console.passed(),
            failed_tests: self.console.failed(),
            total_time: self.total_time_ms.unwrap_or_else(|| self.timer.elapsed_ms()),
            tests: outcomes.iter().map(JsonTestEntry::from).collect(),
        }
    }

    /// Serialise the report to `path`, creating parent directories
    pub fn write_report(&mut self, path: impl AsRef<Path>) -> Result<PathBuf, ReportWriteError> {
        let path = path.as_ref().to_path_buf();
        self.console.note("Generating JSON report...");

        let to_error = |source: std::io::Error| ReportWriteError {
            path: path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(&self.report()).map_err(|e| to_error(e.into()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(to_error)?;
        }
        fs::write(&path, json).map_err(to_error)?;

        tracing::debug!(path = %path.display(), "wrote JSON report");
        self.console
            .note(format_args!("JSON report at '{}' has been generated.", path.display()));

        Ok(path)
    }
}

impl Reporter for JsonReporter {
    fn handle_result(&mut self, outcome: &Outcome) {
        self.console.handle_result(outcome);
    }

    fn print_summary(&mut self, summary: &RunSummary) {
        self.total_time_ms = Some(summary.total_execution_time_ms);
        self.console.print_summary(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn finished_reporter() -> JsonReporter {
        colored::control::set_override(false);
        let mut reporter = JsonReporter::with_writer(std::io::sink());
        reporter.handle_result(&Outcome::passed("A", 1.0));
        reporter.handle_result(&Outcome::failed("B", "boom", 2.0));
        reporter.print_summary(&RunSummary {
            total_passed: 1,
            total_failed: 1,
            total_tests: 2,
            total_execution_time_ms: 3.0,
        });
        reporter
    }

    #[test]
    fn test_report_document() {
        let report = finished_reporter().report();

        assert_eq!(
            report,
            JsonReport {
                total_tests: 2,
                passed_tests: 1,
                failed_tests: 1,
                total_time: 3.0,
                tests: vec![
                    JsonTestEntry {
                        description: "A".to_string(),
                        status: "passed".to_string(),
                        message: String::new(),
                        execution_time: 1.0,
                    },
                    JsonTestEntry {
                        description: "B".to_string(),
                        status: "failed".to_string(),
                        message: "boom".to_string(),
                        execution_time: 2.0,
                    },
                ],
            }
        );
    }

    #[test]
    fn test_write_report_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("reports/nested/out.json");

        let written = finished_reporter().write_report(&target).unwrap();
        assert_eq!(written, target);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(value["passedTests"], 1);
        assert_eq!(value["failedTests"], 1);
        assert_eq!(value["tests"].as_array().unwrap().len(), 2);
        assert_eq!(value["tests"][1]["executionTime"], 2.0);
    }

    #[test]
    fn test_write_report_into_file_path_fails() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = finished_reporter()
            .write_report(blocker.join("out.json"))
            .unwrap_err();
        assert_eq!(err.path, blocker.join("out.json"));
    }
}
