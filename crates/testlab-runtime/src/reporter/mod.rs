//! Reporters - translate outcomes into console output and persisted reports
//!
//! The engine talks to a [`Reporter`]; which one is used is decided once,
//! from configuration, through [`AnyReporter`].

mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::{JsonReport, JsonReporter, JsonTestEntry};

use crate::outcome::{Outcome, RunSummary};
use testlab_config::{ReporterKind, Settings};

/// Sink for streamed outcomes and the final summary
pub trait Reporter {
    /// Called once per finished test, in catalog order
    fn handle_result(&mut self, outcome: &Outcome);

    /// Called once after the last outcome
    fn print_summary(&mut self, summary: &RunSummary);
}

/// Lifecycle of a reporter within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReporterState {
    /// Nothing reported yet
    #[default]
    Idle,
    /// At least one outcome received
    Accumulating,
    /// Summary printed
    Finalized,
}

/// Reporter chosen from configuration
pub enum AnyReporter {
    Console(ConsoleReporter),
    Json(JsonReporter),
}

impl AnyReporter {
    pub fn from_kind(kind: ReporterKind) -> Self {
        match kind {
            ReporterKind::Console => AnyReporter::Console(ConsoleReporter::new()),
            ReporterKind::Json => AnyReporter::Json(JsonReporter::new()),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::from_kind(settings.reporter)
    }

    pub fn kind(&self) -> ReporterKind {
        match self {
            AnyReporter::Console(_) => ReporterKind::Console,
            AnyReporter::Json(_) => ReporterKind::Json,
        }
    }

    /// The JSON reporter, when that is the selected variant
    pub fn as_json(&self) -> Option<&JsonReporter> {
        match self {
            AnyReporter::Json(reporter) => Some(reporter),
            AnyReporter::Console(_) => None,
        }
    }

    pub fn as_json_mut(&mut self) -> Option<&mut JsonReporter> {
        match self {
            AnyReporter::Json(reporter) => Some(reporter),
            AnyReporter::Console(_) => None,
        }
    }

    pub fn state(&self) -> ReporterState {
        match self {
            AnyReporter::Console(reporter) => reporter.state(),
            AnyReporter::Json(reporter) => reporter.state(),
        }
    }
}

impl Reporter for AnyReporter {
    fn handle_result(&mut self, outcome: &Outcome) {
        match self {
            AnyReporter::Console(reporter) => reporter.handle_result(outcome),
            AnyReporter::Json(reporter) => reporter.handle_result(outcome),
        }
    }

    fn print_summary(&mut self, summary: &RunSummary) {
        match self {
            AnyReporter::Console(reporter) => reporter.print_summary(summary),
            AnyReporter::Json(reporter) => reporter.print_summary(summary),
        }
    }
}
