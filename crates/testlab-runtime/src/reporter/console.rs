//! Console reporter - coloured live progress and summary block

use super::{Reporter, ReporterState};
use crate::outcome::{Outcome, RunSummary};
use crate::util::{format_count, format_ms};
use colored::*;
use std::fmt;
use std::io::{self, Write};

/// Prints one line per outcome as it arrives, then a summary
pub struct ConsoleReporter {
    writer: Box<dyn Write + Send>,
    state: ReporterState,
    outcomes: Vec<Outcome>,
    passed: usize,
    failed: usize,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleReporter {
    /// Create a reporter writing to stdout
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }

    /// Create a reporter writing to any sink
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Box::new(writer),
            state: ReporterState::Idle,
            outcomes: Vec::new(),
            passed: 0,
            failed: 0,
        }
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    /// Every outcome received so far, in arrival order
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Print a free-form status line through the same sink
    pub fn note(&mut self, line: impl fmt::Display) {
        self.emit(format_args!("{}", line));
    }

    fn emit(&mut self, args: fmt::Arguments<'_>) {
        if let Err(e) = write_line(self.writer.as_mut(), args) {
            tracing::warn!(error = %e, "failed to write reporter output");
        }
    }
}

fn write_line(writer: &mut dyn Write, args: fmt::Arguments<'_>) -> io::Result<()> {
    writer.write_fmt(args)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

impl Reporter for ConsoleReporter {
    fn handle_result(&mut self, outcome: &Outcome) {
        match self.state {
            ReporterState::Finalized => {
                tracing::warn!(test = %outcome.description, "result received after the summary was printed");
            }
            ReporterState::Idle => self.state = ReporterState::Accumulating,
            ReporterState::Accumulating => {}
        }

        let timing = format!("({})", format_ms(outcome.execution_time_ms)).cyan();

        if outcome.passed {
            self.passed += 1;
            let line = format!("✔ {}", outcome.description).green();
            self.emit(format_args!("{} {}", line, timing));
        } else {
            self.failed += 1;
            let line = format!("✖ {}", outcome.description).red();
            self.emit(format_args!("{} {}", line, timing));
            for message_line in outcome.message.lines() {
                let message_line = format!("   {}", message_line).red();
                self.emit(format_args!("{}", message_line));
            }
        }

        self.outcomes.push(outcome.clone());
    }

    fn print_summary(&mut self, summary: &RunSummary) {
        self.emit(format_args!("\n{}", "Test Summary:".magenta()));

        let passed = format!("   ✔  {} Passed", format_count(summary.total_passed)).green();
        self.emit(format_args!("{}", passed));

        let failed = format!("   ✖  {} Failed", format_count(summary.total_failed)).red();
        self.emit(format_args!("{}", failed));

        let total = format!(
            "Total Execution Time:  {}",
            format_ms(summary.total_execution_time_ms)
        )
        .cyan();
        self.emit(format_args!("\n{}", total));

        self.state = ReporterState::Finalized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Cloneable in-memory sink
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_lines_and_summary() {
        colored::control::set_override(false);
        let buffer = Buffer::default();
        let mut reporter = ConsoleReporter::with_writer(buffer.clone());
        assert_eq!(reporter.state(), ReporterState::Idle);

        reporter.handle_result(&Outcome::passed("adds", 1.234));
        reporter.handle_result(&Outcome::failed("divides", "boom\nsecond line", 2.0));
        assert_eq!(reporter.state(), ReporterState::Accumulating);

        reporter.print_summary(&RunSummary {
            total_passed: 1,
            total_failed: 1,
            total_tests: 2,
            total_execution_time_ms: 3.5,
        });
        assert_eq!(reporter.state(), ReporterState::Finalized);

        let text = buffer.text();
        assert!(text.contains("✔ adds (1.23ms)"));
        assert!(text.contains("✖ divides (2.00ms)"));
        assert!(text.contains("   boom\n   second line"));
        assert!(text.contains("Test Summary:"));
        assert!(text.contains("   ✔  1 Passed"));
        assert!(text.contains("   ✖  1 Failed"));
        assert!(text.contains("Total Execution Time:  3.50ms"));
        assert_eq!(reporter.passed(), 1);
        assert_eq!(reporter.failed(), 1);
    }

    #[test]
    fn test_late_result_still_recorded() {
        colored::control::set_override(false);
        let mut reporter = ConsoleReporter::with_writer(io::sink());
        reporter.print_summary(&RunSummary::default());

        reporter.handle_result(&Outcome::passed("late", 0.1));

        assert_eq!(reporter.outcomes().len(), 1);
        assert_eq!(reporter.state(), ReporterState::Finalized);
    }
}
