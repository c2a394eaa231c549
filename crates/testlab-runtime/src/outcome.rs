//! Per-test outcomes and the run summary derived from them

use serde::Serialize;

/// Recorded result of executing one test case
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Display name, qualified with the source path when several sources ran
    pub description: String,
    pub passed: bool,
    /// Failure text; empty for a passing test
    pub message: String,
    pub execution_time_ms: f64,
}

impl Outcome {
    pub fn passed(description: impl Into<String>, execution_time_ms: f64) -> Self {
        Self {
            description: description.into(),
            passed: true,
            message: String::new(),
            execution_time_ms,
        }
    }

    pub fn failed(
        description: impl Into<String>,
        message: impl Into<String>,
        execution_time_ms: f64,
    ) -> Self {
        Self {
            description: description.into(),
            passed: false,
            message: message.into(),
            execution_time_ms,
        }
    }

    /// `"passed"` or `"failed"`
    pub fn status(&self) -> &'static str {
        if self.passed {
            "passed"
        } else {
            "failed"
        }
    }
}

/// Aggregate counts of one run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_passed: usize,
    pub total_failed: usize,
    pub total_tests: usize,
    pub total_execution_time_ms: f64,
}

impl RunSummary {
    /// Count passes and failures of an outcome log
    pub fn from_outcomes(outcomes: &[Outcome], total_execution_time_ms: f64) -> Self {
        let total_passed = outcomes.iter().filter(|o| o.passed).count();
        Self {
            total_passed,
            total_failed: outcomes.len() - total_passed,
            total_tests: outcomes.len(),
            total_execution_time_ms,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.total_failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let outcomes = vec![
            Outcome::passed("A", 1.0),
            Outcome::failed("B", "boom", 2.0),
            Outcome::passed("C", 0.5),
        ];

        let summary = RunSummary::from_outcomes(&outcomes, 4.0);

        assert_eq!(summary.total_passed, 2);
        assert_eq!(summary.total_failed, 1);
        assert_eq!(summary.total_tests, 3);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::from_outcomes(&[], 0.0);
        assert_eq!(summary, RunSummary::default());
        assert!(summary.all_passed());
    }

    #[test]
    fn test_status() {
        assert_eq!(Outcome::passed("a", 0.0).status(), "passed");
        assert_eq!(Outcome::failed("a", "x", 0.0).status(), "failed");
    }
}
