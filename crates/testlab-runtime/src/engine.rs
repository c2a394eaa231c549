//! Execution engine - run a catalog under the lifecycle-hook protocol
//!
//! Cases run one after another in registration order. Each body is spawned
//! as its own task and raced against the per-test timeout, so a body that
//! never settles fails with a timeout instead of stalling the run.

use crate::assert::{panic_message, Assert};
use crate::cancel::CancellationToken;
use crate::catalog::{TestCase, TestCatalog};
use crate::error::{HookFailure, TestTimeoutError};
use crate::hooks::HookRegistry;
use crate::outcome::{Outcome, RunSummary};
use crate::reporter::Reporter;
use crate::util::Timer;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Separator between source path and description in qualified names
pub const QUALIFIER_SEPARATOR: &str = " › ";

/// Sequential, timeout-bounded test executor
#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    timeout: Duration,
    base_dir: PathBuf,
}

impl ExecutionEngine {
    /// Create an engine with the given per-test timeout
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            base_dir: PathBuf::from("."),
        }
    }

    /// Directory source paths are shown relative to when qualifying names
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run every case of the catalog
    ///
    /// Outcomes stream to the reporter as each case finishes. A failing
    /// `beforeAll` aborts before any case runs; a failing `afterAll` aborts
    /// after every outcome was reported but before the summary.
    pub async fn run<R>(
        &self,
        catalog: &TestCatalog,
        hooks: &HookRegistry,
        reporter: &mut R,
    ) -> Result<RunSummary, HookFailure>
    where
        R: Reporter + ?Sized,
    {
        let timer = Timer::start();
        tracing::debug!(
            tests = catalog.len(),
            sources = catalog.source_count(),
            timeout_ms = self.timeout.as_millis() as u64,
            "starting run"
        );

        hooks.invoke_before_all(Assert::new()).await?;

        let qualify = catalog.source_count() > 1;
        let mut outcomes = Vec::with_capacity(catalog.len());

        for case in catalog.list() {
            // afterEach has already run, so its failure is part of the outcome
            let outcome = self.run_case(case, hooks, qualify).await;
            reporter.handle_result(&outcome);
            outcomes.push(outcome);
        }

        hooks.invoke_after_all(Assert::new()).await?;

        let summary = RunSummary::from_outcomes(&outcomes, timer.elapsed_ms());
        reporter.print_summary(&summary);

        Ok(summary)
    }

    async fn run_case(&self, case: &TestCase, hooks: &HookRegistry, qualify: bool) -> Outcome {
        let name = self.display_name(case, qualify);
        tracing::debug!(test = %name, "running test");

        let (result, elapsed_ms) = match hooks.invoke_before_each(Assert::new()).await {
            Err(failure) => (Err(failure.to_string()), 0.0),
            Ok(()) => {
                let timer = Timer::start();
                let result = self.run_body(case).await;
                (result, timer.elapsed_ms())
            }
        };

        let result = match hooks.invoke_after_each(Assert::new()).await {
            Ok(()) => result,
            Err(failure) => match result {
                Ok(()) => Err(failure.to_string()),
                Err(message) => {
                    tracing::error!(test = %name, error = %failure, "afterEach failed on an already failed test");
                    Err(message)
                }
            },
        };

        match result {
            Ok(()) => Outcome::passed(name, elapsed_ms),
            Err(message) => Outcome::failed(name, message, elapsed_ms),
        }
    }

    /// Race the body against the timeout; `Err` carries the failure text
    async fn run_body(&self, case: &TestCase) -> Result<(), String> {
        let token = CancellationToken::new();
        let assert = Assert::with_token(token.clone());
        let body = case.body().clone();

        let mut handle = tokio::spawn(async move { body(assert).await });

        match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => Err(format!("{:#}", e)),
            Ok(Err(join)) if join.is_panic() => Err(format!(
                "panicked: {}",
                panic_message(join.into_panic().as_ref())
            )),
            Ok(Err(join)) => Err(join.to_string()),
            Err(_) => {
                token.cancel();
                handle.abort();
                tracing::warn!(test = case.description(), "test exceeded its timeout");
                Err(TestTimeoutError {
                    timeout_ms: self.timeout.as_millis(),
                }
                .to_string())
            }
        }
    }

    /// Bare description, or `<relative source> › <description>`
    fn display_name(&self, case: &TestCase, qualify: bool) -> String {
        if !qualify {
            return case.description().to_string();
        }

        let source = Path::new(case.source_id());
        let relative =
            pathdiff::diff_paths(source, &self.base_dir).unwrap_or_else(|| source.to_path_buf());
        let shown = relative.with_extension("");

        format!(
            "{}{}{}",
            shown.to_string_lossy().replace('\\', "/"),
            QUALIFIER_SEPARATOR,
            case.description()
        )
    }
}
