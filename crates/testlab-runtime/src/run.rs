//! Per-run context and the registration API used by test sources
//!
//! A [`Run`] owns the catalog and hook slots of one test run. Test sources
//! receive a [`Registrar`] bound to their path and declare tests and hooks
//! through it:
//!
//! ```
//! use testlab_runtime::{Registrar, Run};
//!
//! fn register(r: &mut Registrar) -> anyhow::Result<()> {
//!     r.before_each(|_| async { Ok(()) });
//!     r.test("adds numbers", |t| async move {
//!         t.is(1 + 1, 2)?;
//!         Ok(())
//!     })?;
//!     r.test_sync("string length", |t| {
//!         t.is("abc".len(), 3)?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! }
//!
//! let mut run = Run::new();
//! register(&mut run.registrar("tests/math.test.rs")).unwrap();
//! assert_eq!(run.catalog().len(), 2);
//! ```

use crate::assert::Assert;
use crate::catalog::{TestBody, TestCatalog};
use crate::engine::ExecutionEngine;
use crate::error::{DuplicateTestError, HookFailure};
use crate::hooks::{hook, HookKind, HookRegistry};
use crate::outcome::RunSummary;
use crate::reporter::Reporter;
use futures_util::FutureExt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Catalog, hooks and base directory of one test run
#[derive(Debug)]
pub struct Run {
    catalog: TestCatalog,
    hooks: HookRegistry,
    base_dir: PathBuf,
}

impl Default for Run {
    fn default() -> Self {
        Self::new()
    }
}

impl Run {
    /// Create an empty run based at the current directory
    pub fn new() -> Self {
        let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_base_dir(base_dir)
    }

    /// Create an empty run whose display paths are relative to `base_dir`
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            catalog: TestCatalog::new(),
            hooks: HookRegistry::new(),
            base_dir: base_dir.into(),
        }
    }

    /// Registration handle for one test source
    pub fn registrar(&mut self, source_id: impl Into<String>) -> Registrar<'_> {
        Registrar {
            run: self,
            source_id: source_id.into(),
        }
    }

    pub fn catalog(&self) -> &TestCatalog {
        &self.catalog
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Execute every registered test with the given per-test timeout
    pub async fn execute<R>(
        &self,
        reporter: &mut R,
        timeout: Duration,
    ) -> Result<RunSummary, HookFailure>
    where
        R: Reporter + ?Sized,
    {
        ExecutionEngine::new(timeout)
            .with_base_dir(&self.base_dir)
            .run(&self.catalog, &self.hooks, reporter)
            .await
    }
}

/// Registers tests and hooks on behalf of one source file
pub struct Registrar<'a> {
    run: &'a mut Run,
    source_id: String,
}

impl Registrar<'_> {
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Register an async test
    pub fn test<F, Fut>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), DuplicateTestError>
    where
        F: Fn(Assert) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let boxed: TestBody = Arc::new(move |assert: Assert| body(assert).boxed());
        self.register(description.into(), boxed)
    }

    /// Register a synchronous test
    ///
    /// The body runs on the blocking pool. When it overruns the timeout the
    /// test fails, but the thread keeps running until the body returns.
    pub fn test_sync<F>(
        &mut self,
        description: impl Into<String>,
        body: F,
    ) -> Result<(), DuplicateTestError>
    where
        F: Fn(Assert) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let body = Arc::new(body);
        let boxed: TestBody = Arc::new(move |assert: Assert| {
            let body = Arc::clone(&body);
            async move {
                match tokio::task::spawn_blocking(move || body(assert)).await {
                    Ok(result) => result,
                    Err(join) if join.is_panic() => std::panic::resume_unwind(join.into_panic()),
                    Err(join) => Err(anyhow::anyhow!(join)),
                }
            }
            .boxed()
        });
        self.register(description.into(), boxed)
    }

    pub fn before_all<F, Fut>(&mut self, f: F)
    where
        F: Fn(Assert) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.set_hook(HookKind::BeforeAll, f);
    }

    pub fn before_each<F, Fut>(&mut self, f: F)
    where
        F: Fn(Assert) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.set_hook(HookKind::BeforeEach, f);
    }

    pub fn after_each<F, Fut>(&mut self, f: F)
    where
        F: Fn(Assert) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.set_hook(HookKind::AfterEach, f);
    }

    pub fn after_all<F, Fut>(&mut self, f: F)
    where
        F: Fn(Assert) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.set_hook(HookKind::AfterAll, f);
    }

    fn set_hook<F, Fut>(&mut self, kind: HookKind, f: F)
    where
        F: Fn(Assert) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        tracing::debug!(source = %self.source_id, hook = %kind, "registering hook");
        self.run.hooks.set(kind, hook(f));
    }

    fn register(&mut self, description: String, body: TestBody) -> Result<(), DuplicateTestError> {
        tracing::debug!(source = %self.source_id, test = %description, "registering test");
        self.run
            .catalog
            .register(description, body, self.source_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;

    #[derive(Default)]
    struct Collect(Vec<Outcome>);

    impl Reporter for Collect {
        fn handle_result(&mut self, outcome: &Outcome) {
            self.0.push(outcome.clone());
        }

        fn print_summary(&mut self, _summary: &RunSummary) {}
    }

    #[test]
    fn test_registrar_binds_source() {
        let mut run = Run::with_base_dir("/work");
        {
            let mut r = run.registrar("/work/a.test.rs");
            assert_eq!(r.source_id(), "/work/a.test.rs");
            r.test("one", |_| async { Ok(()) }).unwrap();
        }
        run.registrar("/work/b.test.rs")
            .test("two", |_| async { Ok(()) })
            .unwrap();

        assert_eq!(run.catalog().len(), 2);
        assert_eq!(run.catalog().source_count(), 2);
        assert_eq!(run.catalog().list()[1].source_id(), "/work/b.test.rs");
    }

    #[test]
    fn test_duplicate_across_sources_rejected() {
        let mut run = Run::with_base_dir("/work");
        run.registrar("a.test.rs")
            .test("same", |_| async { Ok(()) })
            .unwrap();

        let err = run
            .registrar("b.test.rs")
            .test("same", |_| async { Ok(()) })
            .unwrap_err();

        assert_eq!(err.description, "same");
        assert_eq!(run.catalog().len(), 1);
    }

    #[test]
    fn test_hooks_land_in_run() {
        let mut run = Run::with_base_dir(".");
        run.registrar("a.test.rs").after_all(|_| async { Ok(()) });

        assert!(run.hooks().is_set(HookKind::AfterAll));
        assert!(!run.hooks().is_set(HookKind::BeforeAll));
    }

    #[tokio::test]
    async fn test_sync_body_failure_and_panic() {
        let mut run = Run::with_base_dir(".");
        {
            let mut r = run.registrar("sync.test.rs");
            r.test_sync("ok", |t| {
                t.is_true(true)?;
                Ok(())
            })
            .unwrap();
            r.test_sync("fails", |t| {
                t.fail("nope")?;
                Ok(())
            })
            .unwrap();
            r.test_sync("panics", |_| panic!("sync kaboom")).unwrap();
        }

        let mut reporter = Collect::default();
        let summary = run
            .execute(&mut reporter, Duration::from_secs(2))
            .await
            .unwrap();

        assert_eq!(summary.total_passed, 1);
        assert_eq!(reporter.0[1].message, "nope");
        assert_eq!(reporter.0[2].message, "panicked: sync kaboom");
    }
}
