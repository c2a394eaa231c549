//! TestLab runtime
//!
//! Registration of test cases, lifecycle hooks, timeout-bounded sequential
//! execution, outcome aggregation and reporting.
//!
//! A run is driven through [`Run`]: test sources register against a
//! [`Registrar`], then [`Run::execute`] feeds every outcome to a
//! [`Reporter`] and returns the [`RunSummary`].

pub mod assert;
pub mod cancel;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod outcome;
pub mod reporter;
pub mod run;
pub mod util;

/// Future returned by test bodies and hooks
pub type BodyFuture = futures_util::future::BoxFuture<'static, anyhow::Result<()>>;

pub use assert::{Assert, ErrorExpectation};
pub use cancel::CancellationToken;
pub use catalog::{TestBody, TestCase, TestCatalog};
pub use engine::ExecutionEngine;
pub use error::{AssertionFailure, DuplicateTestError, HookFailure, ReportWriteError, TestTimeoutError};
pub use hooks::{hook, Hook, HookKind, HookRegistry};
pub use outcome::{Outcome, RunSummary};
pub use reporter::{AnyReporter, ConsoleReporter, JsonReport, JsonReporter, Reporter, ReporterState};
pub use run::{Registrar, Run};

// Test sources return anyhow::Result without a direct dependency
pub use anyhow;

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
