//! Suite table - map discovered test sources to their registration functions
//!
//! A harness binary compiles its test sources in and lists them here, keyed
//! by their path relative to the test directory:
//!
//! ```
//! use testlab_cli::SuiteSet;
//! use testlab_runtime::Registrar;
//!
//! fn register(r: &mut Registrar) -> anyhow::Result<()> {
//!     r.test("adds", |t| async move {
//!         t.is(1 + 1, 2)?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! }
//!
//! let suites = SuiteSet::new().source("math.test.rs", register);
//! assert!(suites.contains("math.test.rs"));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use testlab_runtime::{Registrar, Run};

/// Registration entry point of one test source
pub type RegisterFn = fn(&mut Registrar<'_>) -> anyhow::Result<()>;

/// Registration functions keyed by source path relative to the test directory
#[derive(Default, Clone)]
pub struct SuiteSet {
    sources: BTreeMap<String, RegisterFn>,
}

impl fmt::Debug for SuiteSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.sources.keys()).finish()
    }
}

/// What happened while loading discovered files
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Files whose registration function completed
    pub loaded: Vec<PathBuf>,
    /// Files whose registration failed, with the error text
    pub failed: Vec<(PathBuf, String)>,
    /// Discovered files with no registration function
    pub unregistered: Vec<PathBuf>,
}

impl SuiteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a test source; `name` uses forward slashes, e.g. `io/files.test.rs`
    pub fn source(mut self, name: impl Into<String>, register: RegisterFn) -> Self {
        self.sources.insert(name.into(), register);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Run the registration function of every discovered file, in order
    ///
    /// A failing source is logged and skipped; tests it registered before
    /// failing stay in the catalog.
    pub fn load(&self, test_dir: &Path, files: &[PathBuf], run: &mut Run) -> LoadReport {
        let mut report = LoadReport::default();

        for file in files {
            let key = source_key(test_dir, file);
            let Some(register) = self.sources.get(&key) else {
                tracing::warn!(file = %file.display(), "no registration function for discovered test file");
                report.unregistered.push(file.clone());
                continue;
            };

            tracing::debug!(file = %file.display(), "loading test file");
            let mut registrar = run.registrar(file.display().to_string());
            let result = catch_unwind(AssertUnwindSafe(|| register(&mut registrar)));

            match result {
                Ok(Ok(())) => report.loaded.push(file.clone()),
                Ok(Err(e)) => {
                    tracing::error!(file = %file.display(), error = %format!("{:#}", e), "failed to load test file");
                    report.failed.push((file.clone(), format!("{:#}", e)));
                }
                Err(_) => {
                    tracing::error!(file = %file.display(), "test file panicked while registering");
                    report
                        .failed
                        .push((file.clone(), "panicked while registering".to_string()));
                }
            }
        }

        report
    }
}

/// Path of `file` relative to `test_dir`, with forward slashes
fn source_key(test_dir: &Path, file: &Path) -> String {
    file.strip_prefix(test_dir)
        .unwrap_or(file)
        .to_string_lossy()
        .replace('\\', "/")
}
