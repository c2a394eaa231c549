//! Ordered catalog of registered test cases

use crate::assert::Assert;
use crate::error::DuplicateTestError;
use crate::BodyFuture;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// A test body; invoked once per run with a fresh assertion handle
pub type TestBody = Arc<dyn Fn(Assert) -> BodyFuture + Send + Sync>;

/// One registered test
#[derive(Clone)]
pub struct TestCase {
    description: String,
    body: TestBody,
    source_id: String,
}

impl TestCase {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn body(&self) -> &TestBody {
        &self.body
    }
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("description", &self.description)
            .field("source_id", &self.source_id)
            .finish_non_exhaustive()
    }
}

/// Registered tests in insertion order, unique by description
#[derive(Debug, Default, Clone)]
pub struct TestCatalog {
    cases: Vec<TestCase>,
    descriptions: HashSet<String>,
    sources: Vec<String>,
}

impl TestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a test case
    ///
    /// A description that is already registered is rejected and the catalog
    /// is left untouched.
    pub fn register(
        &mut self,
        description: impl Into<String>,
        body: TestBody,
        source_id: impl Into<String>,
    ) -> Result<(), DuplicateTestError> {
        let description = description.into();
        let source_id = source_id.into();

        if self.descriptions.contains(&description) {
            return Err(DuplicateTestError { description });
        }

        if !self.sources.contains(&source_id) {
            self.sources.push(source_id.clone());
        }
        self.descriptions.insert(description.clone());
        self.cases.push(TestCase {
            description,
            body,
            source_id,
        });

        Ok(())
    }

    /// Registered cases in run order
    pub fn list(&self) -> &[TestCase] {
        &self.cases
    }

    /// Number of distinct source identifiers that contributed cases
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Distinct source identifiers in first-seen order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn contains(&self, description: &str) -> bool {
        self.descriptions.contains(description)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
