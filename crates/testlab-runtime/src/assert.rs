//! Assertion library handed to test bodies and hooks
//!
//! Every check returns `Result<_, AssertionFailure>` so a body can bail out
//! with `?`:
//!
//! ```
//! use testlab_runtime::Assert;
//!
//! fn body(t: Assert) -> anyhow::Result<()> {
//!     t.is(2 + 2, 4)?;
//!     t.greater_than(3, 1)?;
//!     t.with_message("name must be kebab-case").matches("test-lab", r"^[a-z-]+$")?;
//!     Ok(())
//! }
//! # body(Assert::new()).unwrap();
//! ```

use crate::cancel::CancellationToken;
use crate::error::AssertionFailure;
use crate::util::difference;
use futures_util::FutureExt;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

type Check = Result<(), AssertionFailure>;

/// Handle to the assertion library
///
/// Cheap to clone. Carries an optional message override and the cancellation
/// token of the test it was created for.
#[derive(Debug, Clone, Default)]
pub struct Assert {
    message: Option<Arc<str>>,
    token: CancellationToken,
}

/// What a thrown error must look like
#[derive(Debug, Clone, Default)]
pub enum ErrorExpectation {
    /// Any error is accepted
    #[default]
    Any,
    /// The error text must equal this string
    Message(String),
    /// The error text must match this regular expression
    Pattern(String),
}

impl ErrorExpectation {
    pub fn message(message: impl Into<String>) -> Self {
        ErrorExpectation::Message(message.into())
    }

    pub fn matching(pattern: impl Into<String>) -> Self {
        ErrorExpectation::Pattern(pattern.into())
    }
}

impl Assert {
    /// Create a handle that is never cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle observing the given cancellation token
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            message: None,
            token,
        }
    }

    /// Replace the default failure text of checks made through the returned handle
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self {
            message: Some(Arc::from(message.into())),
            token: self.token.clone(),
        }
    }

    /// Whether the engine gave up on this test
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolve once the engine gives up on this test
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Fail unconditionally
    pub fn fail(&self, message: impl Into<String>) -> Check {
        Err(AssertionFailure::new(message))
    }

    /// Strict equality
    pub fn is<A, E>(&self, actual: A, expected: E) -> Check
    where
        A: PartialEq<E> + Debug,
        E: Debug,
    {
        if actual == expected {
            return Ok(());
        }
        Err(self.failure(|| {
            let (actual, expected) = (format!("{:?}", actual), format!("{:?}", expected));
            format!(
                "Assertion failed: expected {} but received {}\n\n{}",
                expected,
                actual,
                difference(&actual, &expected)
            )
        }))
    }

    /// Strict inequality
    pub fn not<A, E>(&self, actual: A, expected: E) -> Check
    where
        A: PartialEq<E> + Debug,
        E: Debug,
    {
        if actual != expected {
            return Ok(());
        }
        Err(self.failure(|| {
            format!(
                "Assertion failed: expected {:?} not to be equal to {:?}",
                actual, expected
            )
        }))
    }

    pub fn is_true(&self, value: bool) -> Check {
        if value {
            return Ok(());
        }
        Err(self.failure(|| "Assertion failed: expected true but received false".to_string()))
    }

    pub fn is_false(&self, value: bool) -> Check {
        if !value {
            return Ok(());
        }
        Err(self.failure(|| "Assertion failed: expected false but received true".to_string()))
    }

    pub fn greater_than<A, E>(&self, actual: A, expected: E) -> Check
    where
        A: PartialOrd<E> + Debug,
        E: Debug,
    {
        if actual > expected {
            return Ok(());
        }
        Err(self.failure(|| {
            format!(
                "Assertion failed: expected {:?} to be greater than {:?}",
                actual, expected
            )
        }))
    }

    pub fn less_than<A, E>(&self, actual: A, expected: E) -> Check
    where
        A: PartialOrd<E> + Debug,
        E: Debug,
    {
        if actual < expected {
            return Ok(());
        }
        Err(self.failure(|| {
            format!(
                "Assertion failed: expected {:?} to be less than {:?}",
                actual, expected
            )
        }))
    }

    pub fn not_greater_than<A, E>(&self, actual: A, expected: E) -> Check
    where
        A: PartialOrd<E> + Debug,
        E: Debug,
    {
        if !(actual > expected) {
            return Ok(());
        }
        Err(self.failure(|| {
            format!(
                "Assertion failed: expected {:?} to not be greater than {:?}",
                actual, expected
            )
        }))
    }

    pub fn not_less_than<A, E>(&self, actual: A, expected: E) -> Check
    where
        A: PartialOrd<E> + Debug,
        E: Debug,
    {
        if !(actual < expected) {
            return Ok(());
        }
        Err(self.failure(|| {
            format!(
                "Assertion failed: expected {:?} to not be less than {:?}",
                actual, expected
            )
        }))
    }

    /// Structural equality of any two serializable values
    ///
    /// Both sides are compared through their JSON data model, so a struct and
    /// a map with the same fields are equal. The failure names the first
    /// differing path, e.g. `$.items[2].name`.
    pub fn deep_equal<A, E>(&self, actual: &A, expected: &E) -> Check
    where
        A: Serialize + ?Sized,
        E: Serialize + ?Sized,
    {
        let actual = serde_json::to_value(actual).map_err(|e| {
            AssertionFailure::new(format!("Assertion failed: cannot inspect actual value: {}", e))
        })?;
        let expected = serde_json::to_value(expected).map_err(|e| {
            AssertionFailure::new(format!(
                "Assertion failed: cannot inspect expected value: {}",
                e
            ))
        })?;

        let mut path = String::from("$");
        match first_difference(&actual, &expected, &mut path) {
            None => Ok(()),
            Some(detail) => Err(self.failure(|| {
                format!("Assertion failed: values differ at {}: {}", path, detail)
            })),
        }
    }

    /// The text must match the regular expression
    pub fn matches(&self, actual: &str, pattern: &str) -> Check {
        let regex = Regex::new(pattern).map_err(|e| {
            AssertionFailure::new(format!(
                "Expected a valid regular expression, but '{}' failed to compile: {}",
                pattern, e
            ))
        })?;

        if regex.is_match(actual) {
            return Ok(());
        }
        Err(self.failure(|| {
            format!(
                "Assertion failed: expected \"{}\" to match /{}/",
                actual, pattern
            )
        }))
    }

    /// The closure must return an error; yields the error text
    pub fn throws<T, E, F>(&self, f: F) -> Result<String, AssertionFailure>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        self.throws_with(f, &ErrorExpectation::Any)
    }

    /// The closure must return an error satisfying the expectation
    pub fn throws_with<T, E, F>(
        &self,
        f: F,
        expectation: &ErrorExpectation,
    ) -> Result<String, AssertionFailure>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        match f() {
            Ok(_) => Err(self.failure(|| {
                "Assertion failed: expected function to throw an error, but it did not".to_string()
            })),
            Err(e) => self.check_error(e.to_string(), expectation),
        }
    }

    /// The closure must succeed; yields its value
    pub fn not_throws<T, E, F>(&self, f: F) -> Result<T, AssertionFailure>
    where
        F: FnOnce() -> Result<T, E>,
        E: Display,
    {
        f().map_err(|e| {
            self.failure(|| {
                format!(
                    "Assertion failed: expected function not to throw an error, but it did: {}",
                    e
                )
            })
        })
    }

    /// Async counterpart of [`Assert::throws_with`]
    pub async fn throws_async<T, E, Fut>(
        &self,
        future: Fut,
        expectation: &ErrorExpectation,
    ) -> Result<String, AssertionFailure>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match future.await {
            Ok(_) => Err(self.failure(|| {
                "Assertion failed: expected asynchronous function to throw an error, but it did not"
                    .to_string()
            })),
            Err(e) => self.check_error(e.to_string(), expectation),
        }
    }

    /// Async counterpart of [`Assert::not_throws`]
    pub async fn not_throws_async<T, E, Fut>(&self, future: Fut) -> Result<T, AssertionFailure>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        future.await.map_err(|e| {
            self.failure(|| {
                format!(
                    "Assertion failed: expected asynchronous function not to throw an error, but it did: {}",
                    e
                )
            })
        })
    }

    /// The closure must panic; yields the panic message
    pub fn panics<F>(&self, f: F) -> Result<String, AssertionFailure>
    where
        F: FnOnce(),
    {
        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(()) => Err(self.failure(|| {
                "Assertion failed: expected function to panic, but it did not".to_string()
            })),
            Err(payload) => Ok(panic_message(payload.as_ref())),
        }
    }

    /// The future must panic; yields the panic message
    pub async fn panics_async<Fut>(&self, future: Fut) -> Result<String, AssertionFailure>
    where
        Fut: Future,
    {
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(_) => Err(self.failure(|| {
                "Assertion failed: expected asynchronous function to panic, but it did not"
                    .to_string()
            })),
            Err(payload) => Ok(panic_message(payload.as_ref())),
        }
    }

    fn check_error(
        &self,
        text: String,
        expectation: &ErrorExpectation,
    ) -> Result<String, AssertionFailure> {
        match expectation {
            ErrorExpectation::Any => Ok(text),
            ErrorExpectation::Message(expected) if *expected == text => Ok(text),
            ErrorExpectation::Message(expected) => Err(self.failure(|| {
                format!(
                    "Assertion failed: expected error message \"{}\" but received \"{}\"",
                    expected, text
                )
            })),
            ErrorExpectation::Pattern(pattern) => {
                let regex = Regex::new(pattern).map_err(|e| {
                    AssertionFailure::new(format!(
                        "Expected a valid regular expression, but '{}' failed to compile: {}",
                        pattern, e
                    ))
                })?;
                if regex.is_match(&text) {
                    Ok(text)
                } else {
                    Err(self.failure(|| {
                        format!(
                            "Assertion failed: expected error message to match pattern \"{}\" but received \"{}\"",
                            pattern, text
                        )
                    }))
                }
            }
        }
    }

    fn failure(&self, default: impl FnOnce() -> String) -> AssertionFailure {
        match &self.message {
            Some(message) => AssertionFailure::new(message.as_ref()),
            None => AssertionFailure::new(default()),
        }
    }
}

/// Text of a panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

/// Walk both values in lockstep; on mismatch `path` points at the difference
fn first_difference(actual: &Value, expected: &Value, path: &mut String) -> Option<String> {
    match (actual, expected) {
        (Value::Array(a), Value::Array(e)) => {
            if a.len() != e.len() {
                return Some(format!(
                    "arrays have different lengths. Expected {} but received {}",
                    e.len(),
                    a.len()
                ));
            }
            for (i, (a, e)) in a.iter().zip(e).enumerate() {
                let len = path.len();
                path.push_str(&format!("[{}]", i));
                if let Some(detail) = first_difference(a, e, path) {
                    return Some(detail);
                }
                path.truncate(len);
            }
            None
        }
        (Value::Object(a), Value::Object(e)) => {
            if let Some(key) = e.keys().find(|k| !a.contains_key(*k)) {
                return Some(format!("actual object does not have key '{}'", key));
            }
            if let Some(key) = a.keys().find(|k| !e.contains_key(*k)) {
                return Some(format!("expected object does not have key '{}'", key));
            }
            for (key, a) in a {
                let len = path.len();
                path.push('.');
                path.push_str(key);
                if let Some(detail) = first_difference(a, &e[key], path) {
                    return Some(detail);
                }
                path.truncate(len);
            }
            None
        }
        // 1 and 1.0 are the same number
        (Value::Number(a), Value::Number(e)) if a.is_f64() || e.is_f64() => {
            match (a.as_f64(), e.as_f64()) {
                (Some(x), Some(y)) if x == y => None,
                _ => Some(format!("expected {} but received {}", e, a)),
            }
        }
        (a, e) if std::mem::discriminant(a) != std::mem::discriminant(e) => Some(format!(
            "expected both values to be of the same type ({} vs {})",
            type_name(e),
            type_name(a)
        )),
        (a, e) if a == e => None,
        (a, e) => Some(format!("expected {} but received {}", e, a)),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
