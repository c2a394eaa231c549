//! Lifecycle hook registry
//!
//! Holds at most one hook per lifecycle event. Setting a slot again replaces
//! the previous hook; there is no chaining.

use crate::assert::{panic_message, Assert};
use crate::error::HookFailure;
use crate::BodyFuture;
use futures_util::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// A lifecycle hook; receives the assertion handle
pub type Hook = Arc<dyn Fn(Assert) -> BodyFuture + Send + Sync>;

/// Lifecycle events a hook can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    BeforeAll,
    BeforeEach,
    AfterEach,
    AfterAll,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::BeforeAll => "beforeAll",
            HookKind::BeforeEach => "beforeEach",
            HookKind::AfterEach => "afterEach",
            HookKind::AfterAll => "afterAll",
        };
        f.write_str(name)
    }
}

/// The four hook slots of a run
#[derive(Default, Clone)]
pub struct HookRegistry {
    before_all: Option<Hook>,
    before_each: Option<Hook>,
    after_each: Option<Hook>,
    after_all: Option<Hook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_before_all(&mut self, hook: Hook) {
        self.set(HookKind::BeforeAll, hook);
    }

    pub fn set_before_each(&mut self, hook: Hook) {
        self.set(HookKind::BeforeEach, hook);
    }

    pub fn set_after_each(&mut self, hook: Hook) {
        self.set(HookKind::AfterEach, hook);
    }

    pub fn set_after_all(&mut self, hook: Hook) {
        self.set(HookKind::AfterAll, hook);
    }

    /// Bind a hook to a slot, replacing whatever was there
    pub fn set(&mut self, kind: HookKind, hook: Hook) {
        if self.is_set(kind) {
            tracing::debug!(hook = %kind, "replacing previously registered hook");
        }
        *self.slot_mut(kind) = Some(hook);
    }

    /// Whether a hook is bound to the slot
    pub fn is_set(&self, kind: HookKind) -> bool {
        self.slot(kind).is_some()
    }

    pub fn get(&self, kind: HookKind) -> Option<&Hook> {
        self.slot(kind).as_ref()
    }

    pub async fn invoke_before_all(&self, assert: Assert) -> Result<(), HookFailure> {
        self.invoke(HookKind::BeforeAll, assert).await
    }

    pub async fn invoke_before_each(&self, assert: Assert) -> Result<(), HookFailure> {
        self.invoke(HookKind::BeforeEach, assert).await
    }

    pub async fn invoke_after_each(&self, assert: Assert) -> Result<(), HookFailure> {
        self.invoke(HookKind::AfterEach, assert).await
    }

    pub async fn invoke_after_all(&self, assert: Assert) -> Result<(), HookFailure> {
        self.invoke(HookKind::AfterAll, assert).await
    }

    /// Await the hook bound to `kind`; an empty slot succeeds immediately.
    /// Errors and panics both surface as [`HookFailure`].
    pub async fn invoke(&self, kind: HookKind, assert: Assert) -> Result<(), HookFailure> {
        let Some(hook) = self.slot(kind) else {
            return Ok(());
        };

        tracing::debug!(hook = %kind, "invoking hook");
        let result = AssertUnwindSafe(hook(assert)).catch_unwind().await;

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(HookFailure {
                hook: kind,
                message: format!("{:#}", e),
            }),
            Err(payload) => Err(HookFailure {
                hook: kind,
                message: format!("panicked: {}", panic_message(payload.as_ref())),
            }),
        }
    }

    fn slot(&self, kind: HookKind) -> &Option<Hook> {
        match kind {
            HookKind::BeforeAll => &self.before_all,
            HookKind::BeforeEach => &self.before_each,
            HookKind::AfterEach => &self.after_each,
            HookKind::AfterAll => &self.after_all,
        }
    }

    fn slot_mut(&mut self, kind: HookKind) -> &mut Option<Hook> {
        match kind {
            HookKind::BeforeAll => &mut self.before_all,
            HookKind::BeforeEach => &mut self.before_each,
            HookKind::AfterEach => &mut self.after_each,
            HookKind::AfterAll => &mut self.after_all,
        }
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("before_all", &self.before_all.is_some())
            .field("before_each", &self.before_each.is_some())
            .field("after_each", &self.after_each.is_some())
            .field("after_all", &self.after_all.is_some())
            .finish()
    }
}

/// Box an async closure into a [`Hook`]
pub fn hook<F, Fut>(f: F) -> Hook
where
    F: Fn(Assert) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    Arc::new(move |assert| f(assert).boxed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_unset_slot_is_noop() {
        let hooks = HookRegistry::new();
        assert!(!hooks.is_set(HookKind::BeforeEach));
        assert!(hooks.invoke_before_each(Assert::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_last_writer_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut hooks = HookRegistry::new();

        hooks.set_before_all(hook(|_| async { anyhow::bail!("first hook still bound") }));
        let counter = calls.clone();
        hooks.set_before_all(hook(move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }));

        hooks.invoke_before_all(Assert::new()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_becomes_hook_failure() {
        let mut hooks = HookRegistry::new();
        hooks.set_after_all(hook(|_| async { anyhow::bail!("cleanup failed") }));

        let err = hooks.invoke_after_all(Assert::new()).await.unwrap_err();
        assert_eq!(err.hook, HookKind::AfterAll);
        assert_eq!(err.message, "cleanup failed");
    }

    #[tokio::test]
    async fn test_hook_can_assert() {
        let mut hooks = HookRegistry::new();
        hooks.set_after_each(hook(|t| async move {
            t.is(1, 2)?;
            Ok(())
        }));

        let err = hooks.invoke_after_each(Assert::new()).await.unwrap_err();
        assert!(err.message.starts_with("Assertion failed"));
    }

    async fn exploding_fixture() -> anyhow::Result<()> {
        panic!("fixture exploded")
    }

    #[tokio::test]
    async fn test_panic_becomes_hook_failure() {
        let mut hooks = HookRegistry::new();
        hooks.set_before_each(hook(|_| exploding_fixture()));

        let err = hooks.invoke_before_each(Assert::new()).await.unwrap_err();
        assert_eq!(err.message, "panicked: fixture exploded");
    }
}
