//! Logger sink invoked by the store.

use crate::listeners::BusinessError;
use std::fmt::Debug;

/// Receives one call per processed action and per handled error.
pub trait StoreLogger<A>: Send + Sync {
    fn action_processed(&self, action: &A, updated: bool);

    fn error_handled(&self, error: &BusinessError);
}

/// Default sink, reporting through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl<A: Debug> StoreLogger<A> for TracingLogger {
    fn action_processed(&self, action: &A, updated: bool) {
        tracing::debug!(?action, updated, "action processed");
    }

    fn error_handled(&self, error: &BusinessError) {
        tracing::warn!(%error, "error handled");
    }
}

/// Sink that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl<A> StoreLogger<A> for NoopLogger {
    fn action_processed(&self, _action: &A, _updated: bool) {}

    fn error_handled(&self, _error: &BusinessError) {}
}
