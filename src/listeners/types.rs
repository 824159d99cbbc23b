//! Listener trait and notification types.

use crate::types::Version;
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Error reported through the side channel, never through dispatch.
pub type BusinessError = dyn Error + Send + Sync + 'static;

/// Notifications a listener wants to receive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// Receive every dispatched action before reducers run.
    pub actions: bool,
    /// Be told when a dispatch changed state.
    pub change: bool,
    /// Be told about reported business errors.
    pub error: bool,
    /// Be told about loading transitions.
    pub loading: bool,
}

impl Capabilities {
    pub fn actions() -> Self {
        Self {
            actions: true,
            ..Default::default()
        }
    }

    pub fn change() -> Self {
        Self {
            change: true,
            ..Default::default()
        }
    }

    pub fn error() -> Self {
        Self {
            error: true,
            ..Default::default()
        }
    }

    pub fn loading() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn all() -> Self {
        Self {
            actions: true,
            change: true,
            error: true,
            loading: true,
        }
    }

    /// Union of two capability sets.
    pub fn and(self, other: Self) -> Self {
        Self {
            actions: self.actions || other.actions,
            change: self.change || other.change,
            error: self.error || other.error,
            loading: self.loading || other.loading,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.actions || self.change || self.error || self.loading)
    }
}

/// An observer registered with a store.
///
/// Only the callbacks matching [`capabilities`](Self::capabilities) are
/// invoked. `receive`, `on_change` and `on_error` run while the store's
/// dispatch lock is held: calling `dispatch` or `handle_error` from inside
/// one deadlocks.
///
/// `on_loading` runs with no store lock held and may call back into the
/// store, unless the transition was itself started from one of the other
/// callbacks, in which case the dispatch lock is still held by that thread.
pub trait EventListener<A>: Send + Sync {
    /// Identity used to deduplicate adds and to remove the listener.
    fn unique_identifier(&self) -> &str;

    /// Probed once when the listener is added.
    fn capabilities(&self) -> Capabilities;

    fn receive(&self, _action: &A) {}

    /// `version` is the store version committed by the changing dispatch.
    fn on_change(&self, _version: Version) {}

    fn on_error(&self, _error: &BusinessError) {}

    fn on_loading(&self, _namespace: &str, _loading: bool) {}
}

/// Configuration for a channel subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events; further events are dropped until drained.
    /// Default: 1000
    pub buffer_size: usize,

    /// Notifications to forward.
    pub capabilities: Capabilities,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            capabilities: Capabilities::change()
                .and(Capabilities::error())
                .and(Capabilities::loading()),
        }
    }
}

/// Events delivered to a channel subscription.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent<A> {
    /// An action was dispatched.
    Action { action: A },

    /// A dispatch changed at least one sub-state.
    Changed { version: Version },

    /// A business error was reported.
    Error { message: String },

    /// A loading namespace flipped.
    Loading { namespace: String, loading: bool },
}
