//! Core types for the reducer store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Number of actions the store has processed. Doubles as a state version.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(pub u64);

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Version {
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

/// Outcome of running a reducer against one sub-state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reduction<S> {
    /// The action did not affect this sub-state.
    Unchanged,
    /// The sub-state is replaced by the contained value.
    Changed(S),
}

impl<S> Reduction<S> {
    pub fn is_changed(&self) -> bool {
        matches!(self, Reduction::Changed(_))
    }

    /// `Changed(value)` when `changed` is true, `Unchanged` otherwise.
    pub fn from_flag(value: S, changed: bool) -> Self {
        if changed {
            Reduction::Changed(value)
        } else {
            Reduction::Unchanged
        }
    }
}

/// Typed discriminant naming one sub-state of the root state.
///
/// Keys are usually declared as constants next to the sub-state type:
///
/// ```ignore
/// pub const COUNTER: StateKey<Counter> = StateKey::new("counter");
/// ```
pub struct StateKey<S> {
    name: &'static str,
    _marker: PhantomData<fn() -> S>,
}

impl<S> StateKey<S> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Manual impls: derives would require `S: Clone` etc.
impl<S> Clone for StateKey<S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for StateKey<S> {}

impl<S> fmt::Debug for StateKey<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({})", self.name)
    }
}

impl<S> fmt::Display for StateKey<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Caller-chosen identity of a listener.
///
/// Two listeners with equal ids are the same listener as far as the
/// registry is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(String);

impl ListenerId {
    pub fn new(id: impl Into<String>) -> Self {
        ListenerId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ListenerId {
    fn from(id: &str) -> Self {
        ListenerId(id.to_string())
    }
}

impl From<String> for ListenerId {
    fn from(id: String) -> Self {
        ListenerId(id)
    }
}

impl AsRef<str> for ListenerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
