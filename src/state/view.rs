//! Read-only snapshot of the root state.

use super::root::SharedValue;
use crate::types::{StateKey, Version};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Immutable snapshot of every sub-state at one version.
#[derive(Clone)]
pub struct StateView {
    slots: Arc<[(&'static str, SharedValue)]>,
    version: Version,
}

impl StateView {
    pub(crate) fn new(slots: Vec<(&'static str, SharedValue)>, version: Version) -> Self {
        Self {
            slots: slots.into(),
            version,
        }
    }

    /// Get a sub-state. `None` if the key is unknown or names another type.
    pub fn get<S: Any + Send + Sync>(&self, key: StateKey<S>) -> Option<Arc<S>> {
        self.slots
            .iter()
            .find(|(name, _)| *name == key.name())
            .and_then(|(_, value)| Arc::clone(value).downcast::<S>().ok())
    }

    /// Version the snapshot was taken at.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Sub-state names in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.slots.iter().map(|(name, _)| *name)
    }
}

impl fmt::Debug for StateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateView")
            .field("keys", &self.keys().collect::<Vec<_>>())
            .field("version", &self.version)
            .finish()
    }
}
