//! Engine-owned root state.

use super::view::StateView;
use crate::error::{Result, StoreError};
use crate::types::{StateKey, Version};
use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

/// Type-erased sub-state value.
pub(crate) type SharedValue = Arc<dyn Any + Send + Sync>;

/// One named sub-state.
pub(crate) struct Slot {
    pub(crate) name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) value: SharedValue,
}

/// The composite application state.
///
/// Built once, then owned by the store. Sub-states are iterated in the
/// order they were added to the builder.
pub struct RootState {
    slots: Vec<Slot>,
    version: Version,
}

impl RootState {
    pub fn builder() -> RootStateBuilder {
        RootStateBuilder { slots: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub(crate) fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    pub(crate) fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Apply one dispatch: replace the changed sub-states and advance the version.
    pub(crate) fn commit(&mut self, replacements: Vec<(usize, SharedValue)>) -> Version {
        for (pos, value) in replacements {
            self.slots[pos].value = value;
        }
        self.version = self.version.next();
        self.version
    }

    pub(crate) fn view(&self) -> StateView {
        let slots = self
            .slots
            .iter()
            .map(|slot| (slot.name, Arc::clone(&slot.value)))
            .collect();
        StateView::new(slots, self.version)
    }
}

/// Builder collecting sub-states in iteration order.
pub struct RootStateBuilder {
    slots: Vec<Slot>,
}

impl RootStateBuilder {
    /// Add a sub-state. Fails if the key name is already taken.
    pub fn with<S: Any + Send + Sync>(mut self, key: StateKey<S>, value: S) -> Result<Self> {
        if self.slots.iter().any(|slot| slot.name == key.name()) {
            return Err(StoreError::DuplicateState(key.name().to_string()));
        }

        self.slots.push(Slot {
            name: key.name(),
            type_id: TypeId::of::<S>(),
            type_name: type_name::<S>(),
            value: Arc::new(value),
        });
        Ok(self)
    }

    pub fn build(self) -> RootState {
        RootState {
            slots: self.slots,
            version: Version::default(),
        }
    }
}
