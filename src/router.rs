//! Routing from sub-states to their reducers.

use crate::error::{Result, StoreError};
use crate::state::{RootState, SharedValue};
use crate::types::{Reduction, StateKey};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

/// Reducer with its sub-state type erased.
///
/// Returns the replacement value when the sub-state changed.
type ErasedReducer<A> = Box<dyn Fn(&SharedValue, &A) -> Option<SharedValue> + Send + Sync>;

/// Maps each sub-state key to exactly one reducer.
pub struct TypeRouter<A> {
    reducers: HashMap<&'static str, ErasedReducer<A>>,
}

impl<A: 'static> TypeRouter<A> {
    pub fn new() -> Self {
        Self {
            reducers: HashMap::new(),
        }
    }

    /// Register `reducer` for the sub-state behind `key`.
    ///
    /// The key must name a sub-state of `root` holding an `S`, and must not
    /// already have a reducer.
    pub fn register<S, F>(&mut self, root: &RootState, key: StateKey<S>, reducer: F) -> Result<()>
    where
        S: Any + Send + Sync,
        F: Fn(&S, &A) -> Reduction<S> + Send + Sync + 'static,
    {
        let slot = root
            .slot(key.name())
            .ok_or_else(|| StoreError::UnknownState(key.name().to_string()))?;

        if slot.type_id != TypeId::of::<S>() {
            return Err(StoreError::StateTypeMismatch {
                key: key.name().to_string(),
                expected: slot.type_name,
                got: type_name::<S>(),
            });
        }

        if self.reducers.contains_key(key.name()) {
            return Err(StoreError::DuplicateReducer(key.name().to_string()));
        }

        let erased: ErasedReducer<A> = Box::new(move |value: &SharedValue, action: &A| {
            // The slot type was checked above and reducers only ever store an `S`.
            let current = (**value).downcast_ref::<S>()?;
            match reducer(current, action) {
                Reduction::Changed(next) => Some(Arc::new(next) as SharedValue),
                Reduction::Unchanged => None,
            }
        });
        self.reducers.insert(key.name(), erased);
        Ok(())
    }

    /// Run the reducer registered for `name`, if any.
    ///
    /// `None` means either no reducer is registered or the reducer left the
    /// sub-state unchanged.
    pub(crate) fn reduce(
        &self,
        name: &str,
        value: &SharedValue,
        action: &A,
    ) -> Option<SharedValue> {
        self.reducers
            .get(name)
            .and_then(|reducer| reducer(value, action))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.reducers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<A: 'static> Default for TypeRouter<A> {
    fn default() -> Self {
        Self::new()
    }
}
