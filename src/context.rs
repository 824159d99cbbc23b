//! Request-scoped carrier for passing a store through code that doesn't
//! know about it.

use crate::store::Store;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-keyed bag of values attached to one request or task.
#[derive(Default)]
pub struct Carrier {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Carrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value keyed by its type, returning the previous one.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
            .map(|value| *value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carrier").field("len", &self.values.len()).finish()
    }
}

/// Private key type: nothing outside this module can name it, so no other
/// insertion can overwrite an attached store.
struct StoreSlot<A> {
    store: Arc<Store<A>>,
}

/// Attach `store` to `carrier`, replacing any store of the same action type.
pub fn attach<A: Send + Sync + 'static>(carrier: &mut Carrier, store: Arc<Store<A>>) {
    carrier.insert(StoreSlot { store });
}

/// Remove and return the store attached for action type `A`.
pub fn detach<A: Send + Sync + 'static>(carrier: &mut Carrier) -> Option<Arc<Store<A>>> {
    carrier.remove::<StoreSlot<A>>().map(|slot| slot.store)
}

/// Retrieve the store previously attached for action type `A`.
pub fn store<A: Send + Sync + 'static>(carrier: &Carrier) -> Option<Arc<Store<A>>> {
    carrier
        .get::<StoreSlot<A>>()
        .map(|slot| Arc::clone(&slot.store))
}
