//! Immutable list with an id -> position index.

use crate::diff::{shallow_diff, ModelDiff, ShallowDiff};
use crate::error::{Result, StoreError};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::slice;
use std::sync::Arc;

/// A record with a stable string identifier.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Ordered records with O(1) lookup by id.
///
/// Both the records and the index live behind `Arc`s and are never written
/// after a list value is built. Cloning a list is two reference-count bumps.
///
/// `update` does not move any record, so the updated list shares its index
/// with the list it came from. That is sound only because no code path hands
/// out `&mut` access to a published index; `append` and `delete` always
/// build a fresh map.
#[derive(Debug)]
pub struct ImmutableIndexedList<T> {
    items: Arc<Vec<T>>,
    index: Arc<HashMap<String, usize>>,
}

impl<T: Identifiable + Clone> ImmutableIndexedList<T> {
    /// Build a list from `items`, failing on duplicate ids.
    pub fn new(items: Vec<T>) -> Result<Self> {
        let mut index = HashMap::with_capacity(items.len());
        for (pos, item) in items.iter().enumerate() {
            if index.insert(item.id().to_string(), pos).is_some() {
                return Err(StoreError::DuplicateId(item.id().to_string()));
            }
        }

        Ok(Self {
            items: Arc::new(items),
            index: Arc::new(index),
        })
    }

    pub fn empty() -> Self {
        Self {
            items: Arc::new(Vec::new()),
            index: Arc::new(HashMap::new()),
        }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Look up a record by id. `None` if absent.
    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// Current position of `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Return a new list with `records` added at the end.
    ///
    /// Fails if any new id collides with an existing one or with another
    /// new record.
    pub fn append(&self, records: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut items = (*self.items).clone();
        let mut index = (*self.index).clone();

        for record in records {
            let id = record.id().to_string();
            if index.contains_key(&id) {
                return Err(StoreError::DuplicateId(id));
            }
            index.insert(id, items.len());
            items.push(record);
        }

        Ok(Self {
            items: Arc::new(items),
            index: Arc::new(index),
        })
    }

    /// Return a new list with the record at `id` replaced by `update(record)`.
    ///
    /// The updated record must keep its id.
    pub fn update<F>(&self, id: &str, update: F) -> Result<Self>
    where
        F: FnOnce(&T) -> T,
    {
        let pos = self.require(id)?;
        let updated = update(&self.items[pos]);
        if updated.id() != id {
            return Err(StoreError::IdChanged {
                expected: id.to_string(),
                got: updated.id().to_string(),
            });
        }

        let mut items = (*self.items).clone();
        items[pos] = updated;

        Ok(Self {
            items: Arc::new(items),
            // Positions are unchanged; share the published index.
            index: Arc::clone(&self.index),
        })
    }

    /// Like [`update`](Self::update), also reporting which fields changed.
    pub fn update_with_diff<F>(&self, id: &str, update: F) -> Result<(Self, ModelDiff)>
    where
        F: FnOnce(&T) -> T,
        T: ShallowDiff,
    {
        let updated = self.update(id, update)?;
        let pos = self.require(id)?;
        let fields = shallow_diff(&self.items[pos], &updated.items[pos])?;

        Ok((updated, ModelDiff { index: pos, fields }))
    }

    /// Return a new list without the record at `id`.
    pub fn delete(&self, id: &str) -> Result<Self> {
        let pos = self.require(id)?;

        let mut items = Vec::with_capacity(self.items.len() - 1);
        items.extend_from_slice(&self.items[..pos]);
        items.extend_from_slice(&self.items[pos + 1..]);

        let mut index = (*self.index).clone();
        index.remove(id);
        // Everything after the removed record moved up by one.
        for (offset, item) in items[pos..].iter().enumerate() {
            index.insert(item.id().to_string(), pos + offset);
        }

        Ok(Self {
            items: Arc::new(items),
            index: Arc::new(index),
        })
    }

    fn require(&self, id: &str) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| StoreError::IdNotFound(id.to_string()))
    }

    #[cfg(test)]
    fn shares_index_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.index, &other.index)
    }
}

impl<T> Clone for ImmutableIndexedList<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
            index: Arc::clone(&self.index),
        }
    }
}

impl<T: Identifiable + Clone> Default for ImmutableIndexedList<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: PartialEq> PartialEq for ImmutableIndexedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<'a, T> IntoIterator for &'a ImmutableIndexedList<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for ImmutableIndexedList<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}
