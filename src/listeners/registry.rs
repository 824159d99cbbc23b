//! Listener registry with per-capability subscription lists.

use super::types::{BusinessError, EventListener};
use crate::types::Version;
use parking_lot::RwLock;
use std::sync::Arc;

type SharedListener<A> = Arc<dyn EventListener<A>>;

/// Copy-on-write list; a notification pass iterates a snapshot.
type ListenerList<A> = Arc<Vec<SharedListener<A>>>;

struct Lists<A> {
    /// Every listener, in registration order.
    all: ListenerList<A>,
    receivers: ListenerList<A>,
    change: ListenerList<A>,
    error: ListenerList<A>,
    loading: ListenerList<A>,
}

impl<A> Lists<A> {
    fn new() -> Self {
        Self {
            all: Arc::new(Vec::new()),
            receivers: Arc::new(Vec::new()),
            change: Arc::new(Vec::new()),
            error: Arc::new(Vec::new()),
            loading: Arc::new(Vec::new()),
        }
    }

    fn lists_mut(&mut self) -> [&mut ListenerList<A>; 5] {
        [
            &mut self.all,
            &mut self.receivers,
            &mut self.change,
            &mut self.error,
            &mut self.loading,
        ]
    }
}

/// Ordered, deduplicated set of listeners.
///
/// The lock only guards the lists themselves. Notification takes a snapshot
/// and releases it before calling out, so callbacks may add or remove
/// listeners.
pub struct ListenerRegistry<A> {
    lists: RwLock<Lists<A>>,
}

impl<A> ListenerRegistry<A> {
    pub fn new() -> Self {
        Self {
            lists: RwLock::new(Lists::new()),
        }
    }

    /// Add a listener. Returns false if its identifier is already present.
    pub fn add(&self, listener: SharedListener<A>) -> bool {
        let mut lists = self.lists.write();
        let id = listener.unique_identifier();
        if lists.all.iter().any(|l| l.unique_identifier() == id) {
            return false;
        }

        let caps = listener.capabilities();
        tracing::trace!(listener = id, ?caps, "listener added");

        if caps.actions {
            Arc::make_mut(&mut lists.receivers).push(Arc::clone(&listener));
        }
        if caps.change {
            Arc::make_mut(&mut lists.change).push(Arc::clone(&listener));
        }
        if caps.error {
            Arc::make_mut(&mut lists.error).push(Arc::clone(&listener));
        }
        if caps.loading {
            Arc::make_mut(&mut lists.loading).push(Arc::clone(&listener));
        }
        Arc::make_mut(&mut lists.all).push(listener);
        true
    }

    /// Remove the listener with `id`. Returns false if it was not present.
    pub fn remove(&self, id: &str) -> bool {
        let mut lists = self.lists.write();
        if !lists.all.iter().any(|l| l.unique_identifier() == id) {
            return false;
        }

        for list in lists.lists_mut() {
            if list.iter().any(|l| l.unique_identifier() == id) {
                Arc::make_mut(list).retain(|l| l.unique_identifier() != id);
            }
        }
        tracing::trace!(listener = id, "listener removed");
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.lists
            .read()
            .all
            .iter()
            .any(|l| l.unique_identifier() == id)
    }

    pub fn len(&self) -> usize {
        self.lists.read().all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // --- Notification ---

    pub fn notify_receive(&self, action: &A) {
        let receivers = Arc::clone(&self.lists.read().receivers);
        for listener in receivers.iter() {
            listener.receive(action);
        }
    }

    pub fn notify_change(&self, version: Version) {
        let change = Arc::clone(&self.lists.read().change);
        for listener in change.iter() {
            listener.on_change(version);
        }
    }

    pub fn notify_error(&self, error: &BusinessError) {
        let error_listeners = Arc::clone(&self.lists.read().error);
        for listener in error_listeners.iter() {
            listener.on_error(error);
        }
    }

    pub fn notify_loading(&self, namespace: &str, loading: bool) {
        let loading_listeners = Arc::clone(&self.lists.read().loading);
        for listener in loading_listeners.iter() {
            listener.on_loading(namespace, loading);
        }
    }
}

impl<A> Default for ListenerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}
