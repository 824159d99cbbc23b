//! Main Store struct tying all components together.

use crate::error::{Result, StoreError};
use crate::listeners::{
    BusinessError, ChannelListener, EventListener, ListenerRegistry, Subscription,
    SubscriptionConfig,
};
use crate::loading::LoadingTracker;
use crate::logger::{StoreLogger, TracingLogger};
use crate::router::TypeRouter;
use crate::state::{RootState, SharedValue, StateView};
use crate::types::{ListenerId, Reduction, StateKey, Version};
use parking_lot::{Condvar, Mutex, RwLock};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Store configuration.
pub struct StoreConfig<A> {
    /// Sink told about every processed action and handled error.
    pub logger: Arc<dyn StoreLogger<A>>,

    /// Panic instead of deadlocking when a dispatch is issued from inside a
    /// reducer or listener callback.
    pub detect_reentrancy: bool,

    /// Name given to threads running asynchronous dispatches.
    pub async_thread_name: String,
}

impl<A: Debug> Default for StoreConfig<A> {
    fn default() -> Self {
        Self {
            logger: Arc::new(TracingLogger),
            detect_reentrancy: false,
            async_thread_name: "store-dispatch".to_string(),
        }
    }
}

/// Configuration function applied once at construction.
pub type StoreOption<A> = Box<dyn FnOnce(&mut StoreConfig<A>)>;

/// Use `logger` instead of the tracing logger.
pub fn with_logger<A: 'static>(logger: Arc<dyn StoreLogger<A>>) -> StoreOption<A> {
    Box::new(move |config| config.logger = logger)
}

/// Turn on reentrant dispatch detection.
pub fn with_reentrancy_detection<A: 'static>() -> StoreOption<A> {
    Box::new(|config| config.detect_reentrancy = true)
}

pub fn with_async_thread_name<A: 'static>(name: impl Into<String>) -> StoreOption<A> {
    let name = name.into();
    Box::new(move |config| config.async_thread_name = name)
}

/// The reducer store.
///
/// Lock order: `dispatch_lock` -> `state` -> listener registry. The loading
/// tracker has its own lock, held only while a flag is flipped and never
/// across a callback.
pub struct Store<A> {
    /// Main lock. Serializes the whole dispatch pipeline and guards the router.
    dispatch_lock: Mutex<TypeRouter<A>>,

    /// Sub-states, read by snapshots without taking the main lock.
    state: RwLock<RootState>,

    /// Shared with subscription handles so they can remove themselves.
    listeners: Arc<ListenerRegistry<A>>,

    loading: LoadingTracker,

    logger: Arc<dyn StoreLogger<A>>,

    /// Outstanding asynchronous dispatches.
    pending: Mutex<usize>,
    idle: Condvar,

    /// Thread currently holding the main lock, tracked for reentrancy detection.
    owner: Mutex<Option<ThreadId>>,
    detect_reentrancy: bool,

    async_thread_name: String,
}

impl<A: Debug + Send + Sync + 'static> Store<A> {
    /// Create a store with the default configuration.
    pub fn new(root: RootState) -> Self {
        Self::with_config(root, StoreConfig::default())
    }

    /// Create a store, applying each option in order to the default configuration.
    pub fn with_options(
        root: RootState,
        options: impl IntoIterator<Item = StoreOption<A>>,
    ) -> Self {
        let mut config = StoreConfig::default();
        for option in options {
            option(&mut config);
        }
        Self::with_config(root, config)
    }

    pub fn with_config(root: RootState, config: StoreConfig<A>) -> Self {
        Self {
            dispatch_lock: Mutex::new(TypeRouter::new()),
            state: RwLock::new(root),
            listeners: Arc::new(ListenerRegistry::new()),
            loading: LoadingTracker::new(),
            logger: config.logger,
            pending: Mutex::new(0),
            idle: Condvar::new(),
            owner: Mutex::new(None),
            detect_reentrancy: config.detect_reentrancy,
            async_thread_name: config.async_thread_name,
        }
    }

    // --- Reducers ---

    /// Register the reducer for one sub-state.
    ///
    /// Fails if `key` is not part of the root state, names a sub-state of
    /// another type, or already has a reducer.
    pub fn register_reducer<S, F>(&self, key: StateKey<S>, reducer: F) -> Result<()>
    where
        S: Any + Send + Sync,
        F: Fn(&S, &A) -> Reduction<S> + Send + Sync + 'static,
    {
        let mut router = self.dispatch_lock.lock();
        let state = self.state.read();
        router.register(&state, key, reducer)
    }

    /// Whether `key` has a reducer. Takes the main lock.
    pub fn has_reducer<S>(&self, key: StateKey<S>) -> bool {
        self.dispatch_lock.lock().contains(key.name())
    }

    // --- Dispatch ---

    /// Apply `action` and deliver every resulting notification before returning.
    ///
    /// Must not be called from a reducer or listener callback: those run
    /// under the main lock and the call would deadlock.
    pub fn dispatch(&self, action: A) {
        self.check_reentrancy();
        let router = self.dispatch_lock.lock();
        let _owner = self.enter();

        self.listeners.notify_receive(&action);

        let current: Vec<(usize, &'static str, SharedValue)> = self
            .state
            .read()
            .slots()
            .iter()
            .enumerate()
            .map(|(pos, slot)| (pos, slot.name, Arc::clone(&slot.value)))
            .collect();

        let mut replacements = Vec::new();
        for (pos, name, value) in current {
            if let Some(next) = router.reduce(name, &value, &action) {
                replacements.push((pos, next));
            }
        }

        let updated = !replacements.is_empty();
        // Readers see either the whole dispatch or none of it.
        let version = self.state.write().commit(replacements);

        if updated {
            self.listeners.notify_change(version);
        }
        self.logger.action_processed(&action, updated);
    }

    /// Dispatch `action` on a new thread and return immediately.
    ///
    /// No ordering is guaranteed between asynchronous dispatches, or between
    /// them and concurrent synchronous ones.
    pub fn dispatch_async(self: &Arc<Self>, action: A) {
        *self.pending.lock() += 1;

        let store = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(self.async_thread_name.clone())
            .spawn(move || {
                let _done = PendingGuard { store: &*store };
                store.dispatch(action);
            });

        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to spawn async dispatch");
            self.finish_pending();
        }
    }

    /// Block until no asynchronous dispatch is outstanding.
    pub fn wait_async_actions(&self) {
        let mut pending = self.pending.lock();
        while *pending > 0 {
            self.idle.wait(&mut pending);
        }
    }

    /// Number of asynchronous dispatches not yet finished.
    pub fn pending_async(&self) -> usize {
        *self.pending.lock()
    }

    fn finish_pending(&self) {
        let mut pending = self.pending.lock();
        *pending -= 1;
        if *pending == 0 {
            self.idle.notify_all();
        }
    }

    // --- Errors ---

    /// Report a business error to error listeners and the logger.
    ///
    /// `None` is a no-op. Never affects state.
    pub fn handle_error(&self, error: Option<&BusinessError>) {
        let Some(error) = error else {
            return;
        };

        self.check_reentrancy();
        let _router = self.dispatch_lock.lock();
        let _owner = self.enter();

        self.listeners.notify_error(error);
        self.logger.error_handled(error);
    }

    // --- Loading ---

    /// Mark `namespace` as loading. Loading listeners are told only if the
    /// flag was off, and are called after the tracker lock is released.
    ///
    /// Concurrent transitions of the same namespace may reach listeners in
    /// either order; `is_loading` always reflects the latest flip.
    pub fn start_loading(&self, namespace: &str) {
        self.set_loading(namespace, true);
    }

    pub fn stop_loading(&self, namespace: &str) {
        self.set_loading(namespace, false);
    }

    fn set_loading(&self, namespace: &str, loading: bool) {
        if self.loading.set(namespace, loading) {
            self.listeners.notify_loading(namespace, loading);
        }
    }

    pub fn is_loading(&self, namespace: &str) -> bool {
        self.loading.is_loading(namespace)
    }

    /// Namespaces currently loading.
    pub fn loading_namespaces(&self) -> Vec<String> {
        self.loading.active()
    }

    // --- Listeners ---

    /// Add a listener. Adding an identifier that is already present is a no-op.
    pub fn add_listener(&self, listener: Arc<dyn EventListener<A>>) -> bool {
        self.listeners.add(listener)
    }

    /// Remove a listener. Removing an absent identifier is a no-op.
    pub fn remove_listener(&self, id: &str) -> bool {
        self.listeners.remove(id)
    }

    pub fn has_listener(&self, id: &str) -> bool {
        self.listeners.contains(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Register a channel-backed listener under `id`.
    ///
    /// If `id` is already registered the returned subscription never
    /// receives anything.
    pub fn subscribe(
        &self,
        id: impl Into<ListenerId>,
        config: SubscriptionConfig,
    ) -> Subscription<A>
    where
        A: Clone,
    {
        let (listener, receiver) = ChannelListener::new(id, config);
        self.listeners.add(Arc::clone(&listener) as Arc<dyn EventListener<A>>);
        Subscription::new(listener, receiver, Arc::downgrade(&self.listeners))
    }

    // --- State ---

    /// Snapshot of every sub-state.
    pub fn state(&self) -> StateView {
        self.state.read().view()
    }

    /// Current value of one sub-state.
    pub fn get<S: Any + Send + Sync>(&self, key: StateKey<S>) -> Option<Arc<S>> {
        self.state().get(key)
    }

    /// Number of processed actions.
    pub fn version(&self) -> Version {
        self.state.read().version()
    }

    // --- Reentrancy ---

    fn check_reentrancy(&self) {
        if self.detect_reentrancy && *self.owner.lock() == Some(thread::current().id()) {
            panic!("{}", StoreError::ReentrantDispatch);
        }
    }

    fn enter(&self) -> OwnerGuard<'_, A> {
        if self.detect_reentrancy {
            *self.owner.lock() = Some(thread::current().id());
        }
        OwnerGuard { store: self }
    }
}

/// Clears the recorded lock owner when a dispatch finishes or unwinds.
struct OwnerGuard<'a, A> {
    store: &'a Store<A>,
}

impl<A> Drop for OwnerGuard<'_, A> {
    fn drop(&mut self) {
        if self.store.detect_reentrancy {
            *self.store.owner.lock() = None;
        }
    }
}

/// Marks one asynchronous dispatch finished, even if its reducer panicked.
struct PendingGuard<'a, A: Debug + Send + Sync + 'static> {
    store: &'a Store<A>,
}

impl<A: Debug + Send + Sync + 'static> Drop for PendingGuard<'_, A> {
    fn drop(&mut self) {
        self.store.finish_pending();
    }
}
