//! Channel-backed listener for consumers on other threads.

use super::registry::ListenerRegistry;
use super::types::{BusinessError, Capabilities, EventListener, StoreEvent, SubscriptionConfig};
use crate::types::{ListenerId, Version};
use crossbeam_channel::{
    bounded, Receiver, RecvError, RecvTimeoutError, Sender, TryRecvError, TrySendError,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Listener that forwards notifications into a bounded channel.
///
/// Sending never blocks: when the buffer is full the event is dropped and
/// counted, so a slow consumer cannot stall dispatch.
pub struct ChannelListener<A> {
    id: ListenerId,
    capabilities: Capabilities,
    sender: Sender<StoreEvent<A>>,
    dropped: AtomicU64,
}

impl<A> ChannelListener<A> {
    /// Create the listener and the receiving end of its channel.
    pub fn new(
        id: impl Into<ListenerId>,
        config: SubscriptionConfig,
    ) -> (Arc<Self>, Receiver<StoreEvent<A>>) {
        let (sender, receiver) = bounded(config.buffer_size);
        let listener = Arc::new(Self {
            id: id.into(),
            capabilities: config.capabilities,
            sender,
            dropped: AtomicU64::new(0),
        });
        (listener, receiver)
    }

    /// Events lost to a full buffer or a closed receiver.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn send(&self, event: StoreEvent<A>) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

impl<A: Clone + Send + Sync> EventListener<A> for ChannelListener<A> {
    fn unique_identifier(&self) -> &str {
        self.id.as_str()
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn receive(&self, action: &A) {
        self.send(StoreEvent::Action {
            action: action.clone(),
        });
    }

    fn on_change(&self, version: Version) {
        self.send(StoreEvent::Changed { version });
    }

    fn on_error(&self, error: &BusinessError) {
        self.send(StoreEvent::Error {
            message: error.to_string(),
        });
    }

    fn on_loading(&self, namespace: &str, loading: bool) {
        self.send(StoreEvent::Loading {
            namespace: namespace.to_string(),
            loading,
        });
    }
}

/// Handle to a channel subscription created by `Store::subscribe`.
///
/// Dropping the handle does not unsubscribe; events sent after that are
/// counted as dropped until [`unsubscribe`](Self::unsubscribe) is called.
pub struct Subscription<A> {
    listener: Arc<ChannelListener<A>>,
    receiver: Receiver<StoreEvent<A>>,
    registry: Weak<ListenerRegistry<A>>,
}

impl<A> Subscription<A> {
    pub(crate) fn new(
        listener: Arc<ChannelListener<A>>,
        receiver: Receiver<StoreEvent<A>>,
        registry: Weak<ListenerRegistry<A>>,
    ) -> Self {
        Self {
            listener,
            receiver,
            registry,
        }
    }

    pub fn id(&self) -> &ListenerId {
        &self.listener.id
    }

    /// Remove this subscription's listener from the store.
    ///
    /// Returns false if it was already removed or the store is gone. Events
    /// buffered before the call stay readable.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.remove(self.listener.id.as_str()),
            None => false,
        }
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent<A>, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent<A>, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<StoreEvent<A>, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<StoreEvent<A>> {
        self.receiver.try_iter().collect()
    }

    pub fn dropped(&self) -> u64 {
        self.listener.dropped()
    }
}
