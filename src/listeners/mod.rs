//! Observers of store activity.
//!
//! A listener declares which notifications it wants through
//! [`Capabilities`]; the registry files it into one list per capability
//! when it is added, so notifying never probes listeners one by one.
//!
//! Notifications:
//! - Raw actions, before any reducer runs
//! - State changes, after a dispatch that updated a sub-state
//! - Business errors reported through `Store::handle_error`
//! - Loading transitions for a namespace
//!
//! # Example
//!
//! ```ignore
//! let sub = store.subscribe("ui", SubscriptionConfig::default());
//! store.dispatch(Action::Increment);
//!
//! loop {
//!     match sub.recv() {
//!         Ok(StoreEvent::Changed { .. }) => redraw(&store.state()),
//!         Ok(StoreEvent::Loading { namespace, loading }) => spinner(&namespace, loading),
//!         Ok(_) => {}
//!         Err(_) => break,
//!     }
//! }
//! ```

mod channel;
mod registry;
mod types;

pub use channel::{ChannelListener, Subscription};
pub use registry::ListenerRegistry;
pub use types::{BusinessError, Capabilities, EventListener, StoreEvent, SubscriptionConfig};
