//! # Reducer Store
//!
//! A single in-process container for application state, changed only by
//! dispatching actions through pure reducers.
//!
//! ## Core Concepts
//!
//! - **Sub-states**: Named, independently reduced parts of the root state
//! - **Reducers**: Pure functions from (sub-state, action) to a [`Reduction`]
//! - **Listeners**: Observers of actions, changes, errors and loading flips
//! - **Indexed lists**: Copy-on-write record lists with lookup by id
//! - **Shallow diff**: Field-level change reports between two records
//!
//! ## Example
//!
//! ```ignore
//! use reducer_store::{Reduction, RootState, StateKey, Store};
//!
//! const COUNTER: StateKey<Counter> = StateKey::new("counter");
//!
//! let root = RootState::builder().with(COUNTER, Counter { value: 0 })?.build();
//! let store = Store::new(root);
//!
//! store.register_reducer(COUNTER, |c: &Counter, a: &Action| match a {
//!     Action::Increment => Reduction::Changed(Counter { value: c.value + 1 }),
//!     _ => Reduction::Unchanged,
//! })?;
//!
//! store.dispatch(Action::Increment);
//! assert_eq!(store.get(COUNTER).unwrap().value, 1);
//! ```

pub mod context;
pub mod diff;
pub mod error;
pub mod list;
pub mod listeners;
pub mod loading;
pub mod logger;
pub mod router;
pub mod state;
pub mod store;
pub mod types;

// Re-exports
pub use context::Carrier;
pub use diff::{shallow_diff, FieldDiff, FieldEquality, ModelDiff, ShallowDiff};
pub use error::{Result, StoreError};
pub use list::{Identifiable, ImmutableIndexedList};
pub use listeners::{
    BusinessError, Capabilities, ChannelListener, EventListener, ListenerRegistry, StoreEvent,
    Subscription, SubscriptionConfig,
};
pub use loading::LoadingTracker;
pub use logger::{NoopLogger, StoreLogger, TracingLogger};
pub use router::TypeRouter;
pub use state::{RootState, RootStateBuilder, StateView};
pub use store::{
    with_async_thread_name, with_logger, with_reentrancy_detection, Store, StoreConfig,
    StoreOption,
};
pub use types::*;
