//! Root state and its read-only view.
//!
//! The root state is an ordered set of named sub-states. Each sub-state is
//! held behind an `Arc` and only ever replaced as a whole, so a
//! [`StateView`] taken before a dispatch keeps seeing the old values.

mod root;
mod view;

pub use root::{RootState, RootStateBuilder};
pub use view::StateView;

pub(crate) use root::SharedValue;
