//! Field-level change detection between two values of one record type.
//!
//! A record's fields are enumerated through its `Serialize` impl, in
//! declaration order. Scalar fields (null, bool, number, string) compare by
//! value. Nested records, maps and sequences have no default equality: the
//! record type must list them in [`ShallowDiff::field_equality`].
//!
//! # Example
//!
//! ```ignore
//! #[derive(Clone, Serialize)]
//! struct Todo { id: String, title: String, tags: Vec<String> }
//!
//! impl ShallowDiff for Todo {
//!     fn field_equality() -> Option<FieldEquality<Self>> {
//!         Some(FieldEquality::new().field("tags", |a, b| a.tags == b.tags))
//!     }
//! }
//!
//! let changes = shallow_diff(&before, &after)?;
//! ```

mod shallow;

pub use shallow::{shallow_diff, FieldDiff, FieldEquality, ModelDiff, ShallowDiff};
