//! Copy-on-write ordered collections of identifiable records.
//!
//! Every mutating operation returns a new list and leaves the receiver
//! untouched, so a reducer can keep the previous value as a snapshot while
//! producing the next one.

mod indexed;

pub use indexed::{Identifiable, ImmutableIndexedList};
