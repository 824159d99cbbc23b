//! Error types for the reducer store.

use thiserror::Error;

/// Structural and usage errors.
///
/// Every variant signals a broken invariant detected at the call site
/// (registration, list mutation, diff). None of them are produced by
/// dispatch itself.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Reducer already registered for state: {0}")]
    DuplicateReducer(String),

    #[error("State already exists: {0}")]
    DuplicateState(String),

    #[error("State not registered: {0}")]
    UnknownState(String),

    #[error("State type mismatch for {key}: expected {expected}, got {got}")]
    StateTypeMismatch {
        key: String,
        expected: &'static str,
        got: &'static str,
    },

    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    #[error("Id not found: {0}")]
    IdNotFound(String),

    #[error("Update changed record id: expected {expected}, got {got}")]
    IdChanged { expected: String, got: String },

    #[error("Field {field} is a {kind} and needs an entry in field_equality() to be diffed")]
    UnsupportedField { field: String, kind: &'static str },

    #[error("Value is not a record: serialized as {0}")]
    NotARecord(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Dispatch issued while the dispatching thread holds the store lock")]
    ReentrantDispatch,
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
