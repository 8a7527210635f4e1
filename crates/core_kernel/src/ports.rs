//! Storage port boundary
//!
//! Entity stores and external collaborators (task gate, catalog registry)
//! are reached through traits defined in the domain crates. [`StoreError`]
//! is the single error type crossing that boundary; domain errors are
//! layered on top of it.
//!
//! # Atomicity contract
//!
//! Every port implementation wired into one aggregate instance must join the
//! unit of work of the command being executed: all reads, writes, and log
//! appends of a command become visible together or not at all. The adapter
//! owns the locking protocol; this crate only states the contract.

use thiserror::Error;

/// Error type for storage and collaborator ports
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint was violated
    #[error("duplicate {entity}: {id}")]
    Duplicate { entity: String, id: String },

    /// The underlying store could not be reached
    #[error("connection error: {message}")]
    Connection { message: String },

    /// An unexpected storage failure
    #[error("internal store error: {message}")]
    Internal { message: String },
}

impl StoreError {
    /// Creates a Duplicate error
    pub fn duplicate(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        StoreError::Duplicate {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        StoreError::Connection {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        StoreError::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error reports a uniqueness violation
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::Duplicate { .. })
    }

    /// Returns true if retrying the operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Connection { .. })
    }
}
