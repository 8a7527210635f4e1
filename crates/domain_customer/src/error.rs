//! Customer domain errors

use std::fmt;
use thiserror::Error;

use core_kernel::StoreError;

use crate::command::CustomerAction;
use crate::customer::CustomerState;

/// Errors surfaced by customer commands
///
/// Every error aborts the enclosing unit of work; nothing is partially
/// committed. Callers own retry policy.
#[derive(Debug, Error)]
pub enum CustomerError {
    /// A referenced entity does not exist
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// The command collides with existing state or an open task
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// The requested transition is not defined for the current state
    #[error("cannot {action} a {from} customer")]
    InvalidTransition {
        from: CustomerState,
        action: CustomerAction,
    },

    /// A malformed payload slipped past upstream validation
    #[error("validation error: {message}")]
    Validation { message: String },

    /// The storage boundary failed
    #[error(transparent)]
    Store(StoreError),
}

impl CustomerError {
    /// Creates a NotFound error carrying the offending identifier
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        CustomerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        CustomerError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        CustomerError::Validation {
            message: message.into(),
        }
    }

    /// Returns true if a referenced entity was missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, CustomerError::NotFound { .. })
    }

    /// Returns true if the command was rejected as conflicting
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            CustomerError::Conflict { .. } | CustomerError::InvalidTransition { .. }
        )
    }
}

impl From<StoreError> for CustomerError {
    fn from(error: StoreError) -> Self {
        // Uniqueness violations detected by the store are command conflicts
        match error {
            StoreError::Duplicate { .. } => CustomerError::Conflict {
                message: error.to_string(),
            },
            other => CustomerError::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_carries_identifier() {
        let error = CustomerError::not_found("customer", "cust-9");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("cust-9"));
    }

    #[test]
    fn test_invalid_transition_is_a_conflict() {
        let error = CustomerError::InvalidTransition {
            from: CustomerState::Pending,
            action: CustomerAction::Unlock,
        };
        assert!(error.is_conflict());
        assert_eq!(error.to_string(), "cannot UNLOCK a PENDING customer");
    }

    #[test]
    fn test_store_duplicate_maps_to_conflict() {
        let error: CustomerError = StoreError::duplicate("customer", "cust-1").into();
        assert!(error.is_conflict());

        let error: CustomerError = StoreError::connection("down").into();
        assert!(!error.is_conflict());
    }
}
