//! Acting-user identity
//!
//! Commands never execute without a known acting user. `Actor` replaces the
//! ambient user-context lookup found in classic service frameworks with an
//! explicit value threaded through every command call; the caller resolves it
//! before invoking the aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error raised when constructing an invalid actor
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActorError {
    /// The acting user name was empty or blank
    #[error("acting user must not be empty")]
    Empty,
}

/// The authenticated user executing a command
///
/// Guaranteed non-blank by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actor(String);

impl Actor {
    /// Creates an actor, rejecting empty or blank names
    pub fn new(name: impl Into<String>) -> Result<Self, ActorError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ActorError::Empty);
        }
        Ok(Self(name))
    }

    /// Returns the user name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Actor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_rejects_empty() {
        assert_eq!(Actor::new("").unwrap_err(), ActorError::Empty);
        assert_eq!(Actor::new("   ").unwrap_err(), ActorError::Empty);
    }

    #[test]
    fn test_actor_display() {
        let actor = Actor::new("operator").unwrap();
        assert_eq!(actor.to_string(), "operator");
        assert_eq!(actor.as_str(), "operator");
    }
}
