//! Tests for the acting-user value object

use core_kernel::{Actor, ActorError};

#[test]
fn actor_requires_a_name() {
    assert_eq!(Actor::new("").unwrap_err(), ActorError::Empty);
    assert_eq!(Actor::new("\t \n").unwrap_err(), ActorError::Empty);
    assert!(Actor::new("back-office-1").is_ok());
}

#[test]
fn actor_serializes_transparently() {
    let actor = Actor::new("operator").unwrap();
    let json = serde_json::to_string(&actor).unwrap();
    assert_eq!(json, "\"operator\"");

    let back: Actor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, actor);
}
