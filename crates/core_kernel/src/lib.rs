//! Core Kernel - Foundational types and utilities for the customer back office
//!
//! This crate provides the fundamental building blocks used across the domain
//! modules:
//! - Strongly-typed identifiers (string-keyed external identifiers and
//!   UUID-keyed row identifiers)
//! - The acting-user value object threaded through every command
//! - A clock abstraction for deterministic time in tests
//! - The storage port error type and its atomicity contract

pub mod actor;
pub mod identifiers;
pub mod ports;
pub mod temporal;

pub use actor::{Actor, ActorError};
pub use identifiers::{
    AddressId, CardNumber, CatalogId, CommandId, CustomerId, FieldId, ScanId,
};
pub use ports::StoreError;
pub use temporal::{Clock, SystemClock};

#[cfg(any(test, feature = "mock"))]
pub use temporal::FixedClock;
