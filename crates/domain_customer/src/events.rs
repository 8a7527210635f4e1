//! Domain events emitted by the customer aggregate
//!
//! Every successful command yields exactly one event, returned to the caller
//! for publication after the unit of work commits. Events carry the
//! identifiers downstream consumers key on, never entity snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{CardNumber, CustomerId, ScanId};

/// Domain events describing customer command outcomes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CustomerEvent {
    /// A customer was created in PENDING state
    Created {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// Scalar fields and owned collections were overwritten
    Updated {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The customer transitioned to ACTIVE
    Activated {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The customer transitioned to LOCKED
    Locked {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The customer transitioned back to ACTIVE from LOCKED
    Unlocked {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The customer transitioned to CLOSED
    Closed {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The customer transitioned back to ACTIVE from CLOSED
    Reopened {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The current address was replaced
    AddressUpdated {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The contact-detail set was replaced
    ContactDetailsUpdated {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// An identification card was registered
    IdentificationCardCreated {
        customer: CustomerId,
        number: CardNumber,
        timestamp: DateTime<Utc>,
    },

    /// An identification card was overwritten (or the update was a no-op)
    IdentificationCardUpdated {
        number: CardNumber,
        timestamp: DateTime<Utc>,
    },

    /// An identification card and its scans were removed (or a no-op)
    IdentificationCardDeleted {
        number: CardNumber,
        timestamp: DateTime<Utc>,
    },

    /// A scan was stored for an identification card
    ScanCreated {
        customer: CustomerId,
        number: CardNumber,
        scan: ScanId,
        timestamp: DateTime<Utc>,
    },

    /// A scan was removed; the owner is absent when the card or scan was
    /// already gone
    ScanDeleted {
        customer: Option<CustomerId>,
        number: CardNumber,
        scan: ScanId,
        timestamp: DateTime<Utc>,
    },

    /// The portrait was stored, replacing any prior one
    PortraitCreated {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },

    /// The portrait was removed (idempotent)
    PortraitDeleted {
        customer: CustomerId,
        timestamp: DateTime<Utc>,
    },
}

impl CustomerEvent {
    /// Returns the customer this event concerns, when known
    ///
    /// Card-keyed events and no-op scan deletions may not carry an owner.
    pub fn customer_identifier(&self) -> Option<&CustomerId> {
        match self {
            CustomerEvent::Created { customer, .. }
            | CustomerEvent::Updated { customer, .. }
            | CustomerEvent::Activated { customer, .. }
            | CustomerEvent::Locked { customer, .. }
            | CustomerEvent::Unlocked { customer, .. }
            | CustomerEvent::Closed { customer, .. }
            | CustomerEvent::Reopened { customer, .. }
            | CustomerEvent::AddressUpdated { customer, .. }
            | CustomerEvent::ContactDetailsUpdated { customer, .. }
            | CustomerEvent::IdentificationCardCreated { customer, .. }
            | CustomerEvent::ScanCreated { customer, .. }
            | CustomerEvent::PortraitCreated { customer, .. }
            | CustomerEvent::PortraitDeleted { customer, .. } => Some(customer),
            CustomerEvent::ScanDeleted { customer, .. } => customer.as_ref(),
            CustomerEvent::IdentificationCardUpdated { .. }
            | CustomerEvent::IdentificationCardDeleted { .. } => None,
        }
    }

    /// Returns the timestamp of this event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CustomerEvent::Created { timestamp, .. }
            | CustomerEvent::Updated { timestamp, .. }
            | CustomerEvent::Activated { timestamp, .. }
            | CustomerEvent::Locked { timestamp, .. }
            | CustomerEvent::Unlocked { timestamp, .. }
            | CustomerEvent::Closed { timestamp, .. }
            | CustomerEvent::Reopened { timestamp, .. }
            | CustomerEvent::AddressUpdated { timestamp, .. }
            | CustomerEvent::ContactDetailsUpdated { timestamp, .. }
            | CustomerEvent::IdentificationCardCreated { timestamp, .. }
            | CustomerEvent::IdentificationCardUpdated { timestamp, .. }
            | CustomerEvent::IdentificationCardDeleted { timestamp, .. }
            | CustomerEvent::ScanCreated { timestamp, .. }
            | CustomerEvent::ScanDeleted { timestamp, .. }
            | CustomerEvent::PortraitCreated { timestamp, .. }
            | CustomerEvent::PortraitDeleted { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            CustomerEvent::Created { .. } => "CustomerCreated",
            CustomerEvent::Updated { .. } => "CustomerUpdated",
            CustomerEvent::Activated { .. } => "CustomerActivated",
            CustomerEvent::Locked { .. } => "CustomerLocked",
            CustomerEvent::Unlocked { .. } => "CustomerUnlocked",
            CustomerEvent::Closed { .. } => "CustomerClosed",
            CustomerEvent::Reopened { .. } => "CustomerReopened",
            CustomerEvent::AddressUpdated { .. } => "AddressUpdated",
            CustomerEvent::ContactDetailsUpdated { .. } => "ContactDetailsUpdated",
            CustomerEvent::IdentificationCardCreated { .. } => "IdentificationCardCreated",
            CustomerEvent::IdentificationCardUpdated { .. } => "IdentificationCardUpdated",
            CustomerEvent::IdentificationCardDeleted { .. } => "IdentificationCardDeleted",
            CustomerEvent::ScanCreated { .. } => "ScanCreated",
            CustomerEvent::ScanDeleted { .. } => "ScanDeleted",
            CustomerEvent::PortraitCreated { .. } => "PortraitCreated",
            CustomerEvent::PortraitDeleted { .. } => "PortraitDeleted",
        }
    }
}
