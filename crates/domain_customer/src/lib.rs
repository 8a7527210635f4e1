//! Customer Lifecycle Domain
//!
//! This crate implements the back-office customer core: customer records,
//! their transition-gated lifecycle, and the cluster of sub-entities a
//! customer exclusively owns (address, contact details, identification cards
//! with scans, portrait, and catalog-keyed custom field values).
//!
//! # Architecture
//!
//! The domain layer is infrastructure-agnostic, following the hexagonal
//! style: entity stores, the task gate, and the catalog registry are port
//! traits in [`ports`], implemented by adapters elsewhere. The
//! [`aggregate::CustomerAggregate`] is the only command surface; each command
//! runs as one atomic unit of work and yields exactly one
//! [`events::CustomerEvent`] for publication after commit.
//!
//! # Customer lifecycle
//!
//! ```text
//! PENDING --activate--> ACTIVE --lock--> LOCKED --unlock--> ACTIVE
//!                       ACTIVE/LOCKED --close--> CLOSED --reopen--> ACTIVE
//! ```
//!
//! Unlock, reopen, and activate are guarded: they are rejected with a
//! conflict while an open task of the matching kind exists in the external
//! task subsystem.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_customer::{CustomerAggregate, CustomerPorts, CustomerRequest};
//!
//! let aggregate = CustomerAggregate::new(ports);
//! let event = aggregate.create_customer(request, &actor).await?;
//! publisher.publish(event).await;
//! ```

pub mod address;
pub mod aggregate;
pub mod command;
pub mod customer;
pub mod error;
pub mod events;
pub mod fields;
pub mod identification;
pub mod portrait;
pub mod ports;

pub use address::Address;
pub use aggregate::{CustomerAggregate, CustomerPorts};
pub use command::{
    AddressRequest, CardRequest, CommandLogEntry, CustomerAction, CustomerRequest, ScanRequest,
};
pub use customer::{ContactDetail, ContactType, Customer, CustomerState};
pub use error::CustomerError;
pub use events::CustomerEvent;
pub use fields::FieldValue;
pub use identification::{IdentificationCard, IdentificationCardScan};
pub use portrait::{ImageData, Portrait};
pub use ports::{
    AddressRepository, CatalogRegistry, CommandLog, ContactDetailRepository, CustomerRepository,
    FieldValueRepository, IdentificationCardRepository, IdentificationCardScanRepository,
    PortraitRepository, TaskGate,
};
