//! Ports to storage and external collaborators
//!
//! One logical repository per entity kind, plus the task gate and the catalog
//! registry. Implementations are adapters: a database layer in production,
//! the in-memory mocks below in tests.
//!
//! # Atomicity
//!
//! The aggregate executes each command as one atomic unit of work. Every port
//! implementation wired into one [`crate::aggregate::CustomerAggregate`] must
//! join that unit of work: all reads, writes, and log appends of a command
//! become visible together or not at all, and the customer row is locked for
//! the duration so concurrent commands on the same customer serialize. The
//! adapter owns the locking protocol; this crate states the contract.

use async_trait::async_trait;

use core_kernel::{AddressId, CardNumber, CatalogId, CustomerId, FieldId, ScanId, StoreError};

use crate::address::Address;
use crate::command::{CommandLogEntry, CustomerAction};
use crate::customer::{ContactDetail, Customer};
use crate::fields::FieldValue;
use crate::identification::{IdentificationCard, IdentificationCardScan};
use crate::portrait::Portrait;

/// Store for customer records
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_by_identifier(
        &self,
        identifier: &CustomerId,
    ) -> Result<Option<Customer>, StoreError>;

    async fn exists(&self, identifier: &CustomerId) -> Result<bool, StoreError>;

    /// Inserts or overwrites the customer row
    async fn save(&self, customer: Customer) -> Result<(), StoreError>;
}

/// Store for address rows
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find_by_id(&self, id: &AddressId) -> Result<Option<Address>, StoreError>;

    async fn save(&self, address: Address) -> Result<(), StoreError>;

    /// Removing a row that is already gone is a no-op
    async fn delete(&self, id: &AddressId) -> Result<(), StoreError>;
}

/// Store for the multi-valued contact-detail set of a customer
#[async_trait]
pub trait ContactDetailRepository: Send + Sync {
    async fn find_by_customer(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<ContactDetail>, StoreError>;

    /// Inserts the given rows, each attached to the customer
    async fn save_all(
        &self,
        customer: &CustomerId,
        details: Vec<ContactDetail>,
    ) -> Result<(), StoreError>;

    async fn delete_by_customer(&self, customer: &CustomerId) -> Result<(), StoreError>;
}

/// Store for identification cards, keyed by their globally unique number
#[async_trait]
pub trait IdentificationCardRepository: Send + Sync {
    async fn find_by_number(
        &self,
        number: &CardNumber,
    ) -> Result<Option<IdentificationCard>, StoreError>;

    async fn find_by_customer(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<IdentificationCard>, StoreError>;

    async fn save(&self, card: IdentificationCard) -> Result<(), StoreError>;

    async fn delete(&self, number: &CardNumber) -> Result<(), StoreError>;
}

/// Store for scanned card images
#[async_trait]
pub trait IdentificationCardScanRepository: Send + Sync {
    async fn find_by_identifier(
        &self,
        scan: &ScanId,
        number: &CardNumber,
    ) -> Result<Option<IdentificationCardScan>, StoreError>;

    async fn find_by_card(
        &self,
        number: &CardNumber,
    ) -> Result<Vec<IdentificationCardScan>, StoreError>;

    async fn save(&self, scan: IdentificationCardScan) -> Result<(), StoreError>;

    async fn delete(&self, scan: &ScanId, number: &CardNumber) -> Result<(), StoreError>;

    /// Removes every scan owned by the card
    async fn delete_by_card(&self, number: &CardNumber) -> Result<(), StoreError>;
}

/// Store for the single portrait of a customer
#[async_trait]
pub trait PortraitRepository: Send + Sync {
    async fn find_by_customer(&self, customer: &CustomerId)
        -> Result<Option<Portrait>, StoreError>;

    /// Upserts the portrait row of the owning customer
    async fn save(&self, portrait: Portrait) -> Result<(), StoreError>;

    /// Deleting an absent portrait is a no-op
    async fn delete_by_customer(&self, customer: &CustomerId) -> Result<(), StoreError>;
}

/// Store for the multi-valued custom field values of a customer
#[async_trait]
pub trait FieldValueRepository: Send + Sync {
    async fn find_by_customer(&self, customer: &CustomerId) -> Result<Vec<FieldValue>, StoreError>;

    async fn save_all(
        &self,
        customer: &CustomerId,
        values: Vec<FieldValue>,
    ) -> Result<(), StoreError>;

    /// The delete must be durably visible before a subsequent insert of the
    /// replacement set
    async fn delete_by_customer(&self, customer: &CustomerId) -> Result<(), StoreError>;
}

/// Append-only log of executed state-changing commands
#[async_trait]
pub trait CommandLog: Send + Sync {
    async fn append(&self, entry: CommandLogEntry) -> Result<(), StoreError>;

    async fn find_by_customer(
        &self,
        customer: &CustomerId,
    ) -> Result<Vec<CommandLogEntry>, StoreError>;
}

/// Existence lookup against the externally-defined catalog/field schema
#[async_trait]
pub trait CatalogRegistry: Send + Sync {
    async fn catalog_exists(&self, catalog: &CatalogId) -> Result<bool, StoreError>;

    async fn field_exists(
        &self,
        catalog: &CatalogId,
        field: &FieldId,
    ) -> Result<bool, StoreError>;
}

/// The task-tracking subsystem that can block guarded transitions
///
/// Both operations run synchronously inside the unit of work of the guarded
/// transition, so a guard check and its subsequent write are not subject to a
/// separate external race.
#[async_trait]
pub trait TaskGate: Send + Sync {
    /// Whether an open task of the given kind exists for the customer
    async fn has_open_tasks(
        &self,
        customer: &CustomerId,
        action: CustomerAction,
    ) -> Result<bool, StoreError>;

    /// Registers the customer's pending obligation of the given kind
    async fn register_tasks(
        &self,
        customer: &CustomerId,
        action: CustomerAction,
    ) -> Result<(), StoreError>;
}

/// In-memory adapters for testing without a database
///
/// A single [`mock::MemoryStore`] implements every repository trait, so one
/// instance wired into all port slots behaves like one transactional store.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// In-memory implementation of every entity store
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        customers: RwLock<HashMap<CustomerId, Customer>>,
        addresses: RwLock<HashMap<AddressId, Address>>,
        contact_details: RwLock<HashMap<CustomerId, Vec<ContactDetail>>>,
        cards: RwLock<HashMap<CardNumber, IdentificationCard>>,
        scans: RwLock<HashMap<CardNumber, Vec<IdentificationCardScan>>>,
        portraits: RwLock<HashMap<CustomerId, Portrait>>,
        field_values: RwLock<HashMap<CustomerId, Vec<FieldValue>>>,
        command_log: RwLock<Vec<CommandLogEntry>>,
    }

    impl MemoryStore {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Number of address rows currently stored
        pub async fn address_count(&self) -> usize {
            self.addresses.read().await.len()
        }

        /// Number of scan rows currently stored across all cards
        pub async fn scan_count(&self) -> usize {
            self.scans.read().await.values().map(Vec::len).sum()
        }
    }

    #[async_trait]
    impl CustomerRepository for MemoryStore {
        async fn find_by_identifier(
            &self,
            identifier: &CustomerId,
        ) -> Result<Option<Customer>, StoreError> {
            Ok(self.customers.read().await.get(identifier).cloned())
        }

        async fn exists(&self, identifier: &CustomerId) -> Result<bool, StoreError> {
            Ok(self.customers.read().await.contains_key(identifier))
        }

        async fn save(&self, customer: Customer) -> Result<(), StoreError> {
            self.customers
                .write()
                .await
                .insert(customer.identifier.clone(), customer);
            Ok(())
        }
    }

    #[async_trait]
    impl AddressRepository for MemoryStore {
        async fn find_by_id(&self, id: &AddressId) -> Result<Option<Address>, StoreError> {
            Ok(self.addresses.read().await.get(id).cloned())
        }

        async fn save(&self, address: Address) -> Result<(), StoreError> {
            self.addresses.write().await.insert(address.id, address);
            Ok(())
        }

        async fn delete(&self, id: &AddressId) -> Result<(), StoreError> {
            self.addresses.write().await.remove(id);
            Ok(())
        }
    }

    #[async_trait]
    impl ContactDetailRepository for MemoryStore {
        async fn find_by_customer(
            &self,
            customer: &CustomerId,
        ) -> Result<Vec<ContactDetail>, StoreError> {
            Ok(self
                .contact_details
                .read()
                .await
                .get(customer)
                .cloned()
                .unwrap_or_default())
        }

        async fn save_all(
            &self,
            customer: &CustomerId,
            details: Vec<ContactDetail>,
        ) -> Result<(), StoreError> {
            self.contact_details
                .write()
                .await
                .entry(customer.clone())
                .or_default()
                .extend(details);
            Ok(())
        }

        async fn delete_by_customer(&self, customer: &CustomerId) -> Result<(), StoreError> {
            self.contact_details.write().await.remove(customer);
            Ok(())
        }
    }

    #[async_trait]
    impl IdentificationCardRepository for MemoryStore {
        async fn find_by_number(
            &self,
            number: &CardNumber,
        ) -> Result<Option<IdentificationCard>, StoreError> {
            Ok(self.cards.read().await.get(number).cloned())
        }

        async fn find_by_customer(
            &self,
            customer: &CustomerId,
        ) -> Result<Vec<IdentificationCard>, StoreError> {
            Ok(self
                .cards
                .read()
                .await
                .values()
                .filter(|card| &card.customer == customer)
                .cloned()
                .collect())
        }

        async fn save(&self, card: IdentificationCard) -> Result<(), StoreError> {
            self.cards.write().await.insert(card.number.clone(), card);
            Ok(())
        }

        async fn delete(&self, number: &CardNumber) -> Result<(), StoreError> {
            self.cards.write().await.remove(number);
            Ok(())
        }
    }

    #[async_trait]
    impl IdentificationCardScanRepository for MemoryStore {
        async fn find_by_identifier(
            &self,
            scan: &ScanId,
            number: &CardNumber,
        ) -> Result<Option<IdentificationCardScan>, StoreError> {
            Ok(self.scans.read().await.get(number).and_then(|scans| {
                scans.iter().find(|s| &s.identifier == scan).cloned()
            }))
        }

        async fn find_by_card(
            &self,
            number: &CardNumber,
        ) -> Result<Vec<IdentificationCardScan>, StoreError> {
            Ok(self
                .scans
                .read()
                .await
                .get(number)
                .cloned()
                .unwrap_or_default())
        }

        async fn save(&self, scan: IdentificationCardScan) -> Result<(), StoreError> {
            self.scans
                .write()
                .await
                .entry(scan.card_number.clone())
                .or_default()
                .push(scan);
            Ok(())
        }

        async fn delete(&self, scan: &ScanId, number: &CardNumber) -> Result<(), StoreError> {
            if let Some(scans) = self.scans.write().await.get_mut(number) {
                scans.retain(|s| &s.identifier != scan);
            }
            Ok(())
        }

        async fn delete_by_card(&self, number: &CardNumber) -> Result<(), StoreError> {
            self.scans.write().await.remove(number);
            Ok(())
        }
    }

    #[async_trait]
    impl PortraitRepository for MemoryStore {
        async fn find_by_customer(
            &self,
            customer: &CustomerId,
        ) -> Result<Option<Portrait>, StoreError> {
            Ok(self.portraits.read().await.get(customer).cloned())
        }

        async fn save(&self, portrait: Portrait) -> Result<(), StoreError> {
            self.portraits
                .write()
                .await
                .insert(portrait.customer.clone(), portrait);
            Ok(())
        }

        async fn delete_by_customer(&self, customer: &CustomerId) -> Result<(), StoreError> {
            self.portraits.write().await.remove(customer);
            Ok(())
        }
    }

    #[async_trait]
    impl FieldValueRepository for MemoryStore {
        async fn find_by_customer(
            &self,
            customer: &CustomerId,
        ) -> Result<Vec<FieldValue>, StoreError> {
            Ok(self
                .field_values
                .read()
                .await
                .get(customer)
                .cloned()
                .unwrap_or_default())
        }

        async fn save_all(
            &self,
            customer: &CustomerId,
            values: Vec<FieldValue>,
        ) -> Result<(), StoreError> {
            self.field_values
                .write()
                .await
                .entry(customer.clone())
                .or_default()
                .extend(values);
            Ok(())
        }

        async fn delete_by_customer(&self, customer: &CustomerId) -> Result<(), StoreError> {
            self.field_values.write().await.remove(customer);
            Ok(())
        }
    }

    #[async_trait]
    impl CommandLog for MemoryStore {
        async fn append(&self, entry: CommandLogEntry) -> Result<(), StoreError> {
            self.command_log.write().await.push(entry);
            Ok(())
        }

        async fn find_by_customer(
            &self,
            customer: &CustomerId,
        ) -> Result<Vec<CommandLogEntry>, StoreError> {
            Ok(self
                .command_log
                .read()
                .await
                .iter()
                .filter(|entry| &entry.customer == customer)
                .cloned()
                .collect())
        }
    }

    /// Mock task gate with explicit control over open tasks
    ///
    /// `register_tasks` only records the registration; whether a registered
    /// obligation shows up as an open (blocking) task is the task subsystem's
    /// business, so tests opt into blocking via [`MockTaskGate::open_task`].
    #[derive(Debug, Default)]
    pub struct MockTaskGate {
        open: RwLock<HashSet<(CustomerId, CustomerAction)>>,
        registered: RwLock<Vec<(CustomerId, CustomerAction)>>,
    }

    impl MockTaskGate {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Marks an open task of the given kind, blocking the guarded
        /// transition
        pub async fn open_task(&self, customer: &CustomerId, action: CustomerAction) {
            self.open.write().await.insert((customer.clone(), action));
        }

        /// Clears a previously opened task
        pub async fn close_task(&self, customer: &CustomerId, action: CustomerAction) {
            self.open.write().await.remove(&(customer.clone(), action));
        }

        /// Registrations observed so far, in order
        pub async fn registered(&self) -> Vec<(CustomerId, CustomerAction)> {
            self.registered.read().await.clone()
        }
    }

    #[async_trait]
    impl TaskGate for MockTaskGate {
        async fn has_open_tasks(
            &self,
            customer: &CustomerId,
            action: CustomerAction,
        ) -> Result<bool, StoreError> {
            Ok(self
                .open
                .read()
                .await
                .contains(&(customer.clone(), action)))
        }

        async fn register_tasks(
            &self,
            customer: &CustomerId,
            action: CustomerAction,
        ) -> Result<(), StoreError> {
            self.registered
                .write()
                .await
                .push((customer.clone(), action));
            Ok(())
        }
    }

    /// Mock catalog registry backed by explicitly registered schema entries
    #[derive(Debug, Default)]
    pub struct MockCatalogRegistry {
        catalogs: RwLock<HashSet<CatalogId>>,
        fields: RwLock<HashSet<(CatalogId, FieldId)>>,
    }

    impl MockCatalogRegistry {
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Registers a field and its owning catalog
        pub async fn register_field(&self, catalog: impl Into<CatalogId>, field: impl Into<FieldId>) {
            let catalog = catalog.into();
            self.catalogs.write().await.insert(catalog.clone());
            self.fields.write().await.insert((catalog, field.into()));
        }
    }

    #[async_trait]
    impl CatalogRegistry for MockCatalogRegistry {
        async fn catalog_exists(&self, catalog: &CatalogId) -> Result<bool, StoreError> {
            Ok(self.catalogs.read().await.contains(catalog))
        }

        async fn field_exists(
            &self,
            catalog: &CatalogId,
            field: &FieldId,
        ) -> Result<bool, StoreError> {
            Ok(self
                .fields
                .read()
                .await
                .contains(&(catalog.clone(), field.clone())))
        }
    }
}
