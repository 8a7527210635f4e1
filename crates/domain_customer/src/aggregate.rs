//! Customer aggregate - the command surface
//!
//! The aggregate is the single consistency boundary for a customer and the
//! sub-entities it owns. Each command loads what it needs, applies the
//! mutation under the invariants below, persists changes, appends a
//! command-log entry where the state machine requires one, and returns the
//! single domain event the caller publishes after commit.
//!
//! # Invariants
//!
//! - A customer always has exactly one current address
//! - State transitions follow the lifecycle machine; nothing else is reachable
//! - Contact details and custom field values always reflect the most recently
//!   submitted full set
//! - Every mutation of the customer or a sub-entity refreshes the owning
//!   customer's modification stamp in the same unit of work
//! - Identification card numbers are globally unique; scans never outlive
//!   their card
//!
//! # State machine
//!
//! | From          | Command  | Guard                   | To     |
//! |---------------|----------|-------------------------|--------|
//! | PENDING       | activate | no open ACTIVATE task   | ACTIVE |
//! | ACTIVE        | lock     | none                    | LOCKED |
//! | LOCKED        | unlock   | no open UNLOCK task     | ACTIVE |
//! | ACTIVE/LOCKED | close    | none                    | CLOSED |
//! | CLOSED        | reopen   | no open REOPEN task     | ACTIVE |
//!
//! Guards are evaluated against the task gate inside the same unit of work
//! that performs the write, so check-then-act is covered by the lock the
//! store holds on the customer row.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use core_kernel::{Actor, CardNumber, Clock, CustomerId, ScanId};

use crate::address::Address;
use crate::command::{
    AddressRequest, CardRequest, CommandLogEntry, CustomerAction, CustomerRequest, ScanRequest,
};
use crate::customer::{ContactDetail, Customer, CustomerState};
use crate::error::CustomerError;
use crate::events::CustomerEvent;
use crate::fields::FieldValue;
use crate::identification::{IdentificationCard, IdentificationCardScan};
use crate::portrait::{ImageData, Portrait};
use crate::ports::{
    AddressRepository, CatalogRegistry, CommandLog, ContactDetailRepository, CustomerRepository,
    FieldValueRepository, IdentificationCardRepository, IdentificationCardScanRepository,
    PortraitRepository, TaskGate,
};

/// The collaborators a [`CustomerAggregate`] is wired with
///
/// All stores handed to one aggregate must join the same unit of work per
/// command; see the atomicity contract in [`crate::ports`].
#[derive(Clone)]
pub struct CustomerPorts {
    pub customers: Arc<dyn CustomerRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub contact_details: Arc<dyn ContactDetailRepository>,
    pub identification_cards: Arc<dyn IdentificationCardRepository>,
    pub card_scans: Arc<dyn IdentificationCardScanRepository>,
    pub portraits: Arc<dyn PortraitRepository>,
    pub field_values: Arc<dyn FieldValueRepository>,
    pub command_log: Arc<dyn CommandLog>,
    pub catalogs: Arc<dyn CatalogRegistry>,
    pub task_gate: Arc<dyn TaskGate>,
    pub clock: Arc<dyn Clock>,
}

/// Command handler for the customer aggregate
pub struct CustomerAggregate {
    ports: CustomerPorts,
}

impl CustomerAggregate {
    pub fn new(ports: CustomerPorts) -> Self {
        Self { ports }
    }

    /// Creates a customer in PENDING state with its owned sub-entities
    ///
    /// The identifier must be unused. The address is persisted first, then
    /// the customer with the address attached, then the contact-detail and
    /// field-value sets. Finally the customer's pending ACTIVATE obligation
    /// is registered with the task gate.
    #[instrument(skip(self, request, actor), fields(customer = %request.identifier))]
    pub async fn create_customer(
        &self,
        request: CustomerRequest,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        if self.ports.customers.exists(&request.identifier).await? {
            return Err(CustomerError::conflict(format!(
                "customer '{}' already exists",
                request.identifier
            )));
        }

        let address_request = request
            .address
            .ok_or_else(|| CustomerError::validation("a new customer requires an address"))?;

        let now = self.ports.clock.now();

        let address = new_address(address_request);
        let address_id = address.id;
        self.ports.addresses.save(address).await?;

        let customer = Customer {
            identifier: request.identifier,
            given_name: request.given_name,
            middle_name: request.middle_name,
            surname: request.surname,
            date_of_birth: request.date_of_birth,
            account_beneficiary: request.account_beneficiary,
            reference_customer: request.reference_customer,
            assigned_office: request.assigned_office,
            assigned_employee: request.assigned_employee,
            state: CustomerState::Pending,
            application_date: request.application_date,
            address_id,
            created_by: actor.clone(),
            created_on: now,
            last_modified_by: None,
            last_modified_on: None,
        };
        let identifier = customer.identifier.clone();
        self.ports.customers.save(customer).await?;

        if let Some(details) = request.contact_details {
            self.ports.contact_details.save_all(&identifier, details).await?;
        }

        if let Some(values) = request.custom_values {
            self.write_field_values(&identifier, values, false).await?;
        }

        self.ports
            .task_gate
            .register_tasks(&identifier, CustomerAction::Activate)
            .await?;

        debug!("customer created");
        Ok(CustomerEvent::Created {
            customer: identifier,
            timestamp: now,
        })
    }

    /// Overwrites the customer's scalar fields and owned collections
    ///
    /// Full-replace semantics throughout: absent optional scalars are
    /// cleared, a present field-value set replaces the previous one, a
    /// present address runs the replace flow, and the contact-detail set is
    /// replaced on every call. The state machine is not involved.
    #[instrument(skip(self, request, actor), fields(customer = %request.identifier))]
    pub async fn update_customer(
        &self,
        request: CustomerRequest,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(&request.identifier).await?;
        let now = self.ports.clock.now();

        customer.given_name = request.given_name;
        customer.middle_name = request.middle_name;
        customer.surname = request.surname;
        customer.account_beneficiary = request.account_beneficiary;
        customer.reference_customer = request.reference_customer;
        customer.assigned_office = request.assigned_office;
        customer.assigned_employee = request.assigned_employee;
        // Absent means clear; this is a full replace, not a patch
        customer.date_of_birth = request.date_of_birth;

        if let Some(values) = request.custom_values {
            self.write_field_values(&customer.identifier, values, true).await?;
        }

        let replaced_address = match request.address {
            Some(address_request) => {
                let address = new_address(address_request);
                let old = customer.address_id;
                customer.address_id = address.id;
                self.ports.addresses.save(address).await?;
                Some(old)
            }
            None => None,
        };

        // Contact details run the same full-replace path on every update
        self.ports
            .contact_details
            .delete_by_customer(&customer.identifier)
            .await?;
        if let Some(details) = request.contact_details {
            self.ports
                .contact_details
                .save_all(&customer.identifier, details)
                .await?;
        }

        customer.touch(actor, now);
        let identifier = customer.identifier.clone();
        self.ports.customers.save(customer).await?;

        if let Some(old) = replaced_address {
            // The old row goes only after the customer points at the new one
            self.ports.addresses.delete(&old).await?;
        }

        Ok(CustomerEvent::Updated {
            customer: identifier,
            timestamp: now,
        })
    }

    /// Transitions PENDING -> ACTIVE
    ///
    /// Rejected with a conflict while an open ACTIVATE-kind task exists.
    /// Sets the application date if it was never recorded.
    #[instrument(skip(self, comment, actor), fields(customer = %identifier))]
    pub async fn activate_customer(
        &self,
        identifier: &CustomerId,
        comment: Option<String>,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;

        if customer.state != CustomerState::Pending {
            return Err(CustomerError::InvalidTransition {
                from: customer.state,
                action: CustomerAction::Activate,
            });
        }
        self.guard_no_open_tasks(identifier, CustomerAction::Activate).await?;

        let now = self.ports.clock.now();
        customer.state = CustomerState::Active;
        if customer.application_date.is_none() {
            customer.application_date = Some(now.date_naive());
        }
        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        self.ports
            .command_log
            .append(CommandLogEntry::record(
                identifier.clone(),
                CustomerAction::Activate,
                comment,
                actor,
                now,
            ))
            .await?;

        Ok(CustomerEvent::Activated {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Transitions ACTIVE -> LOCKED and registers the UNLOCK obligation
    #[instrument(skip(self, comment, actor), fields(customer = %identifier))]
    pub async fn lock_customer(
        &self,
        identifier: &CustomerId,
        comment: Option<String>,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;

        if customer.state != CustomerState::Active {
            return Err(CustomerError::InvalidTransition {
                from: customer.state,
                action: CustomerAction::Lock,
            });
        }

        let now = self.ports.clock.now();
        customer.state = CustomerState::Locked;
        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        self.ports
            .command_log
            .append(CommandLogEntry::record(
                identifier.clone(),
                CustomerAction::Lock,
                comment,
                actor,
                now,
            ))
            .await?;

        self.ports
            .task_gate
            .register_tasks(identifier, CustomerAction::Unlock)
            .await?;

        Ok(CustomerEvent::Locked {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Transitions LOCKED -> ACTIVE
    ///
    /// Rejected with a conflict while an open UNLOCK-kind task exists.
    #[instrument(skip(self, comment, actor), fields(customer = %identifier))]
    pub async fn unlock_customer(
        &self,
        identifier: &CustomerId,
        comment: Option<String>,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;

        if customer.state != CustomerState::Locked {
            return Err(CustomerError::InvalidTransition {
                from: customer.state,
                action: CustomerAction::Unlock,
            });
        }
        self.guard_no_open_tasks(identifier, CustomerAction::Unlock).await?;

        let now = self.ports.clock.now();
        customer.state = CustomerState::Active;
        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        self.ports
            .command_log
            .append(CommandLogEntry::record(
                identifier.clone(),
                CustomerAction::Unlock,
                comment,
                actor,
                now,
            ))
            .await?;

        Ok(CustomerEvent::Unlocked {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Transitions ACTIVE or LOCKED -> CLOSED and registers the REOPEN
    /// obligation
    #[instrument(skip(self, comment, actor), fields(customer = %identifier))]
    pub async fn close_customer(
        &self,
        identifier: &CustomerId,
        comment: Option<String>,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;

        if !matches!(customer.state, CustomerState::Active | CustomerState::Locked) {
            return Err(CustomerError::InvalidTransition {
                from: customer.state,
                action: CustomerAction::Close,
            });
        }

        let now = self.ports.clock.now();
        customer.state = CustomerState::Closed;
        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        self.ports
            .command_log
            .append(CommandLogEntry::record(
                identifier.clone(),
                CustomerAction::Close,
                comment,
                actor,
                now,
            ))
            .await?;

        self.ports
            .task_gate
            .register_tasks(identifier, CustomerAction::Reopen)
            .await?;

        Ok(CustomerEvent::Closed {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Transitions CLOSED -> ACTIVE
    ///
    /// Rejected with a conflict while an open REOPEN-kind task exists.
    #[instrument(skip(self, comment, actor), fields(customer = %identifier))]
    pub async fn reopen_customer(
        &self,
        identifier: &CustomerId,
        comment: Option<String>,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;

        if customer.state != CustomerState::Closed {
            return Err(CustomerError::InvalidTransition {
                from: customer.state,
                action: CustomerAction::Reopen,
            });
        }
        self.guard_no_open_tasks(identifier, CustomerAction::Reopen).await?;

        let now = self.ports.clock.now();
        customer.state = CustomerState::Active;
        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        self.ports
            .command_log
            .append(CommandLogEntry::record(
                identifier.clone(),
                CustomerAction::Reopen,
                comment,
                actor,
                now,
            ))
            .await?;

        Ok(CustomerEvent::Reopened {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Replaces the customer's current address
    ///
    /// The new row is saved and attached, the customer persisted, and only
    /// then is the old row deleted. A fault between the last two steps leaks
    /// an orphan row at worst; the customer never resolves to zero or two
    /// addresses.
    #[instrument(skip(self, request, actor), fields(customer = %identifier))]
    pub async fn update_address(
        &self,
        identifier: &CustomerId,
        request: AddressRequest,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;
        let now = self.ports.clock.now();
        customer.touch(actor, now);

        let old_address = customer.address_id;
        let address = new_address(request);
        customer.address_id = address.id;
        self.ports.addresses.save(address).await?;
        self.ports.customers.save(customer).await?;

        self.ports.addresses.delete(&old_address).await?;

        Ok(CustomerEvent::AddressUpdated {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Replaces the customer's contact-detail set
    ///
    /// Deletes every existing row, then inserts the provided list. A `None`
    /// or empty list clears the set. No diffing.
    #[instrument(skip(self, details, actor), fields(customer = %identifier))]
    pub async fn update_contact_details(
        &self,
        identifier: &CustomerId,
        details: Option<Vec<ContactDetail>>,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;
        let now = self.ports.clock.now();
        customer.touch(actor, now);

        self.ports.contact_details.delete_by_customer(identifier).await?;
        if let Some(details) = details {
            self.ports.contact_details.save_all(identifier, details).await?;
        }
        self.ports.customers.save(customer).await?;

        Ok(CustomerEvent::ContactDetailsUpdated {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    /// Registers an identification card for a customer
    ///
    /// Card numbers are globally unique; a second registration of the same
    /// number conflicts regardless of the owning customer.
    #[instrument(skip(self, request, actor), fields(customer = %identifier, card = %request.number))]
    pub async fn create_identification_card(
        &self,
        identifier: &CustomerId,
        request: CardRequest,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;

        if self
            .ports
            .identification_cards
            .find_by_number(&request.number)
            .await?
            .is_some()
        {
            return Err(CustomerError::conflict(format!(
                "identification card '{}' already exists",
                request.number
            )));
        }

        let now = self.ports.clock.now();
        let card = IdentificationCard {
            number: request.number.clone(),
            customer: identifier.clone(),
            card_type: request.card_type,
            issuer: request.issuer,
            expiration_date: request.expiration_date,
            created_by: actor.clone(),
            created_on: now,
            last_modified_by: None,
            last_modified_on: None,
        };
        self.ports.identification_cards.save(card).await?;

        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        Ok(CustomerEvent::IdentificationCardCreated {
            customer: identifier.clone(),
            number: request.number,
            timestamp: now,
        })
    }

    /// Overwrites an identification card's issuer, type, and expiration
    ///
    /// A missing card makes the command a silent no-op rather than an error,
    /// tolerating races with deletion.
    #[instrument(skip(self, request, actor), fields(card = %number))]
    pub async fn update_identification_card(
        &self,
        number: &CardNumber,
        request: CardRequest,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let now = self.ports.clock.now();

        match self.ports.identification_cards.find_by_number(number).await? {
            Some(mut card) => {
                card.issuer = request.issuer;
                card.card_type = request.card_type;
                card.expiration_date = request.expiration_date;
                card.touch(actor, now);
                let owner = card.customer.clone();
                self.ports.identification_cards.save(card).await?;

                let mut customer = self.customer_or_not_found(&owner).await?;
                customer.touch(actor, now);
                self.ports.customers.save(customer).await?;
            }
            None => warn!("identification card vanished before update"),
        }

        Ok(CustomerEvent::IdentificationCardUpdated {
            number: number.clone(),
            timestamp: now,
        })
    }

    /// Removes an identification card and every scan it owns
    ///
    /// Scans go first so no orphan scan can survive the card. A missing card
    /// makes the command a silent no-op.
    #[instrument(skip(self, actor), fields(card = %number))]
    pub async fn delete_identification_card(
        &self,
        number: &CardNumber,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let now = self.ports.clock.now();

        match self.ports.identification_cards.find_by_number(number).await? {
            Some(card) => {
                self.ports.card_scans.delete_by_card(number).await?;
                self.ports.identification_cards.delete(number).await?;

                let mut customer = self.customer_or_not_found(&card.customer).await?;
                customer.touch(actor, now);
                self.ports.customers.save(customer).await?;
            }
            None => warn!("identification card vanished before delete"),
        }

        Ok(CustomerEvent::IdentificationCardDeleted {
            number: number.clone(),
            timestamp: now,
        })
    }

    /// Stores a scanned image for an identification card
    ///
    /// Fails with not-found when the card does not exist. The event is keyed
    /// by customer, card number, and scan identifier.
    #[instrument(skip(self, request, image, actor), fields(card = %number, scan = %request.identifier))]
    pub async fn create_identification_card_scan(
        &self,
        number: &CardNumber,
        request: ScanRequest,
        image: ImageData,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut card = self
            .ports
            .identification_cards
            .find_by_number(number)
            .await?
            .ok_or_else(|| CustomerError::not_found("identification card", number))?;
        let owner = card.customer.clone();

        let now = self.ports.clock.now();
        let scan = IdentificationCardScan {
            identifier: request.identifier.clone(),
            card_number: number.clone(),
            description: request.description,
            size: image.size(),
            content_type: image.content_type,
            image: image.bytes,
            created_by: actor.clone(),
            created_on: now,
        };
        self.ports.card_scans.save(scan).await?;

        card.touch(actor, now);
        self.ports.identification_cards.save(card).await?;

        Ok(CustomerEvent::ScanCreated {
            customer: owner,
            number: number.clone(),
            scan: request.identifier,
            timestamp: now,
        })
    }

    /// Removes a scanned image from an identification card
    ///
    /// A missing card or scan makes the command a silent no-op. The owning
    /// customer is resolved before the delete so the event can still carry
    /// the identifier once the row is gone.
    #[instrument(skip(self, actor), fields(card = %number, scan = %scan))]
    pub async fn delete_identification_card_scan(
        &self,
        number: &CardNumber,
        scan: &ScanId,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let now = self.ports.clock.now();
        let mut owner = None;

        if let Some(mut card) = self.ports.identification_cards.find_by_number(number).await? {
            if self
                .ports
                .card_scans
                .find_by_identifier(scan, number)
                .await?
                .is_some()
            {
                owner = Some(card.customer.clone());
                self.ports.card_scans.delete(scan, number).await?;

                card.touch(actor, now);
                self.ports.identification_cards.save(card).await?;
            } else {
                warn!("scan vanished before delete");
            }
        } else {
            warn!("identification card vanished before scan delete");
        }

        Ok(CustomerEvent::ScanDeleted {
            customer: owner,
            number: number.clone(),
            scan: scan.clone(),
            timestamp: now,
        })
    }

    /// Stores the customer's portrait, replacing any prior one
    ///
    /// Returns `Ok(None)` without touching the store when no payload is
    /// supplied; "nothing to do" is not an error.
    #[instrument(skip(self, image, actor), fields(customer = %identifier))]
    pub async fn create_portrait(
        &self,
        identifier: &CustomerId,
        image: Option<ImageData>,
        actor: &Actor,
    ) -> Result<Option<CustomerEvent>, CustomerError> {
        let Some(image) = image else {
            return Ok(None);
        };

        let mut customer = self.customer_or_not_found(identifier).await?;
        let now = self.ports.clock.now();

        self.ports
            .portraits
            .save(Portrait::new(identifier.clone(), image))
            .await?;

        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        Ok(Some(CustomerEvent::PortraitCreated {
            customer: identifier.clone(),
            timestamp: now,
        }))
    }

    /// Removes the customer's portrait; deleting an absent portrait succeeds
    #[instrument(skip(self, actor), fields(customer = %identifier))]
    pub async fn delete_portrait(
        &self,
        identifier: &CustomerId,
        actor: &Actor,
    ) -> Result<CustomerEvent, CustomerError> {
        let mut customer = self.customer_or_not_found(identifier).await?;
        let now = self.ports.clock.now();

        self.ports.portraits.delete_by_customer(identifier).await?;

        customer.touch(actor, now);
        self.ports.customers.save(customer).await?;

        Ok(CustomerEvent::PortraitDeleted {
            customer: identifier.clone(),
            timestamp: now,
        })
    }

    async fn customer_or_not_found(
        &self,
        identifier: &CustomerId,
    ) -> Result<Customer, CustomerError> {
        self.ports
            .customers
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| CustomerError::not_found("customer", identifier))
    }

    async fn guard_no_open_tasks(
        &self,
        identifier: &CustomerId,
        action: CustomerAction,
    ) -> Result<(), CustomerError> {
        if self.ports.task_gate.has_open_tasks(identifier, action).await? {
            return Err(CustomerError::conflict(format!(
                "open tasks for customer '{identifier}' exist"
            )));
        }
        Ok(())
    }

    /// Validates every catalog/field reference, then writes the full set
    ///
    /// Resolution failures surface before any row is written or deleted, so
    /// a bad reference never leaves a partial set behind.
    async fn write_field_values(
        &self,
        customer: &CustomerId,
        values: Vec<FieldValue>,
        replace: bool,
    ) -> Result<(), CustomerError> {
        for value in &values {
            if !self
                .ports
                .catalogs
                .catalog_exists(&value.catalog_identifier)
                .await?
            {
                return Err(CustomerError::not_found("catalog", &value.catalog_identifier));
            }
            if !self
                .ports
                .catalogs
                .field_exists(&value.catalog_identifier, &value.field_identifier)
                .await?
            {
                return Err(CustomerError::not_found("field", &value.field_identifier));
            }
        }

        if replace {
            self.ports.field_values.delete_by_customer(customer).await?;
        }
        self.ports.field_values.save_all(customer, values).await?;
        Ok(())
    }
}

fn new_address(request: AddressRequest) -> Address {
    Address {
        id: core_kernel::AddressId::new(),
        street: request.street,
        city: request.city,
        region: request.region,
        postal_code: request.postal_code,
        country_code: request.country_code,
        country: request.country,
        latitude: request.latitude,
        longitude: request.longitude,
    }
}
