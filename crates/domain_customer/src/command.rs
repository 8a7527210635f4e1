//! Command payloads and the command log
//!
//! Commands arrive already validated by the upstream dispatcher (the
//! `validator` derives below are its checklist); the aggregate only re-checks
//! what could corrupt the graph. Executed state-changing commands leave an
//! immutable [`CommandLogEntry`] behind.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use core_kernel::{Actor, CardNumber, CommandId, CustomerId, ScanId};

use crate::customer::ContactDetail;
use crate::fields::FieldValue;

/// Action names recorded in the command log and used as task kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerAction {
    Activate,
    Lock,
    Unlock,
    Close,
    Reopen,
}

impl CustomerAction {
    /// Returns the wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerAction::Activate => "ACTIVATE",
            CustomerAction::Lock => "LOCK",
            CustomerAction::Unlock => "UNLOCK",
            CustomerAction::Close => "CLOSE",
            CustomerAction::Reopen => "REOPEN",
        }
    }
}

impl fmt::Display for CustomerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full customer representation accepted by create and update
///
/// Update semantics are full replace: an absent optional field clears the
/// stored value rather than leaving it untouched. `application_date` is
/// honored on create and never overwritten by update.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomerRequest {
    pub identifier: CustomerId,
    #[validate(length(min = 1))]
    pub given_name: String,
    pub middle_name: Option<String>,
    #[validate(length(min = 1))]
    pub surname: String,
    pub date_of_birth: Option<NaiveDate>,
    pub account_beneficiary: Option<String>,
    pub reference_customer: Option<CustomerId>,
    pub assigned_office: Option<String>,
    pub assigned_employee: Option<String>,
    pub application_date: Option<NaiveDate>,
    /// Required on create; triggers the address replace flow on update
    #[validate(nested)]
    pub address: Option<AddressRequest>,
    pub contact_details: Option<Vec<ContactDetail>>,
    pub custom_values: Option<Vec<FieldValue>>,
}

/// Inbound address payload; the store assigns the row identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AddressRequest {
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    pub region: Option<String>,
    #[validate(length(min = 1))]
    pub postal_code: String,
    pub country_code: Option<String>,
    #[validate(length(min = 1))]
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Inbound identification-card payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CardRequest {
    pub number: CardNumber,
    #[validate(length(min = 1))]
    pub card_type: String,
    pub issuer: String,
    pub expiration_date: Option<NaiveDate>,
}

/// Inbound scan metadata; the image payload travels separately
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    pub identifier: ScanId,
    pub description: Option<String>,
}

/// Immutable record of an executed state-changing command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandLogEntry {
    pub id: CommandId,
    pub customer: CustomerId,
    pub action: CustomerAction,
    pub comment: Option<String>,
    pub created_by: Actor,
    pub created_on: DateTime<Utc>,
}

impl CommandLogEntry {
    /// Builds the log entry for a transition command
    pub fn record(
        customer: CustomerId,
        action: CustomerAction,
        comment: Option<String>,
        actor: &Actor,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: CommandId::new(),
            customer,
            action,
            comment,
            created_by: actor.clone(),
            created_on: at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_request() -> AddressRequest {
        AddressRequest {
            street: "Wilhelmstrasse 12".to_string(),
            city: "Berlin".to_string(),
            region: None,
            postal_code: "10963".to_string(),
            country_code: Some("DE".to_string()),
            country: "Germany".to_string(),
            latitude: Some(52.507),
            longitude: Some(13.383),
        }
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(CustomerAction::Activate.as_str(), "ACTIVATE");
        assert_eq!(CustomerAction::Reopen.to_string(), "REOPEN");
        let json = serde_json::to_string(&CustomerAction::Unlock).unwrap();
        assert_eq!(json, "\"UNLOCK\"");
    }

    #[test]
    fn test_request_validation_flags_blank_names() {
        let request = CustomerRequest {
            identifier: CustomerId::new("cust-1"),
            given_name: String::new(),
            middle_name: None,
            surname: "Doe".to_string(),
            date_of_birth: None,
            account_beneficiary: None,
            reference_customer: None,
            assigned_office: None,
            assigned_employee: None,
            application_date: None,
            address: Some(address_request()),
            contact_details: None,
            custom_values: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_nested_address_is_validated() {
        let mut address = address_request();
        address.city = String::new();
        assert!(address.validate().is_err());
    }
}
