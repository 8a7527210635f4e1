//! Customer entity and lifecycle states
//!
//! The customer is the aggregate root of the graph. Sub-entities reference it
//! by identifier; the customer references its single current address by
//! ownership key rather than a live object, so the graph stays acyclic.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Actor, AddressId, CustomerId};

/// Customer lifecycle states
///
/// `Pending` is the only initial state. No state is terminal: a closed
/// customer can be reopened. Transitions outside the machine below are
/// rejected before any write:
///
/// ```text
/// Pending --activate--> Active --lock--> Locked --unlock--> Active
///                       Active/Locked --close--> Closed --reopen--> Active
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CustomerState {
    Pending,
    Active,
    Locked,
    Closed,
}

impl CustomerState {
    /// Returns the wire name of the state
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerState::Pending => "PENDING",
            CustomerState::Active => "ACTIVE",
            CustomerState::Locked => "LOCKED",
            CustomerState::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for CustomerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact channel kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactType {
    Email,
    Phone,
    Mobile,
}

/// A single contact channel with its preference ranking
///
/// Contact details are multi-valued under a customer and always replaced as
/// a full set; there is no per-row update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetail {
    pub contact_type: ContactType,
    pub value: String,
    /// Lower values are preferred when several channels of one kind exist
    pub preference_level: i32,
}

/// A customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Caller-supplied identifier, unique and immutable
    pub identifier: CustomerId,
    pub given_name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub date_of_birth: Option<NaiveDate>,
    pub account_beneficiary: Option<String>,
    pub reference_customer: Option<CustomerId>,
    pub assigned_office: Option<String>,
    pub assigned_employee: Option<String>,
    pub state: CustomerState,
    pub application_date: Option<NaiveDate>,
    /// The single current address (ownership key, replace-on-update)
    pub address_id: AddressId,
    pub created_by: Actor,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: Option<Actor>,
    pub last_modified_on: Option<DateTime<Utc>>,
}

impl Customer {
    /// Refreshes the modification stamp
    ///
    /// Every mutation of the customer or one of its sub-entities calls this
    /// inside the same unit of work as the mutation itself.
    pub fn touch(&mut self, actor: &Actor, at: DateTime<Utc>) {
        self.last_modified_by = Some(actor.clone());
        self.last_modified_on = Some(at);
    }

    /// Returns the full name in "Given Middle Surname" format
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.given_name, middle, self.surname),
            None => format!("{} {}", self.given_name, self.surname),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_names() {
        assert_eq!(CustomerState::Pending.as_str(), "PENDING");
        assert_eq!(CustomerState::Closed.to_string(), "CLOSED");
    }

    #[test]
    fn test_state_serde_uses_wire_names() {
        let json = serde_json::to_string(&CustomerState::Locked).unwrap();
        assert_eq!(json, "\"LOCKED\"");
    }
}
