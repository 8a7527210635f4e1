//! Identification cards and scanned card images

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Actor, CardNumber, CustomerId, ScanId};

/// An identification document registered for a customer
///
/// The card number is externally assigned and globally unique across all
/// customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationCard {
    pub number: CardNumber,
    pub customer: CustomerId,
    pub card_type: String,
    pub issuer: String,
    pub expiration_date: Option<NaiveDate>,
    pub created_by: Actor,
    pub created_on: DateTime<Utc>,
    pub last_modified_by: Option<Actor>,
    pub last_modified_on: Option<DateTime<Utc>>,
}

impl IdentificationCard {
    /// Refreshes the modification stamp
    pub fn touch(&mut self, actor: &Actor, at: DateTime<Utc>) {
        self.last_modified_by = Some(actor.clone());
        self.last_modified_on = Some(at);
    }

    /// Checks whether the card has expired as of the given date
    pub fn is_expired(&self, on: NaiveDate) -> bool {
        self.expiration_date.map_or(false, |expires| expires < on)
    }
}

/// A scanned image of an identification card
///
/// Scans are owned by their card and cannot outlive it: deleting the card
/// cascades to every scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentificationCardScan {
    pub identifier: ScanId,
    pub card_number: CardNumber,
    pub description: Option<String>,
    /// Opaque image payload; no format interpretation happens here
    pub image: Vec<u8>,
    pub content_type: String,
    pub size: u64,
    pub created_by: Actor,
    pub created_on: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(expiration_date: Option<NaiveDate>) -> IdentificationCard {
        IdentificationCard {
            number: CardNumber::new("ID-1"),
            customer: CustomerId::new("cust-1"),
            card_type: "passport".to_string(),
            issuer: "Bundesdruckerei".to_string(),
            expiration_date,
            created_by: Actor::new("operator").unwrap(),
            created_on: Utc::now(),
            last_modified_by: None,
            last_modified_on: None,
        }
    }

    #[test]
    fn test_card_expiry() {
        let reference = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(card(NaiveDate::from_ymd_opt(2024, 12, 31)).is_expired(reference));
        assert!(!card(NaiveDate::from_ymd_opt(2025, 1, 1)).is_expired(reference));
        assert!(!card(None).is_expired(reference));
    }

    #[test]
    fn test_touch_sets_modification_stamp() {
        let mut card = card(None);
        let at = Utc::now();
        let auditor = Actor::new("auditor").unwrap();
        card.touch(&auditor, at);
        assert_eq!(card.last_modified_by, Some(auditor));
        assert_eq!(card.last_modified_on, Some(at));
    }
}
