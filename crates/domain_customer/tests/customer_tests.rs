//! Tests for customer entities, commands, and events

use chrono::{NaiveDate, TimeZone, Utc};

use core_kernel::{Actor, AddressId, CardNumber, CustomerId, ScanId};

use domain_customer::{
    CommandLogEntry, ContactDetail, ContactType, Customer, CustomerAction, CustomerEvent,
    CustomerState, ImageData, Portrait,
};

fn operator() -> Actor {
    Actor::new("operator").unwrap()
}

fn sample_customer() -> Customer {
    Customer {
        identifier: CustomerId::new("cust-1"),
        given_name: "Ada".to_string(),
        middle_name: Some("Augusta".to_string()),
        surname: "Lovelace".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10),
        account_beneficiary: None,
        reference_customer: None,
        assigned_office: None,
        assigned_employee: None,
        state: CustomerState::Pending,
        application_date: None,
        address_id: AddressId::new(),
        created_by: operator(),
        created_on: Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap(),
        last_modified_by: None,
        last_modified_on: None,
    }
}

mod customer_tests {
    use super::*;

    #[test]
    fn test_full_name_includes_middle_name() {
        let customer = sample_customer();
        assert_eq!(customer.full_name(), "Ada Augusta Lovelace");

        let mut customer = sample_customer();
        customer.middle_name = None;
        assert_eq!(customer.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_touch_updates_only_modification_stamp() {
        let mut customer = sample_customer();
        let created_on = customer.created_on;
        let at = Utc.with_ymd_and_hms(2024, 5, 11, 8, 0, 0).unwrap();

        customer.touch(&Actor::new("auditor").unwrap(), at);

        assert_eq!(customer.created_on, created_on);
        assert_eq!(customer.created_by, operator());
        assert_eq!(customer.last_modified_on, Some(at));
        assert_eq!(
            customer.last_modified_by,
            Some(Actor::new("auditor").unwrap())
        );
    }

    #[test]
    fn test_customer_round_trips_through_json() {
        let customer = sample_customer();
        let json = serde_json::to_string(&customer).unwrap();
        let back: Customer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, customer);
        assert!(json.contains("\"PENDING\""));
    }

    #[test]
    fn test_contact_detail_serde_wire_names() {
        let detail = ContactDetail {
            contact_type: ContactType::Mobile,
            value: "+49 151 0000000".to_string(),
            preference_level: 1,
        };
        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"MOBILE\""));
    }
}

mod command_tests {
    use super::*;

    #[test]
    fn test_command_log_entry_records_actor_and_comment() {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        let entry = CommandLogEntry::record(
            CustomerId::new("cust-1"),
            CustomerAction::Lock,
            Some("fraud review".to_string()),
            &operator(),
            at,
        );

        assert_eq!(entry.customer, CustomerId::new("cust-1"));
        assert_eq!(entry.action, CustomerAction::Lock);
        assert_eq!(entry.comment.as_deref(), Some("fraud review"));
        assert_eq!(entry.created_by, operator());
        assert_eq!(entry.created_on, at);
    }

    #[test]
    fn test_entries_get_distinct_ids() {
        let at = Utc::now();
        let first = CommandLogEntry::record(
            CustomerId::new("cust-1"),
            CustomerAction::Close,
            None,
            &operator(),
            at,
        );
        let second = CommandLogEntry::record(
            CustomerId::new("cust-1"),
            CustomerAction::Close,
            None,
            &operator(),
            at,
        );
        assert_ne!(first.id, second.id);
    }
}

mod event_tests {
    use super::*;

    #[test]
    fn test_events_expose_customer_and_type() {
        let timestamp = Utc::now();
        let event = CustomerEvent::Activated {
            customer: CustomerId::new("cust-1"),
            timestamp,
        };
        assert_eq!(event.customer_identifier(), Some(&CustomerId::new("cust-1")));
        assert_eq!(event.event_type(), "CustomerActivated");
        assert_eq!(event.timestamp(), timestamp);
    }

    #[test]
    fn test_card_keyed_events_may_not_know_the_customer() {
        let event = CustomerEvent::IdentificationCardDeleted {
            number: CardNumber::new("ID-1"),
            timestamp: Utc::now(),
        };
        assert!(event.customer_identifier().is_none());

        let event = CustomerEvent::ScanDeleted {
            customer: None,
            number: CardNumber::new("ID-1"),
            scan: ScanId::new("front"),
            timestamp: Utc::now(),
        };
        assert!(event.customer_identifier().is_none());
    }

    #[test]
    fn test_events_round_trip_through_json() {
        let event = CustomerEvent::ScanCreated {
            customer: CustomerId::new("cust-1"),
            number: CardNumber::new("ID-1"),
            scan: ScanId::new("front"),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CustomerEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}

mod portrait_tests {
    use super::*;

    #[test]
    fn test_portrait_takes_size_from_payload() {
        let portrait = Portrait::new(
            CustomerId::new("cust-1"),
            ImageData::new(vec![1, 2, 3, 4, 5], "image/png"),
        );
        assert_eq!(portrait.size, 5);
        assert_eq!(portrait.image.len(), 5);
    }
}
