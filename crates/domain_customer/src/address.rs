//! Postal address value entity

use serde::{Deserialize, Serialize};

use core_kernel::AddressId;

/// A postal address owned by exactly one customer at a time
///
/// Addresses are never edited in place. An update writes a new row, attaches
/// it to the customer, and removes the old row only after the customer points
/// at the new one, so a reader never observes a half-written address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub street: String,
    pub city: String,
    pub region: Option<String>,
    pub postal_code: String,
    pub country_code: Option<String>,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
