//! Customer portrait image

use serde::{Deserialize, Serialize};

use core_kernel::CustomerId;

/// An opaque image payload with its declared content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageData {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageData {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// Declared payload size in bytes
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// The single portrait image of a customer
///
/// At most one row per customer: creation upserts, deletion is idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Portrait {
    pub customer: CustomerId,
    pub image: Vec<u8>,
    pub content_type: String,
    pub size: u64,
}

impl Portrait {
    /// Builds the portrait row for a customer from an inbound payload
    pub fn new(customer: CustomerId, image: ImageData) -> Self {
        Self {
            customer,
            size: image.size(),
            content_type: image.content_type,
            image: image.bytes,
        }
    }
}
