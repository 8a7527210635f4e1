//! Dynamic custom field values

use serde::{Deserialize, Serialize};

use core_kernel::{CatalogId, FieldId};

/// A custom field value keyed by its catalog/field schema entry
///
/// Field values are multi-valued under a customer with full-replace update
/// semantics, the same as contact details. Both referenced identifiers must
/// resolve against the catalog registry before any row is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub catalog_identifier: CatalogId,
    pub field_identifier: FieldId,
    pub value: String,
}

impl FieldValue {
    pub fn new(
        catalog_identifier: impl Into<CatalogId>,
        field_identifier: impl Into<FieldId>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            catalog_identifier: catalog_identifier.into(),
            field_identifier: field_identifier.into(),
            value: value.into(),
        }
    }
}
