//! Supplier payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::empty_string_as_none;

/// Payload for creating or updating a supplier
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SupplierInput {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub contact_person: Option<String>,
}
