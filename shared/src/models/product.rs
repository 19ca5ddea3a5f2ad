//! Product catalog payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::types::empty_string_as_none;
use crate::validation::{validate_price, validate_sku, validate_stock_bounds};

pub const DEFAULT_UNIT: &str = "piece";
pub const DEFAULT_MAX_STOCK: i32 = 1000;

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_max_stock() -> i32 {
    DEFAULT_MAX_STOCK
}

/// Payload for creating a product
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_create_bounds", skip_on_field_errors = false))]
pub struct CreateProductInput {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(custom = "validate_sku", length(max = 100))]
    pub sku: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    #[serde(default)]
    #[validate(custom = "validate_price")]
    pub purchase_price: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_price")]
    pub selling_price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_stock: i32,
    #[serde(default = "default_max_stock")]
    #[validate(range(min = 1))]
    pub max_stock: i32,
    /// Opening stock level; afterwards only stock movements change it
    #[serde(default)]
    #[validate(range(min = 0))]
    pub current_stock: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url, length(max = 500))]
    pub image_url: Option<String>,
    pub supplier_id: Option<i64>,
}

/// Payload for updating a product.
///
/// There is deliberately no `current_stock`: stock levels move only through
/// the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_bounds", skip_on_field_errors = false))]
pub struct UpdateProductInput {
    #[validate(length(min = 2, max = 255))]
    pub name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub description: Option<String>,
    #[validate(custom = "validate_sku", length(max = 100))]
    pub sku: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default = "default_unit")]
    #[validate(length(min = 1, max = 50))]
    pub unit: String,
    #[serde(default)]
    #[validate(custom = "validate_price")]
    pub purchase_price: Decimal,
    #[serde(default)]
    #[validate(custom = "validate_price")]
    pub selling_price: Decimal,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub min_stock: i32,
    #[serde(default = "default_max_stock")]
    #[validate(range(min = 1))]
    pub max_stock: i32,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(url, length(max = 500))]
    pub image_url: Option<String>,
    pub supplier_id: Option<i64>,
}

fn validate_create_bounds(input: &CreateProductInput) -> Result<(), ValidationError> {
    validate_stock_bounds(input.min_stock, input.max_stock)
}

fn validate_update_bounds(input: &UpdateProductInput) -> Result<(), ValidationError> {
    validate_stock_bounds(input.min_stock, input.max_stock)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> CreateProductInput {
        serde_json::from_str(r#"{"name": "HDMI cable", "sku": "HDMI-2M-015"}"#).unwrap()
    }

    #[test]
    fn test_create_defaults() {
        let input = minimal();
        assert_eq!(input.unit, DEFAULT_UNIT);
        assert_eq!(input.max_stock, DEFAULT_MAX_STOCK);
        assert_eq!(input.min_stock, 0);
        assert_eq!(input.current_stock, 0);
        assert_eq!(input.purchase_price, Decimal::ZERO);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_create_rejects_negative_values() {
        let mut input = minimal();
        input.current_stock = -1;
        assert!(input.validate().is_err());

        let mut input = minimal();
        input.purchase_price = Decimal::new(-100, 2);
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("purchase_price"));
    }

    #[test]
    fn test_min_stock_cannot_exceed_max_stock() {
        let mut input = minimal();
        input.min_stock = 50;
        input.max_stock = 10;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_blank_optional_fields_are_dropped() {
        let input: CreateProductInput = serde_json::from_str(
            r#"{"name": "Mouse", "sku": "LOG-MX-002", "image_url": "", "category": ""}"#,
        )
        .unwrap();
        assert_eq!(input.image_url, None);
        assert_eq!(input.category, None);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_update_ignores_current_stock() {
        let input: UpdateProductInput = serde_json::from_str(
            r#"{"name": "Mouse", "sku": "LOG-MX-002", "current_stock": 999}"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());
    }
}
