//! Validation utilities for the Stock Management Platform
//!
//! Field-level rules are declared with `validator` derives on the request
//! types in [`crate::models`]; the helpers here cover what the derives cannot
//! express and turn validation failures into a single user-facing message.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

/// Minimum password length accepted at registration and password change
pub const MIN_PASSWORD_LENGTH: usize = 6;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

// ============================================================================
// Field validators (used from `#[validate(custom = ...)]`)
// ============================================================================

/// Prices can be zero but never negative
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(error("price", "Price cannot be negative"));
    }
    Ok(())
}

/// SKUs are free-form but must not contain whitespace
pub fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    if sku.chars().count() < 2 {
        return Err(error("sku", "SKU must be at least 2 characters"));
    }
    if sku.chars().any(char::is_whitespace) {
        return Err(error("sku", "SKU cannot contain whitespace"));
    }
    Ok(())
}

/// Minimum stock threshold must not exceed the maximum
pub fn validate_stock_bounds(min_stock: i32, max_stock: i32) -> Result<(), ValidationError> {
    if min_stock > max_stock {
        return Err(error(
            "stock_bounds",
            "Minimum stock cannot be greater than maximum stock",
        ));
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format");
    };
    if local.is_empty() || !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.')
    {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

// ============================================================================
// Error reporting
// ============================================================================

/// Reduce a set of validation errors to the first failing field and a message.
///
/// Fields are visited in name order so the same payload always reports the
/// same field. Struct-level errors are reported under `"__all__"`.
pub fn first_validation_error(errors: &ValidationErrors) -> (String, String) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by_key(|(name, _)| **name);

    for (field, kind) in fields {
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    return (field.to_string(), describe(field, err));
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                let (inner, message) = first_validation_error(nested);
                return (format!("{field}.{inner}"), message);
            }
            ValidationErrorsKind::List(items) => {
                if let Some((index, nested)) = items.iter().next() {
                    let (inner, message) = first_validation_error(nested);
                    return (format!("{field}[{index}].{inner}"), message);
                }
            }
        }
    }

    ("__all__".to_string(), "Invalid input".to_string())
}

fn describe(field: &str, err: &ValidationError) -> String {
    if let Some(message) = &err.message {
        return message.to_string();
    }
    match &*err.code {
        "email" => format!("{field} must be a valid email address"),
        "url" => format!("{field} must be a valid URL"),
        "length" => match (err.params.get("min"), err.params.get("max")) {
            (Some(min), Some(max)) => format!("{field} must be between {min} and {max} characters"),
            (Some(min), None) => format!("{field} must be at least {min} characters"),
            (None, Some(max)) => format!("{field} must be at most {max} characters"),
            (None, None) => format!("{field} has an invalid length"),
        },
        "range" => match (err.params.get("min"), err.params.get("max")) {
            (Some(min), Some(max)) => format!("{field} must be between {min} and {max}"),
            (Some(min), None) => format!("{field} must be at least {min}"),
            (None, Some(max)) => format!("{field} must be at most {max}"),
            (None, None) => format!("{field} is out of range"),
        },
        code => format!("{field} is invalid ({code})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Decimal::ZERO).is_ok());
        assert!(validate_price(&Decimal::from_str("12.50").unwrap()).is_ok());
        assert!(validate_price(&Decimal::from_str("-0.01").unwrap()).is_err());
        // negative zero is still zero
        assert!(validate_price(&Decimal::from_str("-0.00").unwrap()).is_ok());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("DELL-LAP-001").is_ok());
        assert!(validate_sku("AB").is_ok());
        assert!(validate_sku("A").is_err());
        assert!(validate_sku("AB 12").is_err());
    }

    #[test]
    fn test_validate_stock_bounds() {
        assert!(validate_stock_bounds(0, 1).is_ok());
        assert!(validate_stock_bounds(5, 5).is_ok());
        assert!(validate_stock_bounds(10, 5).is_err());
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("admin@stockapp.com").is_ok());
        assert!(validate_email("jean.dupont@entreprise.co.fr").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@domain.com").is_err());
        assert!(validate_email("user@.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_first_validation_error_is_deterministic() {
        let mut errors = ValidationErrors::new();
        errors.add("sku", error("sku", "SKU must be at least 2 characters"));
        errors.add("name", ValidationError::new("length"));

        let (field, message) = first_validation_error(&errors);
        assert_eq!(field, "name");
        assert_eq!(message, "name has an invalid length");
    }

    #[test]
    fn test_first_validation_error_uses_custom_message() {
        let mut errors = ValidationErrors::new();
        errors.add("purchase_price", error("price", "Price cannot be negative"));

        let (field, message) = first_validation_error(&errors);
        assert_eq!(field, "purchase_price");
        assert_eq!(message, "Price cannot be negative");
    }
}
