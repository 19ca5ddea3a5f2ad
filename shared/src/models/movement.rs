//! Stock movement models and the stock arithmetic they drive

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::types::empty_string_as_none;

/// Kind of stock movement as it appears on the wire and in the database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// Goods received into stock
    #[serde(rename = "entree")]
    Receipt,
    /// Goods issued out of stock
    #[serde(rename = "sortie")]
    Issue,
    /// Signed correction of the current level
    #[serde(rename = "ajustement")]
    Adjustment,
    /// Physical count replacing the current level
    #[serde(rename = "inventaire")]
    Count,
}

impl MovementType {
    pub const ALL: [MovementType; 4] = [
        MovementType::Receipt,
        MovementType::Issue,
        MovementType::Adjustment,
        MovementType::Count,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Receipt => "entree",
            MovementType::Issue => "sortie",
            MovementType::Adjustment => "ajustement",
            MovementType::Count => "inventaire",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a movement type string is not one of the known kinds
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown movement type '{0}'")]
pub struct UnknownMovementType(pub String);

impl FromStr for MovementType {
    type Err = UnknownMovementType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovementType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownMovementType(s.to_string()))
    }
}

/// A movement together with the quantity it carries.
///
/// Each variant owns its interpretation of the quantity, so the stock
/// computation below is one exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Adds `|qty|` to the current level
    Receipt(i32),
    /// Removes `|qty|` from the current level
    Issue(i32),
    /// Adds the signed delta to the current level
    Adjustment(i32),
    /// Replaces the current level with `|level|`
    Count(i32),
}

/// Reasons a movement cannot be applied to a stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MovementError {
    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("stock cannot become negative: {previous} adjusted by {delta}")]
    NegativeStock { previous: i32, delta: i32 },

    #[error("quantity is out of range")]
    Overflow,
}

impl Movement {
    pub fn new(kind: MovementType, quantity: i32) -> Self {
        match kind {
            MovementType::Receipt => Movement::Receipt(quantity),
            MovementType::Issue => Movement::Issue(quantity),
            MovementType::Adjustment => Movement::Adjustment(quantity),
            MovementType::Count => Movement::Count(quantity),
        }
    }

    pub fn kind(&self) -> MovementType {
        match self {
            Movement::Receipt(_) => MovementType::Receipt,
            Movement::Issue(_) => MovementType::Issue,
            Movement::Adjustment(_) => MovementType::Adjustment,
            Movement::Count(_) => MovementType::Count,
        }
    }

    /// Quantity exactly as submitted; this is what the ledger records
    pub fn quantity(&self) -> i32 {
        match *self {
            Movement::Receipt(q) | Movement::Issue(q) | Movement::Adjustment(q) | Movement::Count(q) => q,
        }
    }

    /// Compute the stock level that results from applying this movement
    pub fn apply(&self, previous: i32) -> Result<i32, MovementError> {
        match *self {
            Movement::Receipt(qty) => previous
                .checked_add(magnitude(qty)?)
                .ok_or(MovementError::Overflow),
            Movement::Issue(qty) => {
                let requested = magnitude(qty)?;
                let new_stock = previous - requested;
                if new_stock < 0 {
                    return Err(MovementError::InsufficientStock {
                        available: previous,
                        requested,
                    });
                }
                Ok(new_stock)
            }
            Movement::Adjustment(delta) => {
                let new_stock = previous.checked_add(delta).ok_or(MovementError::Overflow)?;
                if new_stock < 0 {
                    return Err(MovementError::NegativeStock { previous, delta });
                }
                Ok(new_stock)
            }
            Movement::Count(level) => magnitude(level),
        }
    }
}

/// `|qty|`, rejecting `i32::MIN` which has no positive counterpart
fn magnitude(qty: i32) -> Result<i32, MovementError> {
    qty.checked_abs().ok_or(MovementError::Overflow)
}

/// Payload for recording a stock movement
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MovementRequest {
    #[validate(range(min = 1))]
    pub product_id: i64,

    /// Kept as text so an unknown type is reported as a domain error
    /// rather than a deserialization failure
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub movement_type: String,

    pub quantity: i32,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255))]
    pub reason: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 100))]
    pub reference: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub notes: Option<String>,
}

impl MovementRequest {
    pub fn movement(&self) -> Result<Movement, UnknownMovementType> {
        let kind: MovementType = self.movement_type.parse()?;
        Ok(Movement::new(kind, self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_round_trip_names() {
        for kind in MovementType::ALL {
            assert_eq!(kind.as_str().parse::<MovementType>(), Ok(kind));
        }
        assert!("transfert".parse::<MovementType>().is_err());
        assert!("ENTREE".parse::<MovementType>().is_err());
    }

    #[test]
    fn test_receipt_uses_absolute_quantity() {
        assert_eq!(Movement::Receipt(5).apply(3), Ok(8));
        assert_eq!(Movement::Receipt(-5).apply(3), Ok(8));
    }

    #[test]
    fn test_issue_rejects_overdraw() {
        assert_eq!(Movement::Issue(7).apply(10), Ok(3));
        assert_eq!(Movement::Issue(10).apply(10), Ok(0));
        assert_eq!(
            Movement::Issue(15).apply(10),
            Err(MovementError::InsufficientStock { available: 10, requested: 15 })
        );
    }

    #[test]
    fn test_adjustment_is_signed() {
        assert_eq!(Movement::Adjustment(-4).apply(10), Ok(6));
        assert_eq!(Movement::Adjustment(4).apply(10), Ok(14));
        assert_eq!(
            Movement::Adjustment(-11).apply(10),
            Err(MovementError::NegativeStock { previous: 10, delta: -11 })
        );
    }

    #[test]
    fn test_count_replaces_level() {
        assert_eq!(Movement::Count(42).apply(3), Ok(42));
        assert_eq!(Movement::Count(-42).apply(3), Ok(42));
        assert_eq!(Movement::Count(0).apply(3), Ok(0));
    }

    #[test]
    fn test_overflow_is_rejected() {
        assert_eq!(Movement::Receipt(i32::MIN).apply(0), Err(MovementError::Overflow));
        assert_eq!(Movement::Receipt(1).apply(i32::MAX), Err(MovementError::Overflow));
        assert_eq!(Movement::Count(i32::MIN).apply(0), Err(MovementError::Overflow));
        assert_eq!(Movement::Adjustment(i32::MAX).apply(1), Err(MovementError::Overflow));
    }

    #[test]
    fn test_quantity_is_preserved_as_submitted() {
        assert_eq!(Movement::new(MovementType::Receipt, -5).quantity(), -5);
        assert_eq!(Movement::new(MovementType::Count, 12).kind(), MovementType::Count);
    }

    #[test]
    fn test_request_parses_wire_type() {
        let request: MovementRequest = serde_json::from_str(
            r#"{"product_id": 1, "type": "sortie", "quantity": 7, "reason": ""}"#,
        )
        .unwrap();
        assert_eq!(request.movement(), Ok(Movement::Issue(7)));
        assert_eq!(request.reason, None);

        let request: MovementRequest = serde_json::from_str(
            r#"{"product_id": 1, "type": "transfer", "quantity": 7}"#,
        )
        .unwrap();
        assert_eq!(request.movement(), Err(UnknownMovementType("transfer".to_string())));
    }

    #[test]
    fn test_request_validation() {
        let request = MovementRequest {
            product_id: 0,
            movement_type: "entree".to_string(),
            quantity: 1,
            reason: None,
            reference: None,
            notes: None,
        };
        assert!(request.validate().is_err());
    }
}
