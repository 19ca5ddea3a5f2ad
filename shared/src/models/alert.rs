//! Stock alert models and the policy that raises them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of alert attached to a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertType {
    /// Stock is at or below the product's minimum
    #[serde(rename = "stock_faible")]
    LowStock,
    /// Stock reached zero
    #[serde(rename = "rupture")]
    OutOfStock,
    /// Goods approaching their expiry date
    #[serde(rename = "peremption")]
    Expiry,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::LowStock => "stock_faible",
            AlertType::OutOfStock => "rupture",
            AlertType::Expiry => "peremption",
        }
    }

    /// Alert to raise for a product whose stock just became `stock`.
    ///
    /// Zero stock is reported as out-of-stock even when `min_stock` is zero;
    /// any other level at or below the minimum is low stock.
    pub fn for_stock_level(stock: i32, min_stock: i32) -> Option<AlertType> {
        if stock == 0 {
            Some(AlertType::OutOfStock)
        } else if stock <= min_stock {
            Some(AlertType::LowStock)
        } else {
            None
        }
    }

    /// Message stored with the alert, in French like the rest of the stored data
    pub fn message(&self, product_name: &str, stock: i32) -> String {
        match self {
            AlertType::LowStock => format!("Stock faible pour {product_name}: {stock} restant(s)"),
            AlertType::OutOfStock => format!("Rupture de stock pour {product_name}"),
            AlertType::Expiry => format!("Péremption proche pour {product_name}"),
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock_faible" => Ok(AlertType::LowStock),
            "rupture" => Ok(AlertType::OutOfStock),
            "peremption" => Ok(AlertType::Expiry),
            other => Err(format!("unknown alert type '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_policy() {
        assert_eq!(AlertType::for_stock_level(0, 5), Some(AlertType::OutOfStock));
        assert_eq!(AlertType::for_stock_level(0, 0), Some(AlertType::OutOfStock));
        assert_eq!(AlertType::for_stock_level(3, 5), Some(AlertType::LowStock));
        assert_eq!(AlertType::for_stock_level(5, 5), Some(AlertType::LowStock));
        assert_eq!(AlertType::for_stock_level(6, 5), None);
        assert_eq!(AlertType::for_stock_level(8, 5), None);
    }

    #[test]
    fn test_alert_messages() {
        assert_eq!(
            AlertType::LowStock.message("HDMI cable", 3),
            "Stock faible pour HDMI cable: 3 restant(s)"
        );
        assert_eq!(
            AlertType::OutOfStock.message("AA battery", 0),
            "Rupture de stock pour AA battery"
        );
    }

    #[test]
    fn test_alert_type_wire_names() {
        assert_eq!(serde_json::to_string(&AlertType::LowStock).unwrap(), "\"stock_faible\"");
        assert_eq!("rupture".parse::<AlertType>(), Ok(AlertType::OutOfStock));
        assert!("low".parse::<AlertType>().is_err());
    }
}
