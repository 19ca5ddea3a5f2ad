//! Read-only dashboard aggregates

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::stock::{MovementWithDetails, MOVEMENT_WITH_DETAILS};

/// Longest chart window, in days
pub const MAX_CHART_PERIOD_DAYS: i32 = 365;
pub const DEFAULT_CHART_PERIOD_DAYS: i32 = 30;

/// Dashboard service
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub overview: Overview,
    /// Movement count per type over the last 7 days
    pub recent_movements: BTreeMap<String, i64>,
    pub top_products: Vec<TopProduct>,
    pub stock_by_category: Vec<CategoryStock>,
    pub recent_activity: Vec<MovementWithDetails>,
}

#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_products: i64,
    pub total_suppliers: i64,
    pub low_stock_products: i64,
    pub unread_alerts: i64,
    pub total_stock_value: Decimal,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopProduct {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub total_sold: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategoryStock {
    pub category: String,
    pub product_count: i64,
    pub total_stock: i64,
    pub total_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub period_days: i32,
    pub movements: Vec<MovementPoint>,
    pub categories: Vec<CategoryValue>,
    pub stock_value: Vec<StockValuePoint>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct MovementPoint {
    pub date: NaiveDate,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement_type: String,
    pub count: i64,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategoryValue {
    pub category: String,
    pub value: Decimal,
    pub product_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StockValuePoint {
    pub date: NaiveDate,
    pub value_change: Decimal,
}

/// Label used for products without a category
const UNCATEGORIZED: &str = "Uncategorized";

impl DashboardService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let overview = sqlx::query_as::<_, Overview>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM products WHERE is_active = true) AS total_products,
                (SELECT COUNT(*) FROM suppliers WHERE is_active = true) AS total_suppliers,
                (SELECT COUNT(*) FROM products
                  WHERE is_active = true AND current_stock <= min_stock) AS low_stock_products,
                (SELECT COUNT(*) FROM alerts a JOIN products p ON p.id = a.product_id
                  WHERE a.is_read = false AND p.is_active = true) AS unread_alerts,
                (SELECT COALESCE(SUM(current_stock * purchase_price), 0)
                   FROM products WHERE is_active = true) AS total_stock_value
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let recent_movements: BTreeMap<String, i64> = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT type, COUNT(*)
            FROM stock_movements
            WHERE created_at >= NOW() - INTERVAL '7 days'
            GROUP BY type
            "#,
        )
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .collect();

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT p.id, p.name, p.sku, SUM(ABS(sm.quantity))::BIGINT AS total_sold
            FROM stock_movements sm
            JOIN products p ON p.id = sm.product_id
            WHERE sm.type = 'sortie'
              AND sm.created_at >= DATE_TRUNC('month', NOW())
              AND p.is_active = true
            GROUP BY p.id, p.name, p.sku
            ORDER BY total_sold DESC, p.name
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let stock_by_category = sqlx::query_as::<_, CategoryStock>(
            r#"
            SELECT
                COALESCE(NULLIF(category, ''), $1) AS category,
                COUNT(*) AS product_count,
                COALESCE(SUM(current_stock), 0)::BIGINT AS total_stock,
                COALESCE(SUM(current_stock * purchase_price), 0) AS total_value
            FROM products
            WHERE is_active = true
            GROUP BY 1
            ORDER BY total_value DESC, 1
            "#,
        )
        .bind(UNCATEGORIZED)
        .fetch_all(&self.db)
        .await?;

        let recent_activity = sqlx::query_as::<_, MovementWithDetails>(&format!(
            "{MOVEMENT_WITH_DETAILS} ORDER BY sm.created_at DESC, sm.id DESC LIMIT 10"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(DashboardStats {
            overview,
            recent_movements,
            top_products,
            stock_by_category,
            recent_activity,
        })
    }

    /// Chart series over the last `period_days` days
    pub async fn charts(&self, period_days: i32) -> AppResult<DashboardCharts> {
        let period_days = validate_period(period_days)?;

        let movements = sqlx::query_as::<_, MovementPoint>(
            r#"
            SELECT
                DATE(created_at) AS date,
                type,
                COUNT(*) AS count,
                SUM(ABS(quantity))::BIGINT AS total_quantity
            FROM stock_movements
            WHERE created_at >= NOW() - make_interval(days => $1)
            GROUP BY DATE(created_at), type
            ORDER BY date DESC, type
            "#,
        )
        .bind(period_days)
        .fetch_all(&self.db)
        .await?;

        let categories = sqlx::query_as::<_, CategoryValue>(
            r#"
            SELECT
                COALESCE(NULLIF(category, ''), $1) AS category,
                COALESCE(SUM(current_stock * purchase_price), 0) AS value,
                COUNT(*) AS product_count
            FROM products
            WHERE is_active = true AND current_stock > 0
            GROUP BY 1
            ORDER BY value DESC, 1
            "#,
        )
        .bind(UNCATEGORIZED)
        .fetch_all(&self.db)
        .await?;

        // Level deltas priced at the current purchase price
        let stock_value = sqlx::query_as::<_, StockValuePoint>(
            r#"
            SELECT
                DATE(sm.created_at) AS date,
                COALESCE(SUM((sm.new_stock - sm.previous_stock) * p.purchase_price), 0) AS value_change
            FROM stock_movements sm
            JOIN products p ON p.id = sm.product_id
            WHERE sm.created_at >= NOW() - make_interval(days => $1)
            GROUP BY DATE(sm.created_at)
            ORDER BY date ASC
            "#,
        )
        .bind(period_days)
        .fetch_all(&self.db)
        .await?;

        Ok(DashboardCharts {
            period_days,
            movements,
            categories,
            stock_value,
        })
    }
}

pub fn validate_period(period_days: i32) -> AppResult<i32> {
    if !(1..=MAX_CHART_PERIOD_DAYS).contains(&period_days) {
        return Err(AppError::Validation {
            field: "period".to_string(),
            message: format!("period must be between 1 and {} days", MAX_CHART_PERIOD_DAYS),
            message_fr: format!(
                "La période doit être comprise entre 1 et {} jours",
                MAX_CHART_PERIOD_DAYS
            ),
        });
    }
    Ok(period_days)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_bounds() {
        assert_eq!(validate_period(1).unwrap(), 1);
        assert_eq!(validate_period(DEFAULT_CHART_PERIOD_DAYS).unwrap(), 30);
        assert_eq!(validate_period(365).unwrap(), 365);
        assert!(validate_period(0).is_err());
        assert!(validate_period(-7).is_err());
        assert!(validate_period(366).is_err());
    }
}
