//! Stock alerts: listing and acknowledgement

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use shared::AlertType;

/// Alert service
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

/// Alert row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Alert {
    pub id: i64,
    pub product_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Alert joined with the state of its product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AlertWithProduct {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub alert: Alert,
    pub product_name: String,
    pub sku: String,
    pub current_stock: i32,
    pub min_stock: i32,
}

const ALERT_WITH_PRODUCT: &str = r#"
    SELECT a.id, a.product_id, a.type, a.message, a.is_read, a.created_at,
           p.name AS product_name, p.sku, p.current_stock, p.min_stock
    FROM alerts a
    JOIN products p ON p.id = a.product_id
    WHERE p.is_active = true
"#;

impl AlertService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Alerts of active products, newest first, optionally filtered by read state
    pub async fn list(&self, is_read: Option<bool>) -> AppResult<Vec<AlertWithProduct>> {
        let alerts = sqlx::query_as::<_, AlertWithProduct>(&format!(
            "{ALERT_WITH_PRODUCT} AND ($1::BOOLEAN IS NULL OR a.is_read = $1) \
             ORDER BY a.created_at DESC, a.id DESC"
        ))
        .bind(is_read)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Most recent unread alerts
    pub async fn recent_unread(&self, limit: i64) -> AppResult<Vec<AlertWithProduct>> {
        let alerts = sqlx::query_as::<_, AlertWithProduct>(&format!(
            "{ALERT_WITH_PRODUCT} AND a.is_read = false \
             ORDER BY a.created_at DESC, a.id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Acknowledge an alert; marking an already read alert is a no-op
    pub async fn mark_read(&self, alert_id: i64) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts SET is_read = true
            WHERE id = $1
            RETURNING id, product_id, type, message, is_read, created_at
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))
    }
}

/// Append an alert on the caller's connection or transaction
pub async fn insert_alert(
    conn: &mut PgConnection,
    product_id: i64,
    alert_type: AlertType,
    message: &str,
) -> AppResult<Alert> {
    let alert = sqlx::query_as::<_, Alert>(
        r#"
        INSERT INTO alerts (product_id, type, message)
        VALUES ($1, $2, $3)
        RETURNING id, product_id, type, message, is_read, created_at
        "#,
    )
    .bind(product_id)
    .bind(alert_type.as_str())
    .bind(message)
    .fetch_one(conn)
    .await?;

    tracing::warn!(product_id, alert_type = %alert_type, "{}", message);
    Ok(alert)
}
