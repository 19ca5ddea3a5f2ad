//! Stock movement service: recording through the ledger and movement history

use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::services::ledger::{MovementCommand, MovementOutcome, PgLedger, StockMovement};
use shared::{MovementRequest, MovementType, PaginatedResponse, Pagination};

/// Stock service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// Movement joined with its product and the user who recorded it
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovementWithDetails {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movement: StockMovement,
    pub product_name: String,
    pub sku: String,
    pub first_name: String,
    pub last_name: String,
}

pub(crate) const MOVEMENT_WITH_DETAILS: &str = r#"
    SELECT sm.id, sm.product_id, sm.user_id, sm.type, sm.quantity, sm.previous_stock,
           sm.new_stock, sm.reason, sm.reference, sm.notes, sm.created_at,
           p.name AS product_name, p.sku, u.first_name, u.last_name
    FROM stock_movements sm
    JOIN products p ON p.id = sm.product_id
    JOIN users u ON u.id = sm.user_id
"#;

impl StockService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a movement on behalf of `user_id`
    pub async fn record_movement(
        &self,
        user_id: i64,
        request: MovementRequest,
    ) -> AppResult<MovementOutcome> {
        let movement = request.movement()?;

        PgLedger::record(
            &self.db,
            MovementCommand {
                product_id: request.product_id,
                user_id,
                movement,
                reason: request.reason,
                reference: request.reference,
                notes: request.notes,
            },
        )
        .await
    }

    /// Movement history, newest first
    pub async fn list_movements(
        &self,
        pagination: Pagination,
        product_id: Option<i64>,
        movement_type: Option<MovementType>,
    ) -> AppResult<PaginatedResponse<MovementWithDetails>> {
        let movement_type = movement_type.map(|t| t.as_str());

        let movements = sqlx::query_as::<_, MovementWithDetails>(&format!(
            r#"
            {MOVEMENT_WITH_DETAILS}
            WHERE ($1::BIGINT IS NULL OR sm.product_id = $1)
              AND ($2::TEXT IS NULL OR sm.type = $2)
            ORDER BY sm.created_at DESC, sm.id DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(product_id)
        .bind(movement_type)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM stock_movements sm
            WHERE ($1::BIGINT IS NULL OR sm.product_id = $1)
              AND ($2::TEXT IS NULL OR sm.type = $2)
            "#,
        )
        .bind(product_id)
        .bind(movement_type)
        .fetch_one(&self.db)
        .await?;

        Ok(PaginatedResponse::new(movements, pagination, total))
    }
}
