//! Stock ledger
//!
//! Applies one movement to one product as a single unit of work: lock the
//! product, compute the new level, persist level and movement, raise the
//! alert the new level calls for. Storage is abstracted behind
//! [`LedgerStore`] so the rules run the same against PostgreSQL and in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::error::{AppError, AppResult};
use crate::services::alert::{self, Alert};
use shared::{AlertType, Movement, MovementType};

/// The product fields a movement needs, read under lock
#[derive(Debug, Clone, FromRow)]
pub struct ProductStock {
    pub id: i64,
    pub name: String,
    pub current_stock: i32,
    pub min_stock: i32,
}

/// Movement row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockMovement {
    pub id: i64,
    pub product_id: i64,
    pub user_id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub movement_type: String,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Movement about to be written
#[derive(Debug, Clone)]
pub struct NewMovement {
    pub product_id: i64,
    pub user_id: i64,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub reason: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// A movement requested by a user
#[derive(Debug, Clone)]
pub struct MovementCommand {
    pub product_id: i64,
    pub user_id: i64,
    pub movement: Movement,
    pub reason: Option<String>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// Result of a committed movement
#[derive(Debug, Clone, Serialize)]
pub struct MovementOutcome {
    pub movement: StockMovement,
    pub new_stock: i32,
    pub alert: Option<Alert>,
}

/// Storage operations of one ledger transaction
#[async_trait]
pub trait LedgerStore: Send {
    /// Read an active product and hold it until the unit of work ends
    async fn lock_active_product(&mut self, product_id: i64) -> AppResult<Option<ProductStock>>;

    async fn set_stock(&mut self, product_id: i64, new_stock: i32) -> AppResult<()>;

    async fn insert_movement(&mut self, movement: NewMovement) -> AppResult<StockMovement>;

    async fn insert_alert(
        &mut self,
        product_id: i64,
        alert_type: AlertType,
        message: &str,
    ) -> AppResult<Alert>;
}

/// Apply a movement through `store`.
///
/// Every rejection happens before the first write.
pub async fn apply_movement<S>(store: &mut S, command: MovementCommand) -> AppResult<MovementOutcome>
where
    S: LedgerStore + ?Sized,
{
    let product = store
        .lock_active_product(command.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

    let previous_stock = product.current_stock;
    let new_stock = command.movement.apply(previous_stock).map_err(|e| {
        tracing::info!(
            product_id = product.id,
            movement_type = %command.movement.kind(),
            quantity = command.movement.quantity(),
            previous_stock,
            "Movement rejected: {}",
            e
        );
        AppError::from(e)
    })?;

    store.set_stock(product.id, new_stock).await?;

    let movement = store
        .insert_movement(NewMovement {
            product_id: product.id,
            user_id: command.user_id,
            movement_type: command.movement.kind(),
            quantity: command.movement.quantity(),
            previous_stock,
            new_stock,
            reason: command.reason,
            reference: command.reference,
            notes: command.notes,
        })
        .await?;

    let alert = match AlertType::for_stock_level(new_stock, product.min_stock) {
        Some(alert_type) => {
            let message = alert_type.message(&product.name, new_stock);
            Some(store.insert_alert(product.id, alert_type, &message).await?)
        }
        None => None,
    };

    tracing::info!(
        product_id = product.id,
        movement_id = movement.id,
        movement_type = %command.movement.kind(),
        previous_stock,
        new_stock,
        "Stock movement recorded"
    );

    Ok(MovementOutcome {
        movement,
        new_stock,
        alert,
    })
}

/// [`LedgerStore`] backed by a PostgreSQL transaction
pub struct PgLedger {
    tx: Transaction<'static, Postgres>,
}

impl PgLedger {
    pub async fn begin(db: &PgPool) -> AppResult<Self> {
        Ok(Self { tx: db.begin().await? })
    }

    /// Run one movement in its own transaction: commit on success, roll back otherwise
    pub async fn record(db: &PgPool, command: MovementCommand) -> AppResult<MovementOutcome> {
        let mut ledger = Self::begin(db).await?;

        match apply_movement(&mut ledger, command).await {
            Ok(outcome) => {
                ledger.tx.commit().await?;
                Ok(outcome)
            }
            Err(err) => {
                if let Err(rollback_err) = ledger.tx.rollback().await {
                    tracing::error!("Ledger rollback failed: {:?}", rollback_err);
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl LedgerStore for PgLedger {
    async fn lock_active_product(&mut self, product_id: i64) -> AppResult<Option<ProductStock>> {
        let product = sqlx::query_as::<_, ProductStock>(
            r#"
            SELECT id, name, current_stock, min_stock
            FROM products
            WHERE id = $1 AND is_active = true
            FOR UPDATE
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(product)
    }

    async fn set_stock(&mut self, product_id: i64, new_stock: i32) -> AppResult<()> {
        sqlx::query("UPDATE products SET current_stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_stock)
            .bind(product_id)
            .execute(&mut *self.tx)
            .await?;

        Ok(())
    }

    async fn insert_movement(&mut self, movement: NewMovement) -> AppResult<StockMovement> {
        let row = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements
                (product_id, user_id, type, quantity, previous_stock, new_stock, reason, reference, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, product_id, user_id, type, quantity, previous_stock, new_stock,
                      reason, reference, notes, created_at
            "#,
        )
        .bind(movement.product_id)
        .bind(movement.user_id)
        .bind(movement.movement_type.as_str())
        .bind(movement.quantity)
        .bind(movement.previous_stock)
        .bind(movement.new_stock)
        .bind(&movement.reason)
        .bind(&movement.reference)
        .bind(&movement.notes)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(row)
    }

    async fn insert_alert(
        &mut self,
        product_id: i64,
        alert_type: AlertType,
        message: &str,
    ) -> AppResult<Alert> {
        alert::insert_alert(&mut *self.tx, product_id, alert_type, message).await
    }
}
