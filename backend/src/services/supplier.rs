//! Supplier service

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::search_pattern;
use shared::{PaginatedResponse, Pagination, SupplierInput};

/// Supplier service
#[derive(Clone)]
pub struct SupplierService {
    db: PgPool,
}

/// Supplier row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Supplier {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product summary listed under its supplier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SupplierProduct {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub current_stock: i32,
}

/// Supplier with its active products
#[derive(Debug, Serialize)]
pub struct SupplierDetail {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub products: Vec<SupplierProduct>,
}

const SUPPLIER_COLUMNS: &str =
    "id, name, email, phone, address, contact_person, is_active, created_at, updated_at";

impl SupplierService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Active suppliers ordered by name, filtered by name or email
    pub async fn list(
        &self,
        pagination: Pagination,
        search: Option<&str>,
    ) -> AppResult<PaginatedResponse<Supplier>> {
        let pattern = search_pattern(search);

        let suppliers = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            SELECT {SUPPLIER_COLUMNS}
            FROM suppliers
            WHERE is_active = true
              AND ($1::TEXT IS NULL OR name ILIKE $1 OR email ILIKE $1)
            ORDER BY name, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(&pattern)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM suppliers
            WHERE is_active = true
              AND ($1::TEXT IS NULL OR name ILIKE $1 OR email ILIKE $1)
            "#,
        )
        .bind(&pattern)
        .fetch_one(&self.db)
        .await?;

        Ok(PaginatedResponse::new(suppliers, pagination, total))
    }

    pub async fn get(&self, supplier_id: i64) -> AppResult<SupplierDetail> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1 AND is_active = true"
        ))
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let products = sqlx::query_as::<_, SupplierProduct>(
            r#"
            SELECT id, name, sku, current_stock
            FROM products
            WHERE supplier_id = $1 AND is_active = true
            ORDER BY name
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&self.db)
        .await?;

        Ok(SupplierDetail { supplier, products })
    }

    pub async fn create(&self, input: SupplierInput) -> AppResult<Supplier> {
        let supplier = sqlx::query_as::<_, Supplier>(&format!(
            r#"
            INSERT INTO suppliers (name, email, phone, address, contact_person)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.contact_person)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(supplier_id = supplier.id, "Supplier created");
        Ok(supplier)
    }

    pub async fn update(&self, supplier_id: i64, input: SupplierInput) -> AppResult<Supplier> {
        sqlx::query_as::<_, Supplier>(&format!(
            r#"
            UPDATE suppliers
            SET name = $1, email = $2, phone = $3, address = $4, contact_person = $5,
                updated_at = NOW()
            WHERE id = $6 AND is_active = true
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.contact_person)
        .bind(supplier_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))
    }

    /// Deactivate a supplier that no active product references
    pub async fn soft_delete(&self, supplier_id: i64) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Row lock pairs with the FOR SHARE taken when a product is attached
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM suppliers WHERE id = $1 AND is_active = true FOR UPDATE",
        )
        .bind(supplier_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Supplier".to_string()))?;

        let linked = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE supplier_id = $1 AND is_active = true",
        )
        .bind(supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        if linked > 0 {
            return Err(AppError::Conflict {
                resource: "supplier".to_string(),
                message: format!("Supplier still has {} active product(s)", linked),
                message_fr: "Impossible de supprimer ce fournisseur car il a des produits associés"
                    .to_string(),
            });
        }

        sqlx::query("UPDATE suppliers SET is_active = false, updated_at = NOW() WHERE id = $1")
            .bind(supplier_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(supplier_id, "Supplier deactivated");
        Ok(())
    }
}
