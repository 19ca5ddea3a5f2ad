//! Product catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::alert::{insert_alert, Alert};
use crate::services::search_pattern;
use shared::{AlertType, CreateProductInput, PaginatedResponse, Pagination, UpdateProductInput};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Product row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub unit: String,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub min_stock: i32,
    pub max_stock: i32,
    pub current_stock: i32,
    pub image_url: Option<String>,
    pub supplier_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product with the name of its supplier
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductWithSupplier {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: Product,
    pub supplier_name: Option<String>,
}

/// A newly created product and the alert its opening stock raised
#[derive(Debug, Serialize)]
pub struct CreatedProduct {
    pub product: Product,
    pub alert: Option<Alert>,
}

pub(crate) const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.sku, p.barcode, \
    p.category, p.unit, p.purchase_price, p.selling_price, p.min_stock, p.max_stock, \
    p.current_stock, p.image_url, p.supplier_id, p.is_active, p.created_at, p.updated_at";

const RETURNING_PRODUCT: &str = "RETURNING id, name, description, sku, barcode, category, unit, \
    purchase_price, selling_price, min_stock, max_stock, current_stock, image_url, supplier_id, \
    is_active, created_at, updated_at";

impl ProductService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Active products ordered by name, filtered by name/SKU search and category
    pub async fn list(
        &self,
        pagination: Pagination,
        search: Option<&str>,
        category: Option<&str>,
    ) -> AppResult<PaginatedResponse<ProductWithSupplier>> {
        let pattern = search_pattern(search);
        let category = category.map(str::trim).filter(|c| !c.is_empty());

        let products = sqlx::query_as::<_, ProductWithSupplier>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}, s.name AS supplier_name
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.is_active = true
              AND ($1::TEXT IS NULL OR p.name ILIKE $1 OR p.sku ILIKE $1)
              AND ($2::TEXT IS NULL OR p.category = $2)
            ORDER BY p.name, p.id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(&pattern)
        .bind(category)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM products p
            WHERE p.is_active = true
              AND ($1::TEXT IS NULL OR p.name ILIKE $1 OR p.sku ILIKE $1)
              AND ($2::TEXT IS NULL OR p.category = $2)
            "#,
        )
        .bind(&pattern)
        .bind(category)
        .fetch_one(&self.db)
        .await?;

        Ok(PaginatedResponse::new(products, pagination, total))
    }

    pub async fn get(&self, product_id: i64) -> AppResult<ProductWithSupplier> {
        sqlx::query_as::<_, ProductWithSupplier>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}, s.name AS supplier_name
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.id = $1 AND p.is_active = true
            "#
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// Create a product; its opening stock goes through the same alert policy as a movement
    pub async fn create(&self, input: CreateProductInput) -> AppResult<CreatedProduct> {
        let mut tx = self.db.begin().await?;

        ensure_sku_free(&mut tx, &input.sku, None).await?;
        if let Some(supplier_id) = input.supplier_id {
            ensure_active_supplier(&mut tx, supplier_id).await?;
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products
                (name, description, sku, barcode, category, unit, purchase_price, selling_price,
                 min_stock, max_stock, current_stock, image_url, supplier_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            {RETURNING_PRODUCT}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.sku.trim())
        .bind(&input.barcode)
        .bind(&input.category)
        .bind(input.unit.trim())
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(input.min_stock)
        .bind(input.max_stock)
        .bind(input.current_stock)
        .bind(&input.image_url)
        .bind(input.supplier_id)
        .fetch_one(&mut *tx)
        .await?;

        let alert = match AlertType::for_stock_level(product.current_stock, product.min_stock) {
            Some(alert_type) => {
                let message = alert_type.message(&product.name, product.current_stock);
                Some(insert_alert(&mut tx, product.id, alert_type, &message).await?)
            }
            None => None,
        };

        tx.commit().await?;

        tracing::info!(product_id = product.id, sku = %product.sku, "Product created");
        Ok(CreatedProduct { product, alert })
    }

    /// Update catalog fields; the stock level is owned by the ledger and left untouched
    pub async fn update(&self, product_id: i64, input: UpdateProductInput) -> AppResult<Product> {
        let mut tx = self.db.begin().await?;

        ensure_sku_free(&mut tx, &input.sku, Some(product_id)).await?;
        if let Some(supplier_id) = input.supplier_id {
            ensure_active_supplier(&mut tx, supplier_id).await?;
        }

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $1, description = $2, sku = $3, barcode = $4, category = $5, unit = $6,
                purchase_price = $7, selling_price = $8, min_stock = $9, max_stock = $10,
                image_url = $11, supplier_id = $12, updated_at = NOW()
            WHERE id = $13 AND is_active = true
            {RETURNING_PRODUCT}
            "#
        ))
        .bind(input.name.trim())
        .bind(&input.description)
        .bind(input.sku.trim())
        .bind(&input.barcode)
        .bind(&input.category)
        .bind(input.unit.trim())
        .bind(input.purchase_price)
        .bind(input.selling_price)
        .bind(input.min_stock)
        .bind(input.max_stock)
        .bind(&input.image_url)
        .bind(input.supplier_id)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        tx.commit().await?;

        tracing::info!(product_id, "Product updated");
        Ok(product)
    }

    pub async fn soft_delete(&self, product_id: i64) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE products SET is_active = false, updated_at = NOW() WHERE id = $1 AND is_active = true",
        )
        .bind(product_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        tracing::info!(product_id, "Product deactivated");
        Ok(())
    }

    /// Distinct non-empty categories of active products
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category FROM products
            WHERE is_active = true AND category IS NOT NULL AND category <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Active products at or below their minimum, most critical first
    pub async fn low_stock(&self) -> AppResult<Vec<ProductWithSupplier>> {
        let products = sqlx::query_as::<_, ProductWithSupplier>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}, s.name AS supplier_name
            FROM products p
            LEFT JOIN suppliers s ON s.id = p.supplier_id
            WHERE p.is_active = true AND p.current_stock <= p.min_stock
            ORDER BY (p.current_stock::FLOAT8 / NULLIF(p.min_stock, 0)) ASC NULLS LAST, p.name
            "#
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }
}

async fn ensure_sku_free(conn: &mut PgConnection, sku: &str, except: Option<i64>) -> AppResult<()> {
    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM products WHERE sku = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
    )
    .bind(sku.trim())
    .bind(except)
    .fetch_one(conn)
    .await?;

    if taken {
        return Err(AppError::Conflict {
            resource: "sku".to_string(),
            message: format!("A product with SKU '{}' already exists", sku.trim()),
            message_fr: format!("Un produit avec le SKU '{}' existe déjà", sku.trim()),
        });
    }
    Ok(())
}

async fn ensure_active_supplier(conn: &mut PgConnection, supplier_id: i64) -> AppResult<()> {
    let active = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM suppliers WHERE id = $1 AND is_active = true FOR SHARE",
    )
    .bind(supplier_id)
    .fetch_optional(conn)
    .await?;

    if active.is_none() {
        return Err(AppError::Validation {
            field: "supplier_id".to_string(),
            message: "Supplier does not exist or is inactive".to_string(),
            message_fr: "Fournisseur inexistant ou inactif".to_string(),
        });
    }
    Ok(())
}
