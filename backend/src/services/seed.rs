//! First-run bootstrap and demo data

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::ledger::{MovementCommand, PgLedger};
use crate::services::{ProductService, SupplierService, UserService};
use shared::{
    validate_email, validate_password, CreateProductInput, Movement, RegisterUserInput, Role,
    SupplierInput,
};

/// Create the configured admin account when no user exists yet.
///
/// Returns the id of the created admin, or `None` when nothing was done.
pub async fn bootstrap_admin(db: &PgPool, config: &Config) -> AppResult<Option<i64>> {
    let users = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await?;
    if users > 0 {
        return Ok(None);
    }

    let (Some(email), Some(password)) = (
        config.bootstrap.admin_email.as_deref(),
        config.bootstrap.admin_password.as_deref(),
    ) else {
        tracing::warn!(
            "No user accounts exist and no bootstrap admin is configured; \
             set STOCK__BOOTSTRAP__ADMIN_EMAIL and STOCK__BOOTSTRAP__ADMIN_PASSWORD"
        );
        return Ok(None);
    };

    validate_email(email)
        .and_then(|_| validate_password(password))
        .map_err(|e| AppError::Configuration(format!("bootstrap admin: {}", e)))?;

    let admin = UserService::new(db.clone(), config.auth.bcrypt_cost)
        .create(RegisterUserInput {
            email: email.to_string(),
            password: password.to_string(),
            first_name: "Admin".to_string(),
            last_name: "System".to_string(),
            role: Role::Admin,
        })
        .await?;

    tracing::info!(user_id = admin.id, email = %admin.email, "Bootstrap admin created");
    Ok(Some(admin.id))
}

struct DemoProduct {
    name: &'static str,
    sku: &'static str,
    category: &'static str,
    unit: &'static str,
    purchase_price: i64,
    selling_price: i64,
    min_stock: i32,
    max_stock: i32,
    opening_stock: i32,
    supplier: usize,
}

const DEMO_SUPPLIERS: [(&str, &str, &str); 3] = [
    ("TechnoSupply", "contact@technosupply.com", "Pierre Techno"),
    ("ElectroDistrib", "info@electrodistrib.fr", "Sophie Electro"),
    ("BureauPlus", "vente@bureauplus.com", "Marc Bureau"),
];

const DEMO_PRODUCTS: [DemoProduct; 6] = [
    DemoProduct {
        name: "Dell Laptop",
        sku: "DELL-LAP-001",
        category: "Electronics",
        unit: "piece",
        purchase_price: 800,
        selling_price: 1200,
        min_stock: 5,
        max_stock: 50,
        opening_stock: 15,
        supplier: 0,
    },
    DemoProduct {
        name: "Logitech MX Mouse",
        sku: "LOG-MX-002",
        category: "Electronics",
        unit: "piece",
        purchase_price: 45,
        selling_price: 75,
        min_stock: 10,
        max_stock: 100,
        opening_stock: 50,
        supplier: 1,
    },
    DemoProduct {
        name: "HDMI Cable 2m",
        sku: "HDMI-2M-015",
        category: "Electronics",
        unit: "piece",
        purchase_price: 12,
        selling_price: 20,
        min_stock: 10,
        max_stock: 80,
        opening_stock: 10,
        supplier: 1,
    },
    DemoProduct {
        name: "Office Chair",
        sku: "CHAIR-ERG-006",
        category: "Furniture",
        unit: "piece",
        purchase_price: 150,
        selling_price: 250,
        min_stock: 2,
        max_stock: 20,
        opening_stock: 8,
        supplier: 2,
    },
    DemoProduct {
        name: "A4 Paper",
        sku: "PAPER-A4-012",
        category: "Supplies",
        unit: "ream",
        purchase_price: 4,
        selling_price: 8,
        min_stock: 20,
        max_stock: 200,
        opening_stock: 85,
        supplier: 2,
    },
    DemoProduct {
        name: "AA Batteries",
        sku: "BATT-AA-016",
        category: "Supplies",
        unit: "pack",
        purchase_price: 6,
        selling_price: 12,
        min_stock: 15,
        max_stock: 100,
        opening_stock: 8,
        supplier: 1,
    },
];

/// Movements replayed through the ledger: (product index, movement, reason, reference)
const DEMO_MOVEMENTS: [(usize, Movement, &str, &str); 4] = [
    (0, Movement::Receipt(10), "Restock", "REF-001"),
    (1, Movement::Issue(5), "Sale", "SALE-001"),
    (2, Movement::Issue(7), "Sale", "SALE-002"),
    (4, Movement::Count(80), "Monthly count", "INV-001"),
];

/// Insert demo suppliers and products into an empty catalog and replay a
/// few movements through the ledger
pub async fn seed_demo_data(db: &PgPool) -> AppResult<()> {
    let products = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(db)
        .await?;
    if products > 0 {
        tracing::debug!("Catalog is not empty; skipping demo data");
        return Ok(());
    }

    let Some(admin_id) = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM users WHERE role = 'admin' AND is_active = true ORDER BY id LIMIT 1",
    )
    .fetch_optional(db)
    .await?
    else {
        tracing::warn!("No active admin to attribute demo movements to; skipping demo data");
        return Ok(());
    };

    let supplier_service = SupplierService::new(db.clone());
    let mut supplier_ids = Vec::with_capacity(DEMO_SUPPLIERS.len());
    for (name, email, contact) in DEMO_SUPPLIERS {
        let supplier = supplier_service
            .create(SupplierInput {
                name: name.to_string(),
                email: Some(email.to_string()),
                phone: None,
                address: None,
                contact_person: Some(contact.to_string()),
            })
            .await?;
        supplier_ids.push(supplier.id);
    }

    let product_service = ProductService::new(db.clone());
    let mut product_ids = Vec::with_capacity(DEMO_PRODUCTS.len());
    for demo in &DEMO_PRODUCTS {
        let created = product_service
            .create(CreateProductInput {
                name: demo.name.to_string(),
                description: None,
                sku: demo.sku.to_string(),
                barcode: None,
                category: Some(demo.category.to_string()),
                unit: demo.unit.to_string(),
                purchase_price: Decimal::from(demo.purchase_price),
                selling_price: Decimal::from(demo.selling_price),
                min_stock: demo.min_stock,
                max_stock: demo.max_stock,
                current_stock: demo.opening_stock,
                image_url: None,
                supplier_id: supplier_ids.get(demo.supplier).copied(),
            })
            .await?;
        product_ids.push(created.product.id);
    }

    for (index, movement, reason, reference) in DEMO_MOVEMENTS {
        let Some(&product_id) = product_ids.get(index) else {
            continue;
        };
        PgLedger::record(
            db,
            MovementCommand {
                product_id,
                user_id: admin_id,
                movement,
                reason: Some(reason.to_string()),
                reference: Some(reference.to_string()),
                notes: None,
            },
        )
        .await?;
    }

    tracing::info!(
        suppliers = supplier_ids.len(),
        products = product_ids.len(),
        movements = DEMO_MOVEMENTS.len(),
        "Demo data seeded"
    );
    Ok(())
}
