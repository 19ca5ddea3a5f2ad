//! HTTP handlers for the product catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::MessageResponse;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::product::{CreatedProduct, Product, ProductWithSupplier};
use crate::services::ProductService;
use crate::AppState;
use shared::{CreateProductInput, PaginatedResponse, Pagination, Role, UpdateProductInput};

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct ProductCreatedResponse {
    pub message: String,
    #[serde(flatten)]
    pub created: CreatedProduct,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub message: String,
    pub product: Product,
}

pub async fn list_products(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<PaginatedResponse<ProductWithSupplier>>> {
    let service = ProductService::new(state.db);
    let products = service
        .list(
            Pagination::from_query(query.page, query.limit),
            query.search.as_deref(),
            query.category.as_deref(),
        )
        .await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ProductWithSupplier>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<ProductCreatedResponse>)> {
    input.validate()?;

    let service = ProductService::new(state.db);
    let created = service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreatedResponse {
            message: "Product created".to_string(),
            created,
        }),
    ))
}

pub async fn update_product(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(product_id): Path<i64>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<ProductResponse>> {
    input.validate()?;

    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;

    Ok(Json(ProductResponse {
        message: "Product updated".to_string(),
        product,
    }))
}

/// Soft delete a product (admin only)
pub async fn delete_product(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    current_user.0.authorize(Role::can_delete_products)?;

    let service = ProductService::new(state.db);
    service.soft_delete(product_id).await?;

    Ok(Json(MessageResponse {
        message: "Product deleted".to_string(),
    }))
}

pub async fn list_categories(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<String>>> {
    let service = ProductService::new(state.db);
    let categories = service.categories().await?;
    Ok(Json(categories))
}
