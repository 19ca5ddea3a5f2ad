//! HTTP handlers for suppliers

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
use crate::services::supplier::{Supplier, SupplierDetail};
use crate::services::SupplierService;
use crate::AppState;
use shared::{PaginatedResponse, Pagination, SupplierInput};

#[derive(Debug, Deserialize)]
pub struct SupplierQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

#[derive(Serialize)]
pub struct SupplierResponse {
    pub message: String,
    pub supplier: Supplier,
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<SupplierQuery>,
) -> AppResult<Json<PaginatedResponse<Supplier>>> {
    let service = SupplierService::new(state.db);
    let suppliers = service
        .list(
            Pagination::from_query(query.page, query.limit),
            query.search.as_deref(),
        )
        .await?;
    Ok(Json(suppliers))
}

/// Supplier with its active products
pub async fn get_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<i64>,
) -> AppResult<Json<SupplierDetail>> {
    let service = SupplierService::new(state.db);
    let supplier = service.get(supplier_id).await?;
    Ok(Json(supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<SupplierInput>,
) -> AppResult<(StatusCode, Json<SupplierResponse>)> {
    input.validate()?;

    let service = SupplierService::new(state.db);
    let supplier = service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(SupplierResponse {
            message: "Supplier created".to_string(),
            supplier,
        }),
    ))
}

pub async fn update_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<i64>,
    Json(input): Json<SupplierInput>,
) -> AppResult<Json<SupplierResponse>> {
    input.validate()?;

    let service = SupplierService::new(state.db);
    let supplier = service.update(supplier_id, input).await?;

    Ok(Json(SupplierResponse {
        message: "Supplier updated".to_string(),
        supplier,
    }))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(supplier_id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    let service = SupplierService::new(state.db);
    service.soft_delete(supplier_id).await?;

    Ok(Json(MessageResponse {
        message: "Supplier deleted".to_string(),
    }))
}
