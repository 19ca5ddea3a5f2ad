//! HTTP handlers for stock movements and alerts

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alert::{Alert, AlertWithProduct};
use crate::services::ledger::MovementOutcome;
use crate::services::product::ProductWithSupplier;
use crate::services::stock::MovementWithDetails;
use crate::services::{AlertService, ProductService, StockService};
use crate::AppState;
use shared::{MovementRequest, MovementType, PaginatedResponse, Pagination};

#[derive(Debug, Deserialize)]
pub struct MovementQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub product_id: Option<i64>,
    #[serde(rename = "type")]
    pub movement_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertQuery {
    pub is_read: Option<bool>,
}

#[derive(Serialize)]
pub struct AlertResponse {
    pub message: String,
    pub alert: Alert,
}

/// Movement history
pub async fn list_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<PaginatedResponse<MovementWithDetails>>> {
    let movement_type = query
        .movement_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::parse::<MovementType>)
        .transpose()?;

    let service = StockService::new(state.db);
    let movements = service
        .list_movements(
            Pagination::from_query(query.page, query.limit),
            query.product_id,
            movement_type,
        )
        .await?;
    Ok(Json(movements))
}

/// Apply a stock movement through the ledger
pub async fn create_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(request): Json<MovementRequest>,
) -> AppResult<(StatusCode, Json<MovementOutcome>)> {
    request.validate()?;

    let service = StockService::new(state.db);
    let outcome = service
        .record_movement(current_user.0.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Alerts of active products, optionally filtered by `?is_read=`
pub async fn list_alerts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<Vec<AlertWithProduct>>> {
    let service = AlertService::new(state.db);
    let alerts = service.list(query.is_read).await?;
    Ok(Json(alerts))
}

pub async fn mark_alert_read(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(alert_id): Path<i64>,
) -> AppResult<Json<AlertResponse>> {
    let service = AlertService::new(state.db);
    let alert = service.mark_read(alert_id).await?;

    Ok(Json(AlertResponse {
        message: "Alert marked as read".to_string(),
        alert,
    }))
}

/// Products at or below their minimum stock
pub async fn low_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<ProductWithSupplier>>> {
    let service = ProductService::new(state.db);
    let products = service.low_stock().await?;
    Ok(Json(products))
}
