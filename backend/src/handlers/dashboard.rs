//! Dashboard handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::alert::AlertWithProduct;
use crate::services::dashboard::{DashboardCharts, DashboardStats, DEFAULT_CHART_PERIOD_DAYS};
use crate::services::{AlertService, DashboardService};
use crate::AppState;

/// Number of alerts shown on the dashboard
const DASHBOARD_ALERT_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// Window in days
    pub period: Option<i32>,
}

pub async fn get_stats(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.db);
    let stats = service.stats().await?;
    Ok(Json(stats))
}

/// Most recent unread alerts
pub async fn get_alerts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<AlertWithProduct>>> {
    let service = AlertService::new(state.db);
    let alerts = service.recent_unread(DASHBOARD_ALERT_LIMIT).await?;
    Ok(Json(alerts))
}

pub async fn get_charts(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(query): Query<ChartQuery>,
) -> AppResult<Json<DashboardCharts>> {
    let service = DashboardService::new(state.db);
    let charts = service
        .charts(query.period.unwrap_or(DEFAULT_CHART_PERIOD_DAYS))
        .await?;
    Ok(Json(charts))
}
