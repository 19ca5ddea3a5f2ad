//! Route definitions for the Stock Management Platform

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Auth routes (login is public)
        .nest("/auth", auth_routes(state.clone()))
        // Protected routes - user management
        .nest("/users", user_routes(state.clone()))
        // Protected routes - product catalog
        .nest("/products", product_routes(state.clone()))
        // Protected routes - supplier management
        .nest("/suppliers", supplier_routes(state.clone()))
        // Protected routes - stock movements and alerts
        .nest("/stock", stock_routes(state.clone()))
        // Protected routes - dashboard
        .nest("/dashboard", dashboard_routes(state))
}

/// Authentication routes
fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/register", post(handlers::register))
        .route("/verify", get(handlers::verify))
        .route("/refresh", post(handlers::refresh))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/login", post(handlers::login))
        .merge(protected)
}

/// User management routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users))
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/password", put(handlers::change_password))
        .route("/:user_id", put(handlers::update_user))
        .route("/:user_id/deactivate", put(handlers::deactivate_user))
        .route("/:user_id/activate", put(handlers::activate_user))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product catalog routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/categories/list", get(handlers::list_categories))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Supplier routes (protected)
fn supplier_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_suppliers).post(handlers::create_supplier),
        )
        .route(
            "/:supplier_id",
            get(handlers::get_supplier)
                .put(handlers::update_supplier)
                .delete(handlers::delete_supplier),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Stock ledger routes (protected)
fn stock_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/movements",
            get(handlers::list_movements).post(handlers::create_movement),
        )
        .route("/alerts", get(handlers::list_alerts))
        .route("/alerts/:alert_id/read", put(handlers::mark_alert_read))
        .route("/low-stock", get(handlers::low_stock))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::get_stats))
        .route("/alerts", get(handlers::get_alerts))
        .route("/charts", get(handlers::get_charts))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
