//! HTTP handlers, one module per route group

use serde::Serialize;

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod products;
pub mod stock;
pub mod suppliers;
pub mod users;

pub use auth::*;
pub use dashboard::*;
pub use health::*;
pub use products::*;
pub use stock::*;
pub use suppliers::*;
pub use users::*;

/// Body of endpoints that only confirm an action
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
