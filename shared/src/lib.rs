//! Shared types and domain rules for the Stock Management Platform
//!
//! This crate holds everything that does not touch the database: roles,
//! stock movement arithmetic, the alert policy, request payloads and their
//! validation rules. The backend builds its persistence on top of it.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
