//! Domain models for the Stock Management Platform

mod alert;
mod movement;
mod product;
mod supplier;
mod user;

pub use alert::*;
pub use movement::*;
pub use product::*;
pub use supplier::*;
pub use user::*;
