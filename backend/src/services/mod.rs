//! Business logic services for the Stock Management Platform

pub mod alert;
pub mod auth;
pub mod dashboard;
pub mod ledger;
pub mod product;
pub mod seed;
pub mod stock;
pub mod supplier;
pub mod user;

pub use alert::AlertService;
pub use auth::AuthService;
pub use dashboard::DashboardService;
pub use ledger::{apply_movement, LedgerStore, PgLedger};
pub use product::ProductService;
pub use stock::StockService;
pub use supplier::SupplierService;
pub use user::UserService;

/// Turn a free-text search into an `ILIKE` pattern matching it anywhere.
///
/// Blank input means no filter. `%`, `_` and `\` are escaped so they match literally.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|s| !s.is_empty())?;
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some(" dell ")).as_deref(), Some("%dell%"));
        assert_eq!(search_pattern(Some("50%_off")).as_deref(), Some("%50\\%\\_off%"));
    }
}
