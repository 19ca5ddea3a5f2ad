//! Common types used across the platform

use serde::{Deserialize, Deserializer, Serialize};

/// Largest page size a listing endpoint will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// Pagination parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}

impl Pagination {
    /// Build pagination from optional query values, clamping out-of-range input
    pub fn from_query(page: Option<u32>, limit: Option<u32>) -> Self {
        let defaults = Self::default();
        Self {
            page: page.unwrap_or(defaults.page).max(1),
            limit: limit.unwrap_or(defaults.limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Row offset for SQL `OFFSET`
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }

    /// Row count for SQL `LIMIT`
    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, pagination: Pagination, total: i64) -> Self {
        Self {
            data,
            pagination: PaginationMeta::new(pagination, total),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

impl PaginationMeta {
    pub fn new(pagination: Pagination, total: i64) -> Self {
        let total = u64::try_from(total).unwrap_or(0);
        let limit = u64::from(pagination.limit.max(1));
        Self {
            page: pagination.page,
            limit: pagination.limit,
            total,
            pages: total.div_ceil(limit),
        }
    }
}

/// Deserialize an optional string, treating blank input as absent.
///
/// Forms submit `""` for untouched optional fields; those must land in the
/// database as NULL rather than as empty text.
pub fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
