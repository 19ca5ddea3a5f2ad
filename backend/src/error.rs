//! Error handling for the Stock Management Platform
//!
//! Provides consistent error responses in English and French

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{first_validation_error, MovementError, UnknownMovementType};
use thiserror::Error;

/// PostgreSQL SQLSTATE for unique constraint violations
const PG_UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign key violations
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String, message_fr: String },

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_fr: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Conflict: {message}")]
    Conflict {
        resource: String,
        message: String,
        message_fr: String,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Stock ledger errors
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("Stock cannot be negative: {0}")]
    NegativeStock(String),

    #[error("Invalid movement type: {0}")]
    InvalidMovementType(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status(&self) -> StatusCode {
        self.response_parts().0
    }

    fn response_parts(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new(
                    "INVALID_CREDENTIALS",
                    "Invalid email or password",
                    "Email ou mot de passe incorrect",
                ),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("TOKEN_EXPIRED", "Token has expired", "Le jeton a expiré"),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_TOKEN", "Invalid token", "Jeton invalide"),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action",
                    "Accès refusé",
                ),
            ),
            AppError::Unauthorized { message, message_fr } => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", message.clone(), message_fr.clone()),
            ),
            AppError::Validation {
                field,
                message,
                message_fr,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone(), message_fr.clone())
                    .with_field(field.clone()),
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "VALIDATION_ERROR",
                    msg.clone(),
                    format!("Données invalides : {}", msg),
                ),
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "DUPLICATE_ENTRY",
                    format!("A record with this {} already exists", field),
                    format!("Cette valeur existe déjà : {}", field),
                )
                .with_field(field.clone()),
            ),
            AppError::Conflict {
                resource,
                message,
                message_fr,
            } => (
                StatusCode::CONFLICT,
                ErrorDetail::new("CONFLICT", message.clone(), message_fr.clone())
                    .with_field(resource.clone()),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "NOT_FOUND",
                    format!("{} not found", resource),
                    format!("{} introuvable", resource),
                ),
            ),
            AppError::InsufficientStock(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "INSUFFICIENT_STOCK",
                    msg.clone(),
                    format!("Stock insuffisant : {}", msg),
                ),
            ),
            AppError::NegativeStock(msg) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "NEGATIVE_STOCK",
                    msg.clone(),
                    format!("Le stock ne peut pas être négatif : {}", msg),
                ),
            ),
            AppError::InvalidMovementType(kind) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INVALID_MOVEMENT_TYPE",
                    format!(
                        "Invalid movement type '{}': expected entree, sortie, ajustement or inventaire",
                        kind
                    ),
                    format!("Type de mouvement invalide : {}", kind),
                )
                .with_field("type"),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "CONFIGURATION_ERROR",
                    format!("Configuration error: {}", msg),
                    "Erreur de configuration",
                ),
            ),
            AppError::DatabaseError(err) => database_error_parts(err),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone(), "Erreur interne du serveur"),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred",
                    "Erreur interne du serveur",
                ),
            ),
        }
    }
}

/// Constraint violations surface as client errors, everything else as 500
fn database_error_parts(err: &sqlx::Error) -> (StatusCode, ErrorDetail) {
    let db_err = err.as_database_error();
    let code = db_err.and_then(|e| e.code());
    let constraint = db_err
        .and_then(|e| e.constraint())
        .map(str::to_string);

    match code.as_deref() {
        Some(PG_UNIQUE_VIOLATION) => {
            let field = constraint.unwrap_or_else(|| "value".to_string());
            (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "DUPLICATE_ENTRY",
                    "This value already exists",
                    "Cette valeur existe déjà",
                )
                .with_field(field),
            )
        }
        Some(PG_FOREIGN_KEY_VIOLATION) => (
            StatusCode::BAD_REQUEST,
            ErrorDetail::new("INVALID_REFERENCE", "Invalid reference", "Référence invalide"),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorDetail::new(
                "DATABASE_ERROR",
                "A database error occurred",
                "Erreur de base de données",
            ),
        ),
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, message) = first_validation_error(&errors);
        AppError::Validation {
            message_fr: format!("Données invalides : {}", message),
            field,
            message,
        }
    }
}

impl From<MovementError> for AppError {
    fn from(err: MovementError) -> Self {
        match err {
            MovementError::InsufficientStock { .. } => AppError::InsufficientStock(err.to_string()),
            MovementError::NegativeStock { .. } => AppError::NegativeStock(err.to_string()),
            MovementError::Overflow => AppError::Validation {
                field: "quantity".to_string(),
                message: "Quantity is out of range".to_string(),
                message_fr: "Quantité hors limites".to_string(),
            },
        }
    }
}

impl From<UnknownMovementType> for AppError {
    fn from(err: UnknownMovementType) -> Self {
        AppError::InvalidMovementType(err.0)
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_fr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    pub fn new(
        code: impl Into<String>,
        message_en: impl Into<String>,
        message_fr: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message_en: message_en.into(),
            message_fr: message_fr.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.response_parts();

        // Client mistakes are routine; only server-side failures are errors
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        assert_eq!(AppError::NotFound("Product".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InsufficientStock("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::NegativeStock("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::InvalidMovementType("transfer".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InsufficientPermissions.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_movement_errors_convert() {
        let err: AppError = MovementError::InsufficientStock {
            available: 10,
            requested: 15,
        }
        .into();
        assert!(matches!(err, AppError::InsufficientStock(_)));

        let err: AppError = MovementError::NegativeStock {
            previous: 2,
            delta: -3,
        }
        .into();
        assert!(matches!(err, AppError::NegativeStock(_)));

        let err: AppError = MovementError::Overflow.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
