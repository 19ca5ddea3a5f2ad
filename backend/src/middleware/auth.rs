//! Authentication middleware
//!
//! JWT authentication and role-based access control

use axum::{
    extract::{Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::error::{AppError, AppResult};
use crate::services::auth::decode_token;
use crate::AppState;
use shared::Role;

/// Authenticated user information extracted from JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    /// Fail with 403 unless the user's role passes `allowed`
    pub fn authorize(&self, allowed: impl FnOnce(&Role) -> bool) -> AppResult<()> {
        if allowed(&self.role) {
            Ok(())
        } else {
            tracing::info!(user_id = self.user_id, role = %self.role, "Permission denied");
            Err(AppError::InsufficientPermissions)
        }
    }
}

/// Authentication middleware that validates bearer tokens against the configured secret
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>() else {
        return Err(AppError::Unauthorized {
            message: "Missing or invalid Authorization header".to_string(),
            message_fr: "En-tête d'autorisation manquant ou invalide".to_string(),
        });
    };

    let claims = decode_token(bearer.token(), &state.config.jwt.secret)?;

    let auth_user = AuthUser {
        user_id: claims.user_id()?,
        email: claims.email,
        role: claims.role,
    };

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extractor for authenticated user
/// Use this in handlers to get the current user
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized {
                message: "Authentication required".to_string(),
                message_fr: "Authentification requise".to_string(),
            })
    }
}
