//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{AuthToken, LoginResponse};
use crate::services::user::User;
use crate::services::{AuthService, UserService};
use crate::AppState;
use shared::{LoginInput, RegisterUserInput, Role};

#[derive(Serialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user: User,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub user_id: i64,
    pub email: String,
    pub role: Role,
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> AppResult<Json<LoginResponse>> {
    body.validate()?;

    let auth_service = AuthService::new(state.db, &state.config);
    let response = auth_service.login(&body).await?;
    Ok(Json(response))
}

/// Create a user account (admin only)
pub async fn register(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<RegisterUserInput>,
) -> AppResult<(StatusCode, Json<UserCreatedResponse>)> {
    current_user.0.authorize(Role::can_manage_users)?;
    body.validate()?;

    let service = UserService::new(state.db, state.config.auth.bcrypt_cost);
    let user = service.create(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User created".to_string(),
            user,
        }),
    ))
}

/// Echo the identity carried by the token
pub async fn verify(current_user: CurrentUser) -> Json<VerifyResponse> {
    let user = current_user.0;
    Json(VerifyResponse {
        user_id: user.user_id,
        email: user.email,
        role: user.role,
    })
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<AuthToken>> {
    let auth_service = AuthService::new(state.db, &state.config);
    let token = auth_service.refresh(current_user.0.user_id).await?;
    Ok(Json(token))
}
