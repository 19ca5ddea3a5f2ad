//! User management handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

use super::MessageResponse;
use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::user::User;
use crate::services::UserService;
use crate::AppState;
use shared::{ChangePasswordInput, Role, UpdateProfileInput, UpdateUserInput};

#[derive(Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

fn service(state: AppState) -> UserService {
    UserService::new(state.db, state.config.auth.bcrypt_cost)
}

/// List all users (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<User>>> {
    current_user.0.authorize(Role::can_manage_users)?;
    let users = service(state).list().await?;
    Ok(Json(users))
}

/// Profile of the authenticated user
pub async fn get_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<User>> {
    let user = service(state).get(current_user.0.user_id).await?;
    Ok(Json(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<UpdateProfileInput>,
) -> AppResult<Json<UserResponse>> {
    input.validate()?;
    let user = service(state)
        .update_profile(current_user.0.user_id, input)
        .await?;

    Ok(Json(UserResponse {
        message: "Profile updated".to_string(),
        user,
    }))
}

pub async fn change_password(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<Json<MessageResponse>> {
    input.validate()?;
    service(state)
        .change_password(current_user.0.user_id, input)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated".to_string(),
    }))
}

/// Update another user's account (admin only)
pub async fn update_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<i64>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserResponse>> {
    current_user.0.authorize(Role::can_manage_users)?;
    input.validate()?;
    let user = service(state).update(user_id, input).await?;

    Ok(Json(UserResponse {
        message: "User updated".to_string(),
        user,
    }))
}

pub async fn deactivate_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    current_user.0.authorize(Role::can_manage_users)?;
    let user = service(state)
        .set_active(current_user.0.user_id, user_id, false)
        .await?;

    Ok(Json(UserResponse {
        message: "User deactivated".to_string(),
        user,
    }))
}

pub async fn activate_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserResponse>> {
    current_user.0.authorize(Role::can_manage_users)?;
    let user = service(state)
        .set_active(current_user.0.user_id, user_id, true)
        .await?;

    Ok(Json(UserResponse {
        message: "User reactivated".to_string(),
        user,
    }))
}
