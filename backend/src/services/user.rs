//! User account management

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::services::auth::{hash_password, verify_password};
use shared::{ChangePasswordInput, RegisterUserInput, Role, UpdateProfileInput, UpdateUserInput};

/// User service
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
    bcrypt_cost: u32,
}

/// A user account as exposed by the API; the password hash never leaves the database layer
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> AppResult<Role> {
        self.role
            .parse()
            .map_err(|e| AppError::Internal(format!("User {} has {}", self.id, e)))
    }
}

const USER_COLUMNS: &str = "id, email, first_name, last_name, role, is_active, created_at";

impl UserService {
    pub fn new(db: PgPool, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// All users, newest first
    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(users)
    }

    pub async fn get(&self, user_id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    pub async fn create(&self, input: RegisterUserInput) -> AppResult<User> {
        let email = input.email.trim().to_lowercase();
        self.ensure_email_free(&email, None).await?;

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;

        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&email)
        .bind(&password_hash)
        .bind(input.first_name.trim())
        .bind(input.last_name.trim())
        .bind(input.role.as_str())
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = user.id, role = %user.role, "User created");
        Ok(user)
    }

    pub async fn update(&self, user_id: i64, input: UpdateUserInput) -> AppResult<User> {
        let email = input.email.trim().to_lowercase();
        self.ensure_email_free(&email, Some(user_id)).await?;

        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $1, first_name = $2, last_name = $3, role = $4, updated_at = NOW()
            WHERE id = $5
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&email)
        .bind(input.first_name.trim())
        .bind(input.last_name.trim())
        .bind(input.role.as_str())
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    pub async fn update_profile(&self, user_id: i64, input: UpdateProfileInput) -> AppResult<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = $1, last_name = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(input.first_name.trim())
        .bind(input.last_name.trim())
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))
    }

    pub async fn change_password(&self, user_id: i64, input: ChangePasswordInput) -> AppResult<()> {
        let current_hash =
            sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        if !verify_password(&input.current_password, &current_hash)? {
            return Err(AppError::Validation {
                field: "current_password".to_string(),
                message: "Current password is incorrect".to_string(),
                message_fr: "Mot de passe actuel incorrect".to_string(),
            });
        }

        let new_hash = hash_password(&input.new_password, self.bcrypt_cost)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(&self.db)
            .await?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    /// Activate or deactivate an account; admins cannot lock themselves out
    pub async fn set_active(&self, actor_id: i64, user_id: i64, active: bool) -> AppResult<User> {
        if !active && actor_id == user_id {
            return Err(AppError::Validation {
                field: "id".to_string(),
                message: "You cannot deactivate your own account".to_string(),
                message_fr: "Vous ne pouvez pas désactiver votre propre compte".to_string(),
            });
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_active = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
        ))
        .bind(active)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        tracing::info!(user_id, actor_id, active, "User activation changed");
        Ok(user)
    }

    async fn ensure_email_free(&self, email: &str, except: Option<i64>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::Conflict {
                resource: "email".to_string(),
                message: "A user with this email already exists".to_string(),
                message_fr: "Un utilisateur avec cet email existe déjà".to_string(),
            });
        }
        Ok(())
    }
}
