//! Authentication service: login, token issuance and password hashing

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::user::User;
use shared::{LoginInput, Role};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn user_id(&self) -> AppResult<i64> {
        self.sub.parse().map_err(|_| AppError::InvalidToken)
    }
}

/// Token returned by login and refresh
#[derive(Debug, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: AuthToken,
    pub user: User,
}

#[derive(Debug, FromRow)]
struct Credentials {
    id: i64,
    password_hash: String,
}

impl AuthService {
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Authenticate an active user with email and password
    pub async fn login(&self, input: &LoginInput) -> AppResult<LoginResponse> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash FROM users WHERE email = $1 AND is_active = true",
        )
        .bind(input.email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&input.password, &credentials.password_hash)? {
            tracing::info!(user_id = credentials.id, "Rejected login: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let user = self.active_user(credentials.id).await?;
        let token = self.issue(&user)?;
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");

        Ok(LoginResponse { token, user })
    }

    /// Issue a fresh token if the account is still active
    pub async fn refresh(&self, user_id: i64) -> AppResult<AuthToken> {
        let user = self.active_user(user_id).await?;
        self.issue(&user)
    }

    async fn active_user(&self, user_id: i64) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, role, is_active, created_at
            FROM users
            WHERE id = $1 AND is_active = true
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized {
            message: "Account is disabled or no longer exists".to_string(),
            message_fr: "Compte désactivé ou inexistant".to_string(),
        })
    }

    fn issue(&self, user: &User) -> AppResult<AuthToken> {
        let role = user.role()?;
        let token = encode_token(
            user.id,
            &user.email,
            role,
            &self.jwt_secret,
            self.access_token_expiry,
        )?;

        Ok(AuthToken {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}

/// Sign an HS256 access token
pub fn encode_token(
    user_id: i64,
    email: &str,
    role: Role,
    secret: &str,
    expiry_secs: i64,
) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// Validate signature and expiry and return the claims
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}

pub fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
}
