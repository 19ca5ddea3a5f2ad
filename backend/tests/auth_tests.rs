//! Authentication and authorization tests
//!
//! Property-based and unit tests for:
//! - Access tokens: claims survive signing, tampering is rejected
//! - Role permission enforcement
//! - Account payload validation

use proptest::prelude::*;
use shared::{LoginInput, RegisterUserInput, Role};
use stock_server::error::AppError;
use stock_server::middleware::AuthUser;
use stock_server::services::auth::{decode_token, encode_token, hash_password, verify_password};
use validator::Validate;

const SECRET: &str = "integration-test-secret";

// ============================================================================
// Property Test Strategies
// ============================================================================

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![Just(Role::Admin), Just(Role::Stocker), Just(Role::Sales)]
}

fn email_strategy() -> impl Strategy<Value = String> {
    "[a-z]{3,10}@[a-z]{3,8}\\.(com|org|net|fr)"
}

fn password_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9!@#$%]{6,20}"
}

fn auth_user(role: Role) -> AuthUser {
    AuthUser {
        user_id: 1,
        email: "user@stock.local".to_string(),
        role,
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Identity and role read back from a token are the ones it was signed with
    #[test]
    fn prop_token_preserves_claims(
        user_id in 1i64..1_000_000,
        email in email_strategy(),
        role in role_strategy(),
        expiry in 60i64..86_400
    ) {
        let token = encode_token(user_id, &email, role, SECRET, expiry).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();

        prop_assert_eq!(claims.user_id().unwrap(), user_id);
        prop_assert_eq!(claims.email, email);
        prop_assert_eq!(claims.role, role);
        prop_assert_eq!(claims.exp - claims.iat, expiry);
    }

    /// A token signed with another secret never authenticates
    #[test]
    fn prop_foreign_secret_rejected(
        user_id in 1i64..1_000_000,
        role in role_strategy(),
        other_secret in "[a-z0-9]{8,32}"
    ) {
        prop_assume!(other_secret != SECRET);

        let token = encode_token(user_id, "user@stock.local", role, &other_secret, 3600).unwrap();

        prop_assert!(matches!(decode_token(&token, SECRET), Err(AppError::InvalidToken)));
    }

    /// Only admins pass the user management and product deletion checks
    #[test]
    fn prop_admin_only_permissions(role in role_strategy()) {
        let user = auth_user(role);
        let is_admin = role == Role::Admin;

        prop_assert_eq!(user.authorize(Role::can_manage_users).is_ok(), is_admin);
        prop_assert_eq!(user.authorize(Role::can_delete_products).is_ok(), is_admin);
    }

    /// Roles round-trip through their stored text form
    #[test]
    fn prop_role_text_round_trip(role in role_strategy()) {
        prop_assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
    }

    /// Well-formed registration payloads pass validation
    #[test]
    fn prop_valid_registration_accepted(
        email in email_strategy(),
        password in password_strategy(),
        role in role_strategy()
    ) {
        let input = RegisterUserInput {
            email,
            password,
            first_name: "Marie".to_string(),
            last_name: "Curie".to_string(),
            role,
        };

        prop_assert!(input.validate().is_ok());
    }

    /// Passwords shorter than six characters are refused
    #[test]
    fn prop_short_password_rejected(password in "[a-z0-9]{0,5}") {
        let input = RegisterUserInput {
            email: "new@stock.local".to_string(),
            password,
            first_name: "Marie".to_string(),
            last_name: "Curie".to_string(),
            role: Role::Stocker,
        };

        prop_assert!(input.validate().is_err());
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let token = encode_token(1, "user@stock.local", Role::Sales, SECRET, -3600).unwrap();

        assert!(matches!(decode_token(&token, SECRET), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        assert!(matches!(
            decode_token("not.a.token", SECRET),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_and_invalid_tokens_are_unauthorized() {
        assert_eq!(AppError::TokenExpired.status().as_u16(), 401);
        assert_eq!(AppError::InvalidToken.status().as_u16(), 401);
        assert_eq!(AppError::InsufficientPermissions.status().as_u16(), 403);
    }

    #[test]
    fn test_denied_permission_is_forbidden() {
        let err = auth_user(Role::Stocker)
            .authorize(Role::can_manage_users)
            .unwrap_err();

        assert!(matches!(err, AppError::InsufficientPermissions));
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("manager".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_default_role_is_stocker() {
        let input: RegisterUserInput = serde_json::from_str(
            r#"{"email":"a@b.fr","password":"secret1","first_name":"Jo","last_name":"Doe"}"#,
        )
        .unwrap();

        assert_eq!(input.role, Role::Stocker);
    }

    #[test]
    fn test_password_hash_verifies_only_original() {
        let hash = hash_password("correct horse", 4).unwrap();

        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn test_login_requires_email_and_password() {
        let missing_password = LoginInput {
            email: "admin@stock.local".to_string(),
            password: String::new(),
        };
        let bad_email = LoginInput {
            email: "admin".to_string(),
            password: "secret".to_string(),
        };

        assert!(missing_password.validate().is_err());
        assert!(bad_email.validate().is_err());
    }
}
