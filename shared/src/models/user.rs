//! User accounts, roles and the payloads that manage them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Role of a user account.
///
/// Authorization decisions are methods on this enum so that adding a role
/// forces every decision to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Warehouse staff
    #[default]
    Stocker,
    Sales,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Stocker, Role::Sales];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Stocker => "stocker",
            Role::Sales => "sales",
        }
    }

    /// Create, update, activate and deactivate user accounts
    pub fn can_manage_users(&self) -> bool {
        match self {
            Role::Admin => true,
            Role::Stocker | Role::Sales => false,
        }
    }

    /// Remove products from the catalog
    pub fn can_delete_products(&self) -> bool {
        match self {
            Role::Admin => true,
            Role::Stocker | Role::Sales => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// Login credentials
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Admin-only creation of a user account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    #[serde(default)]
    pub role: Role,
}

/// Admin-only update of another account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
    pub role: Role,
}

/// Self-service profile update
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 2, max = 100))]
    pub first_name: String,
    #[validate(length(min = 2, max = 100))]
    pub last_name: String,
}

/// Self-service password change
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordInput {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_manages_users() {
        assert!(Role::Admin.can_manage_users());
        assert!(!Role::Stocker.can_manage_users());
        assert!(!Role::Sales.can_manage_users());
    }

    #[test]
    fn test_only_admin_deletes_products() {
        assert!(Role::Admin.can_delete_products());
        assert!(!Role::Stocker.can_delete_products());
        assert!(!Role::Sales.can_delete_products());
    }

    #[test]
    fn test_role_names() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
            assert_eq!(
                serde_json::to_string(&role).unwrap(),
                format!("\"{}\"", role.as_str())
            );
        }
        assert!("magasinier".parse::<Role>().is_err());
    }

    #[test]
    fn test_register_defaults_to_stocker() {
        let input: RegisterUserInput = serde_json::from_str(
            r#"{"email":"jean@stockapp.com","password":"secret1","first_name":"Jean","last_name":"Dupont"}"#,
        )
        .unwrap();
        assert_eq!(input.role, Role::Stocker);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_register_rejects_short_password() {
        let input: RegisterUserInput = serde_json::from_str(
            r#"{"email":"jean@stockapp.com","password":"123","first_name":"Jean","last_name":"Dupont","role":"sales"}"#,
        )
        .unwrap();
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}
