use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use crate::auth::password::MAX_PASSWORD_BYTES;

lazy_static! {
    // Logins are matched case-sensitively and may not contain whitespace.
    static ref LOGIN_REGEX: Regex = Regex::new(r"^\S+$").unwrap();
}

fn validate_password_bytes(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        let mut error = ValidationError::new("password_too_long");
        error.message = Some(format!("Password must be at most {} bytes", MAX_PASSWORD_BYTES).into());
        return Err(error);
    }
    Ok(())
}

/// A user record as stored in `user_table`.
///
/// Carries the password hash, so it is not `Serialize`; responses
/// go through [`UserResponse`].
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct User {
    pub id: i32,
    pub login: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Public representation of a user.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i32,
    pub login: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            login: user.login,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            registered_at: user.registered_at,
        }
    }
}

/// Registration payload.
#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(
        length(min = 1, max = 25),
        regex(path = "LOGIN_REGEX", message = "Login must not contain whitespace")
    )]
    pub login: String,
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

/// Profile update payload. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

/// A user about to be inserted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// Changes to a stored user, with any new password already hashed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserChanges {
    /// Overwrites only the fields that are present.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(password_hash) = &self.password_hash {
            user.password = password_hash.clone();
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(first_name) = &self.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &self.last_name {
            user.last_name = Some(last_name.clone());
        }
    }
}

/// Paging parameters for `GET /users/`.
pub type UserQuery = super::Paging;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn create(login: &str) -> UserCreate {
        UserCreate {
            login: login.to_string(),
            password: "pw1".to_string(),
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn test_user_create_validation() {
        assert!(create("alice").validate().is_ok());
        assert!(create(&"a".repeat(25)).validate().is_ok());

        assert!(create("").validate().is_err());
        assert!(create(&"a".repeat(26)).validate().is_err());
        assert!(create("alice smith").validate().is_err());

        let mut input = create("alice");
        input.email = Some("invalid-email".to_string());
        assert!(input.validate().is_err());

        let mut input = create("alice");
        input.password = String::new();
        assert!(input.validate().is_err());

        let mut input = create("alice");
        input.password = "p".repeat(MAX_PASSWORD_BYTES);
        assert!(input.validate().is_ok());
        input.password.push('!');
        assert!(input.validate().is_err());

        let update = UserUpdate {
            password: Some("p".repeat(MAX_PASSWORD_BYTES + 1)),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_user_response_hides_password() {
        let user = User {
            id: 7,
            login: "alice".into(),
            password: "$2b$04$hash".into(),
            email: Some("alice@example.com".into()),
            first_name: None,
            last_name: None,
            registered_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert_eq!(json["login"], "alice");
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_user_changes_apply_only_present_fields() {
        let mut user = User {
            id: 1,
            login: "alice".into(),
            password: "old-hash".into(),
            email: Some("alice@example.com".into()),
            first_name: Some("Alice".into()),
            last_name: None,
            registered_at: Utc::now(),
        };

        UserChanges {
            last_name: Some("Liddell".into()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.password, "old-hash");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
        assert_eq!(user.first_name.as_deref(), Some("Alice"));
        assert_eq!(user.last_name.as_deref(), Some("Liddell"));
    }
}
