pub mod extractors;
pub mod identity;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::CurrentUser;
pub use password::PasswordHasher;
pub use token::{Claims, TokenError, TokenKind, TokenPair, TokenService};

/// Form body of `POST /users/login/`, in the OAuth2 password-flow shape.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    /// The user's login.
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Body of `POST /users/refresh/`.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RefreshRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}
