pub mod clock;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserResponse;

// Re-export necessary items
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::AuthError;
pub use extractors::{AuthenticatedUser, Identity};
pub use middleware::{AuthMiddleware, AuthPolicy};
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};

/// Represents the payload for a user login request.
///
/// Only the email format is validated; a short password simply fails to match.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email)]
    pub email: String,
    /// User's password.
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address for the new account.
    /// Must be a valid email format.
    #[validate(email)]
    pub email: String,
    /// Password for the new account.
    /// Must be at least 6 characters long.
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub last_name: Option<String>,
    #[validate(url)]
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Response after a successful login: the bearer token and the user it belongs to.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Response to `POST /refresh-token`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub token: String,
    /// Validity window of the new token, in seconds.
    pub expires_in: i64,
    pub token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn register(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: None,
            last_name: None,
            avatar: None,
        }
    }

    #[test]
    fn test_login_request_validation() {
        let valid_login = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid_login.validate().is_ok());

        let invalid_email_login = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(invalid_email_login.validate().is_err());
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("a@b.com", "secret1").validate().is_ok());
        assert!(register("a@b.com", "secret").validate().is_ok());
        assert!(register("a@b.com", "short").validate().is_err());
        assert!(register("not-an-email", "secret1").validate().is_err());

        let mut with_avatar = register("a@b.com", "secret1");
        with_avatar.avatar = Some("not a url".to_string());
        assert!(with_avatar.validate().is_err());
    }

    #[test]
    fn test_register_request_optional_fields_default() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.com","password":"secret1"}"#).unwrap();
        assert!(req.name.is_none());
        assert!(req.last_name.is_none());
        assert!(req.avatar.is_none());
    }
}
