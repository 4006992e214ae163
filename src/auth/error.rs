//! Authentication failures.
//!
//! Every variant surfaces as HTTP 401 through `AppError::Unauthorized`. The display
//! strings are the client-facing messages, so they never mention whether an email exists.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the response does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Signature does not match the active secret, or the token uses another algorithm.
    #[error("invalid token signature")]
    InvalidSignature,

    /// `now` is at or past the token's `exp`.
    #[error("token has expired")]
    Expired,

    /// Token is not a structurally valid JWT or its claims cannot be read.
    #[error("invalid token")]
    InvalidToken,

    /// `Authorization` header present but not of the form `Bearer <token>`.
    #[error("invalid authorization format")]
    MalformedHeader,

    /// No `Authorization` header on a route that requires one.
    #[error("missing authorization token")]
    MissingToken,
}

impl AuthError {
    /// True for failures produced while verifying a presented token.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature | AuthError::Expired | AuthError::InvalidToken
        )
    }
}

/// Maps `jsonwebtoken` failures onto the verifier's taxonomy.
impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match error.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidToken,
        }
    }
}
