use std::collections::HashSet;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};
use super::AuthError;
use crate::error::AppError;

/// Default validity window for issued tokens.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject of the token: the user's id, as a decimal string.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Parses the subject back into a user id.
    pub fn user_id(&self) -> Result<i32, AuthError> {
        self.sub.parse().map_err(|_| AuthError::InvalidToken)
    }
}

/// Issues and verifies HS256 bearer tokens.
///
/// The secret is handed in once at startup and never read from the environment
/// afterwards. Expiry is checked against the injected `Clock` rather than by
/// `jsonwebtoken`, so tests can pin time.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims =
            HashSet::from(["exp".to_string(), "sub".to_string()]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }

    /// Token service on the system clock with the default 24 hour window.
    pub fn with_secret(secret: &[u8]) -> Self {
        Self::new(
            secret,
            Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            Arc::new(SystemClock),
        )
    }

    /// Length of the validity window, in seconds.
    pub fn expires_in(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Mints a token for `user_id` valid from now until now + ttl.
    pub fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let issued_at = self.clock.now();
        let expiration = issued_at
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AppError::InternalServerError("Token expiry overflow".into()))?;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Re-issues a token with a fresh window for an already authenticated user.
    ///
    /// The caller's previous token is not consulted and stays valid until its own expiry.
    pub fn refresh(&self, user_id: i32) -> Result<String, AppError> {
        log::debug!("refreshing token for user {}", user_id);
        self.issue(user_id)
    }

    /// Verifies the signature, then the expiry, and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)?.claims;

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    const SECRET: &[u8] = b"test_secret_for_token_service";

    fn service_at(timestamp: i64) -> TokenService {
        let now = Utc.timestamp_opt(timestamp, 0).unwrap();
        TokenService::new(
            SECRET,
            Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
            Arc::new(FixedClock(now)),
        )
    }

    const ISSUED_AT: i64 = 1_700_000_000;
    const WINDOW: i64 = DEFAULT_TOKEN_TTL_HOURS * 3600;

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = service_at(ISSUED_AT);
        let token = tokens.issue(42).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.iat, ISSUED_AT);
        assert_eq!(claims.exp, ISSUED_AT + WINDOW);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_issue_is_deterministic_for_fixed_clock() {
        let tokens = service_at(ISSUED_AT);
        assert_eq!(tokens.issue(7).unwrap(), tokens.issue(7).unwrap());
    }

    #[test]
    fn test_token_valid_until_just_before_expiry() {
        let token = service_at(ISSUED_AT).issue(1).unwrap();

        assert!(service_at(ISSUED_AT + WINDOW - 1).verify(&token).is_ok());
        assert_eq!(
            service_at(ISSUED_AT + WINDOW).verify(&token),
            Err(AuthError::Expired)
        );
        assert_eq!(
            service_at(ISSUED_AT + WINDOW + 1).verify(&token),
            Err(AuthError::Expired)
        );
    }

    #[test]
    fn test_invalid_token_signature() {
        let other = TokenService::new(
            b"a_completely_different_secret",
            Duration::hours(1),
            Arc::new(FixedClock(Utc.timestamp_opt(ISSUED_AT, 0).unwrap())),
        );
        let token = other.issue(1).unwrap();

        assert_eq!(
            service_at(ISSUED_AT).verify(&token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_signature_checked_before_expiry() {
        let other = TokenService::new(
            b"a_completely_different_secret",
            Duration::hours(1),
            Arc::new(FixedClock(Utc.timestamp_opt(ISSUED_AT, 0).unwrap())),
        );
        let token = other.issue(1).unwrap();

        // Expired and forged at the same time: the forgery is what gets reported.
        assert_eq!(
            service_at(ISSUED_AT + WINDOW * 2).verify(&token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let tokens = service_at(ISSUED_AT);
        let token = tokens.issue(1).unwrap();
        let forged_claims = Claims {
            sub: "2".into(),
            iat: ISSUED_AT,
            exp: ISSUED_AT + WINDOW,
        };
        let forged_payload = encode(
            &Header::new(Algorithm::HS256),
            &forged_claims,
            &EncodingKey::from_secret(b"attacker"),
        )
        .unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        parts[1] = forged_parts[1];
        let spliced = parts.join(".");

        assert_eq!(tokens.verify(&spliced), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = Claims {
            sub: "1".into(),
            iat: ISSUED_AT,
            exp: ISSUED_AT + WINDOW,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            service_at(ISSUED_AT).verify(&token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_eq!(
            service_at(ISSUED_AT).verify("not-a-jwt"),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn test_refresh_opens_new_window() {
        let first = service_at(ISSUED_AT).issue(5).unwrap();
        let later = service_at(ISSUED_AT + 3600);
        let refreshed = later.refresh(5).unwrap();

        assert_ne!(first, refreshed);
        let claims = later.verify(&refreshed).unwrap();
        assert_eq!(claims.iat, ISSUED_AT + 3600);
        assert_eq!(claims.exp, ISSUED_AT + 3600 + WINDOW);
        // The earlier token is still accepted.
        assert!(later.verify(&first).is_ok());
    }

    #[test]
    fn test_non_numeric_subject() {
        let claims = Claims {
            sub: "abc".into(),
            iat: 0,
            exp: 1,
        };
        assert_eq!(claims.user_id(), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_expires_in() {
        assert_eq!(service_at(ISSUED_AT).expires_in(), WINDOW);
    }
}
