use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use super::AuthError;
use crate::error::AppError;

/// Request-scoped identity placed in the request extensions by `AuthMiddleware`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i32,
}

/// Extracts the authenticated user's ID from request extensions.
///
/// Fails with 401 when the gate let the request through anonymously (or did not
/// run at all). Use `Option<AuthenticatedUser>` on handlers that accept anonymous
/// callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i32);

impl AuthenticatedUser {
    pub fn id(&self) -> i32 {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Identity>() {
            Some(identity) => ready(Ok(AuthenticatedUser(identity.user_id))),
            None => ready(Err(AppError::Unauthorized(AuthError::MissingToken).into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::Payload;
    use actix_web::http::StatusCode;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_success() {
        let req = test::TestRequest::default().to_http_request();
        req.extensions_mut().insert(Identity { user_id: 123 });

        let mut payload = Payload::None;
        let extracted = AuthenticatedUser::from_request(&req, &mut payload).await;
        assert_eq!(extracted.unwrap().id(), 123);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_failure() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_optional_extractor_is_none_for_anonymous() {
        let req = test::TestRequest::default().to_http_request();

        let mut payload = Payload::None;
        let extracted = Option::<AuthenticatedUser>::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert!(extracted.is_none());
    }
}
