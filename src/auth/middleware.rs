use std::sync::Arc;

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage, ResponseError,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use super::extractors::Identity;
use super::{AuthError, TokenService};
use crate::error::AppError;

/// What the gate does with a request that carries no `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Let the request through anonymously; handlers decide.
    Optional,
    /// Reject with 401.
    Required,
}

/// Bearer-token gate.
///
/// A present header must be exactly `Bearer <token>` and the token must verify;
/// either failure ends the request with 401 before the inner service runs. On
/// success an [`Identity`] is placed in the request extensions.
#[derive(Clone)]
pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
    policy: AuthPolicy,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>, policy: AuthPolicy) -> Self {
        Self { tokens, policy }
    }

    pub fn optional(tokens: Arc<TokenService>) -> Self {
        Self::new(tokens, AuthPolicy::Optional)
    }

    pub fn required(tokens: Arc<TokenService>) -> Self {
        Self::new(tokens, AuthPolicy::Required)
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: Arc::clone(&self.tokens),
            policy: self.policy,
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenService>,
    policy: AuthPolicy,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let outcome = match req.headers().get(header::AUTHORIZATION).map(|v| v.to_str()) {
            None => authenticate(None, &self.tokens, self.policy),
            Some(Ok(value)) => authenticate(Some(value), &self.tokens, self.policy),
            Some(Err(_)) => Err(AuthError::MalformedHeader),
        };

        match outcome {
            Ok(Some(identity)) => {
                req.extensions_mut().insert(identity);
            }
            Ok(None) => {}
            Err(err) => return reject(req, err),
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

/// Ends the request with the 401 rendering of `err`.
fn reject<B>(
    req: ServiceRequest,
    err: AuthError,
) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>>
where
    B: 'static,
{
    if err.is_token_error() {
        log::warn!("{} {} rejected: {}", req.method(), req.path(), err);
    } else {
        log::debug!("{} {} rejected: {}", req.method(), req.path(), err);
    }
    let response = AppError::from(err).error_response();
    Box::pin(ready(Ok(req.into_response(response).map_into_right_body())))
}

/// Splits `Bearer <token>`. Any other shape is a malformed header.
pub fn parse_bearer(header_value: &str) -> Result<&str, AuthError> {
    let mut parts = header_value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// The gate's decision for one request, independent of actix types.
///
/// `Ok(None)` means anonymous; only possible under [`AuthPolicy::Optional`].
pub fn authenticate(
    header_value: Option<&str>,
    tokens: &TokenService,
    policy: AuthPolicy,
) -> Result<Option<Identity>, AuthError> {
    let header_value = match header_value {
        Some(value) => value,
        None if policy == AuthPolicy::Optional => return Ok(None),
        None => return Err(AuthError::MissingToken),
    };

    let token = parse_bearer(header_value)?;
    let claims = tokens.verify(token)?;
    let user_id = claims.user_id()?;

    Ok(Some(Identity { user_id }))
}
