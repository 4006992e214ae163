#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{json, Value};

use taskhub::auth::{PasswordHasher, TokenService};
use taskhub::state::AppState;
use taskhub::store::{InMemoryTaskStore, InMemoryUserStore};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

/// Application state over fresh in-memory stores, with a cheap bcrypt cost.
pub fn memory_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryTaskStore::new()),
        PasswordHasher::new(4),
        Arc::new(TokenService::with_secret(TEST_SECRET)),
    )
    .expect("failed to build test state")
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Registers `email` and logs in, returning the new user's id and token.
pub async fn register_and_login<S, B>(app: &S, email: &str, password: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "registration of {} failed", email);

    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "login of {} failed", email);

    let body: Value = test::read_body_json(resp).await;
    let id = body["user"]["id"].as_i64().expect("user id in login response");
    let token = body["token"]
        .as_str()
        .expect("token in login response")
        .to_string();
    (id, token)
}
