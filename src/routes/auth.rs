use crate::{
    auth::{
        AuthResponse, AuthenticatedUser, LoginRequest, RefreshResponse, RegisterRequest,
        RegisterResponse, TokenService,
    },
    error::AppError,
    services::UserService,
};
use actix_web::{post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

/// Register a new user
///
/// Creates a new account and returns it without a token; the client logs in next.
#[post("/register")]
pub async fn register(
    users: web::Data<UserService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let user = users.register(register_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".into(),
        user: user.into(),
    }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token.
#[post("/login")]
pub async fn login(
    users: web::Data<UserService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let (user, token) = users.login(&login_data.email, &login_data.password).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Issues a fresh token for the bearer of a still-valid one.
///
/// The presented token is not revoked.
pub async fn refresh_token(
    tokens: web::Data<TokenService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let token = tokens.refresh(user.id())?;

    Ok(HttpResponse::Ok().json(RefreshResponse {
        token,
        expires_in: tokens.expires_in(),
        token_type: "Bearer".into(),
    }))
}

/// Tokens are stateless, so logging out means the client drops its token.
#[post("/logout")]
pub async fn logout() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "message": "Successfully logged out",
        "instructions": "Please remove the token from client storage"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::PasswordHasher;
    use crate::state::AppState;
    use crate::store::{InMemoryTaskStore, InMemoryUserStore};
    use actix_web::{test, App};
    use std::sync::Arc;

    fn state() -> AppState {
        AppState::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryTaskStore::new()),
            PasswordHasher::new(4),
            Arc::new(TokenService::with_secret(b"route-test-secret")),
        )
        .unwrap()
    }

    #[actix_rt::test]
    async fn test_register_validation() {
        let state = state();
        let app = test::init_service(
            App::new()
                .app_data(crate::routes::json_config())
                .app_data(state.users.clone())
                .service(register),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "email": "invalid-email",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = test::TestRequest::post()
            .uri("/register")
            .set_json(json!({
                "email": "test@example.com",
                "password": "short"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = test::TestRequest::post()
            .uri("/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn test_login_validation() {
        let state = state();
        let app = test::init_service(
            App::new()
                .app_data(state.users.clone())
                .service(login),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({
                "email": "invalid-email",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({
                "email": "nobody@example.com",
                "password": "password123"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn test_logout_is_stateless() {
        let app = test::init_service(App::new().service(logout)).await;

        let req = test::TestRequest::post().uri("/logout").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["message"], "Successfully logged out");
    }
}
