use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{UserResponse, UserUpdate},
    services::UserService,
};
use actix_web::{delete, get, put, web, HttpResponse, Responder};
use validator::Validate;

/// Returns the account behind the presented token.
///
/// ## Responses:
/// - `200 OK`: the caller's `UserResponse`.
/// - `401 Unauthorized`: no token was presented.
/// - `404 Not Found`: the account was deleted after the token was issued.
#[get("/me")]
pub async fn me(
    users: web::Data<UserService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = users.get(user.id()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

#[get("")]
pub async fn list_users(
    users: web::Data<UserService>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let all: Vec<UserResponse> = users
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(all))
}

#[get("/{id}")]
pub async fn get_user(
    users: web::Data<UserService>,
    user_id: web::Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = users.get(user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Updates the caller's own account. Only fields present in the body change.
///
/// ## Responses:
/// - `200 OK`: the updated `UserResponse`.
/// - `400 Bad Request`: validation failed or the new email is taken.
/// - `403 Forbidden`: `id` is not the caller's account.
#[put("/{id}")]
pub async fn update_user(
    users: web::Data<UserService>,
    user_id: web::Path<i32>,
    update: web::Json<UserUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    update.validate()?;

    let updated = users
        .update(user.id(), user_id.into_inner(), update.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// Deletes the caller's own account and all of its tasks.
#[delete("/{id}")]
pub async fn delete_user(
    users: web::Data<UserService>,
    user_id: web::Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    users.delete(user.id(), user_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
