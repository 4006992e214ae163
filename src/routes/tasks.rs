use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{TaskFilter, TaskInput, TaskUpdate},
    services::TaskService,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

/// Retrieves a page of tasks for the authenticated user.
///
/// Tasks are ordered by creation date, newest first.
///
/// ## Query Parameters:
/// - `search` (optional): case-insensitive substring of the title.
/// - `page` (optional): 1-based page number, defaults to 1.
/// - `limit` (optional): page size, defaults to 10 and is capped at 100.
///
/// ## Responses:
/// - `200 OK`: a `TaskConnection` with `edges` and `page_info`.
/// - `401 Unauthorized`: if the request lacks a valid authentication token.
#[get("")]
pub async fn get_tasks(
    tasks: web::Data<TaskService>,
    query_params: web::Query<TaskFilter>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let connection = tasks.list(user.id(), &query_params).await?;
    Ok(HttpResponse::Ok().json(connection))
}

/// Creates a new task for the authenticated user.
///
/// ## Request Body:
/// - `title`: 1 to 200 characters.
/// - `description` (optional): at most 1000 characters.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `400 Bad Request`: if validation fails.
/// - `401 Unauthorized`: if the request lacks a valid authentication token.
#[post("")]
pub async fn create_task(
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks.create(user.id(), task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a task by its ID.
///
/// A task owned by another user is reported as `404 Not Found`.
#[get("/{id}")]
pub async fn get_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let task = tasks.get(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task the user owns.
#[put("/{id}")]
pub async fn update_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = tasks
        .update(user.id(), task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

#[delete("/{id}")]
pub async fn delete_task(
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    tasks.delete(user.id(), task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
