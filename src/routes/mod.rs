pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use actix_web::web;

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::state::AppState;

/// Rejects unreadable JSON bodies with the usual `{"error": ...}` 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        AppError::BadRequest(format!("Invalid JSON payload: {}", err)).into()
    })
}

/// Mounts the `/api/v1` routes with their auth gates.
///
/// Register, login and logout are public. `/refresh-token` sits behind the
/// required gate. Everything under `/protected` sits behind the optional gate
/// and relies on the `AuthenticatedUser` extractor to turn away anonymous callers.
pub fn config(cfg: &mut web::ServiceConfig, state: &AppState) {
    let tokens = state.token_service();

    cfg.app_data(json_config())
        .app_data(state.users.clone())
        .app_data(state.tasks.clone())
        .app_data(state.tokens.clone())
        .service(
            web::scope("/api/v1")
                .service(auth::register)
                .service(auth::login)
                .service(auth::logout)
                .service(
                    web::resource("/refresh-token")
                        .route(web::post().to(auth::refresh_token))
                        .wrap(AuthMiddleware::required(tokens.clone())),
                )
                .service(
                    web::scope("/protected")
                        .wrap(AuthMiddleware::optional(tokens))
                        .service(users::me)
                        .service(
                            web::scope("/users")
                                .service(users::list_users)
                                .service(users::get_user)
                                .service(users::update_user)
                                .service(users::delete_user),
                        )
                        .service(
                            web::scope("/tasks")
                                .service(tasks::get_tasks)
                                .service(tasks::create_task)
                                .service(tasks::get_task)
                                .service(tasks::update_task)
                                .service(tasks::delete_task),
                        ),
                ),
        );
}
