use std::sync::Arc;

use actix_web::web;

use crate::auth::{PasswordHasher, TokenService};
use crate::error::AppError;
use crate::services::{TaskService, UserService};
use crate::store::{TaskStore, UserStore};

/// Everything the HTTP layer shares across workers.
///
/// Built once at startup and cloned into each worker's `App`.
#[derive(Clone)]
pub struct AppState {
    pub users: web::Data<UserService>,
    pub tasks: web::Data<TaskService>,
    pub tokens: web::Data<TokenService>,
}

impl AppState {
    pub fn new(
        user_store: Arc<dyn UserStore>,
        task_store: Arc<dyn TaskStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenService>,
    ) -> Result<Self, AppError> {
        let users = UserService::new(user_store, task_store.clone(), hasher, tokens.clone())?;
        Ok(Self {
            users: web::Data::new(users),
            tasks: web::Data::new(TaskService::new(task_store)),
            tokens: web::Data::from(tokens),
        })
    }

    /// Token service handle for the auth gates.
    pub fn token_service(&self) -> Arc<TokenService> {
        self.tokens.clone().into_inner()
    }
}
