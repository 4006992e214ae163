//! Persistence seams.
//!
//! Services talk to `UserStore` and `TaskStore` only. `postgres` backs them with sqlx,
//! `memory` with process-local maps (tests and `STORAGE=memory` runs). Row-level
//! consistency is the backend's job; services hold no locks of their own.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskFilter, User};

pub use memory::{InMemoryTaskStore, InMemoryUserStore};
pub use postgres::{PgTaskStore, PgUserStore};

/// Message used by every backend when an email is taken.
pub const EMAIL_IN_USE: &str = "email already in use";

/// Credential store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user. Fails with `AppError::BadRequest` if the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Exact match on the already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// All users, ordered by id.
    async fn find_all(&self) -> Result<Vec<User>, AppError>;

    /// Overwrites the stored row with `user` and returns it with a fresh `updated_at`.
    /// Fails with `AppError::NotFound` if the row is gone.
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create(&self, task: &Task) -> Result<Task, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    /// One page of `user_id`'s tasks, newest first, plus the unpaged match count.
    async fn find_for_user(
        &self,
        user_id: i32,
        filter: &TaskFilter,
    ) -> Result<(Vec<Task>, i64), AppError>;

    /// Fails with `AppError::NotFound` if the row is gone.
    async fn update(&self, task: &Task) -> Result<Task, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Removes every task owned by `user_id`, returning how many went.
    async fn delete_for_user(&self, user_id: i32) -> Result<u64, AppError>;
}
