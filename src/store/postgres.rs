use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskFilter, User};

/// Unique constraint on `users.email`.
pub const USERS_EMAIL_CONSTRAINT: &str = "users_email_key";

const USER_COLUMNS: &str =
    "id, email, password_hash, name, last_name, avatar, created_at, updated_at";
const TASK_COLUMNS: &str = "id, title, description, is_completed, user_id, created_at, updated_at";

/// `UserStore` over the `users` table.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        // A duplicate email trips the unique index; `From<sqlx::Error>` reports it.
        let sql = format!(
            "INSERT INTO users (email, password_hash, name, last_name, avatar) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.last_name)
            .bind(&user.avatar)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let users = sqlx::query_as::<_, User>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users \
             SET email = $1, password_hash = $2, name = $3, last_name = $4, avatar = $5, \
                 updated_at = NOW() \
             WHERE id = $6 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(&user.last_name)
            .bind(&user.avatar)
            .bind(user.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// `TaskStore` over the `tasks` table.
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Builds an `ILIKE` pattern that matches `term` literally.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "INSERT INTO tasks (id, title, description, is_completed, user_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            TASK_COLUMNS
        );
        let created = sqlx::query_as::<_, Task>(&sql)
            .bind(task.id)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.is_completed)
            .bind(task.user_id)
            .bind(task.created_at)
            .bind(task.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let sql = format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS);
        let task = sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(task)
    }

    async fn find_for_user(
        &self,
        user_id: i32,
        filter: &TaskFilter,
    ) -> Result<(Vec<Task>, i64), AppError> {
        let pattern = filter.search_term().map(contains_pattern);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tasks \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR title ILIKE $2)",
        )
        .bind(user_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "SELECT {} FROM tasks \
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR title ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4",
            TASK_COLUMNS
        );
        let tasks = sqlx::query_as::<_, Task>(&sql)
            .bind(user_id)
            .bind(&pattern)
            .bind(filter.limit())
            .bind(filter.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((tasks, total))
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let sql = format!(
            "UPDATE tasks \
             SET title = $1, description = $2, is_completed = $3, updated_at = $4 \
             WHERE id = $5 RETURNING {}",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(&task.title)
            .bind(&task.description)
            .bind(task.is_completed)
            .bind(task.updated_at)
            .bind(task.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_user(&self, user_id: i32) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
