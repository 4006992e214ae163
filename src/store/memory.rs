use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{TaskStore, UserStore, EMAIL_IN_USE};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskFilter, User};

#[derive(Debug, Default)]
struct UserTable {
    next_id: i32,
    rows: HashMap<i32, User>,
}

impl UserTable {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|user| user.email == email && Some(user.id) != except)
    }
}

/// In-memory implementation of `UserStore`.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut table = self.users.write().unwrap_or_else(|e| e.into_inner());
        if table.email_taken(&user.email, None) {
            return Err(AppError::BadRequest(EMAIL_IN_USE.into()));
        }

        table.next_id += 1;
        let now = Utc::now();
        let stored = User {
            id: table.next_id,
            email: user.email,
            password_hash: user.password_hash,
            name: user.name,
            last_name: user.last_name,
            avatar: user.avatar,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let table = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(table.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let table = self.users.read().unwrap_or_else(|e| e.into_inner());
        Ok(table.rows.values().find(|user| user.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let table = self.users.read().unwrap_or_else(|e| e.into_inner());
        let mut users: Vec<User> = table.rows.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<User, AppError> {
        let mut table = self.users.write().unwrap_or_else(|e| e.into_inner());
        if !table.rows.contains_key(&user.id) {
            return Err(AppError::NotFound("User not found".into()));
        }
        if table.email_taken(&user.email, Some(user.id)) {
            return Err(AppError::BadRequest(EMAIL_IN_USE.into()));
        }

        let mut stored = user.clone();
        stored.updated_at = Utc::now();
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut table = self.users.write().unwrap_or_else(|e| e.into_inner());
        Ok(table.rows.remove(&id).is_some())
    }
}

/// In-memory implementation of `TaskStore`.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<Uuid, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());
        Ok(tasks.get(&id).cloned())
    }

    async fn find_for_user(
        &self,
        user_id: i32,
        filter: &TaskFilter,
    ) -> Result<(Vec<Task>, i64), AppError> {
        let needle = filter.search_term().map(str::to_lowercase);
        let tasks = self.tasks.read().unwrap_or_else(|e| e.into_inner());

        let mut matching: Vec<Task> = tasks
            .values()
            .filter(|task| task.user_id == user_id)
            .filter(|task| match &needle {
                Some(needle) => task.title.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
            .collect();
        Ok((page, total))
    }

    async fn update(&self, task: &Task) -> Result<Task, AppError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        match tasks.get_mut(&task.id) {
            Some(stored) => {
                *stored = task.clone();
                Ok(task.clone())
            }
            None => Err(AppError::NotFound("Task not found".into())),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        Ok(tasks.remove(&id).is_some())
    }

    async fn delete_for_user(&self, user_id: i32) -> Result<u64, AppError> {
        let mut tasks = self.tasks.write().unwrap_or_else(|e| e.into_inner());
        let before = tasks.len();
        tasks.retain(|_, task| task.user_id != user_id);
        Ok((before - tasks.len()) as u64)
    }
}
