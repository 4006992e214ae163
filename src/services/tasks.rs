use std::sync::Arc;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Task, TaskConnection, TaskFilter, TaskInput, TaskUpdate};
use crate::store::TaskStore;

/// Task operations, always on behalf of one owner.
///
/// A task owned by someone else is reported exactly like a missing one.
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    pub async fn create(&self, user_id: i32, input: TaskInput) -> Result<Task, AppError> {
        let task = Task::new(input, user_id);
        self.tasks.create(&task).await
    }

    pub async fn get(&self, user_id: i32, id: Uuid) -> Result<Task, AppError> {
        match self.tasks.find_by_id(id).await? {
            Some(task) if task.user_id == user_id => Ok(task),
            _ => Err(AppError::NotFound("Task not found".into())),
        }
    }

    pub async fn list(&self, user_id: i32, filter: &TaskFilter) -> Result<TaskConnection, AppError> {
        let (tasks, total) = self.tasks.find_for_user(user_id, filter).await?;
        Ok(TaskConnection::new(tasks, total, filter))
    }

    pub async fn update(&self, user_id: i32, id: Uuid, update: TaskUpdate) -> Result<Task, AppError> {
        let mut task = self.get(user_id, id).await?;
        task.apply(update);
        self.tasks.update(&task).await
    }

    pub async fn delete(&self, user_id: i32, id: Uuid) -> Result<(), AppError> {
        self.get(user_id, id).await?;
        if !self.tasks.delete(id).await? {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }
}
