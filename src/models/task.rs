use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Default number of tasks per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on `limit` accepted from clients.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters.
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// Partial update of a task. Only present fields change.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Identifier of the user who owns the task.
    pub user_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet completed `Task` owned by `user_id`.
    /// Sets `created_at` and `updated_at` to the current time and `id` to a new UUID.
    pub fn new(input: TaskInput, user_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            is_completed: false,
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the present fields of `update` and bumps `updated_at`.
    pub fn apply(&mut self, update: TaskUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(is_completed) = update.is_completed {
            self.is_completed = is_completed;
        }
        self.updated_at = Utc::now();
    }
}

/// Query parameters for listing tasks.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TaskFilter {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip. Saturates for page numbers past any real result set.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// The search term, ignoring blank input.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskEdge {
    pub node: Task,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub total_count: i64,
}

/// One page of tasks plus paging metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConnection {
    pub edges: Vec<TaskEdge>,
    pub page_info: PageInfo,
}

impl TaskConnection {
    pub fn new(tasks: Vec<Task>, total_count: i64, filter: &TaskFilter) -> Self {
        let page = filter.page();
        Self {
            edges: tasks.into_iter().map(|node| TaskEdge { node }).collect(),
            page_info: PageInfo {
                has_next_page: page.saturating_mul(filter.limit()) < total_count,
                has_previous_page: page > 1,
                total_count,
            },
        }
    }
}
