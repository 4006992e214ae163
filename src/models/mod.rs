pub mod task;
pub mod user;

pub use task::{PageInfo, Task, TaskConnection, TaskEdge, TaskFilter, TaskInput, TaskUpdate};
pub use user::{normalize_email, NewUser, User, UserResponse, UserUpdate};
