pub mod repository;
pub mod service;

pub use repository::{SqliteTaskRepository, Task, TaskRepository};
pub use service::TaskService;

/// Errors returned by the task service.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(String),
    #[error("title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
