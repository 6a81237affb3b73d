use std::sync::Arc;

use tracing::info;

use super::repository::{Task, TaskRepository};
use super::TaskError;

/// The four task operations: list, create, toggle-complete, delete.
///
/// Holds no state between requests; every call goes through the repository.
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    /// All tasks, newest first. Read-only.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskError> {
        Ok(self.repo.list().await?)
    }

    /// Persist a new task with completed = false.
    ///
    /// Empty and whitespace-only titles are rejected; otherwise the title is
    /// stored as submitted.
    pub async fn create_task(&self, title: &str) -> Result<Task, TaskError> {
        if title.trim().is_empty() {
            return Err(TaskError::EmptyTitle);
        }
        let task = self.repo.create(title).await?;
        info!(id = %task.id, "task created");
        Ok(task)
    }

    /// Flip the completed flag. Calling twice restores the original value.
    pub async fn toggle_complete(&self, id: &str) -> Result<Task, TaskError> {
        let task = self
            .repo
            .get(id)
            .await?
            .ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let completed = !task.completed;
        if !self.repo.set_completed(id, completed).await? {
            // Row vanished between the fetch and the update.
            return Err(TaskError::NotFound(id.to_string()));
        }
        info!(id = %task.id, completed, "task toggled");
        Ok(Task { completed, ..task })
    }

    /// Remove a task permanently. Repeat calls on the same id fail with
    /// NotFound.
    pub async fn delete_task(&self, id: &str) -> Result<(), TaskError> {
        if !self.repo.delete(id).await? {
            return Err(TaskError::NotFound(id.to_string()));
        }
        info!(id, "task deleted");
        Ok(())
    }
}
