use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

/// One persisted to-do item.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// RFC 3339 UTC timestamp, set on insert and never updated.
    pub created_at: String,
}

/// Storage seam for task records.
///
/// Object-safe so the service can run against any storage backend.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task with a store-assigned id and timestamp.
    async fn create(&self, title: &str) -> Result<Task>;

    /// All tasks, newest first.
    async fn list(&self) -> Result<Vec<Task>>;

    /// Fetch a task by id.
    async fn get(&self, id: &str) -> Result<Option<Task>>;

    /// Set the completed flag. Returns false when no row matched.
    async fn set_completed(&self, id: &str, completed: bool) -> Result<bool>;

    /// Remove a task permanently. Returns false when no row matched.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// SQLite-backed repository over the shared connection pool.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, title: &str) -> Result<Task> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        sqlx::query("INSERT INTO tasks (id, title, completed, created_at) VALUES (?, ?, 0, ?)")
            .bind(&id)
            .bind(title)
            .bind(&now)
            .execute(&self.pool)
            .await?;
        self.get(&id)
            .await?
            .ok_or_else(|| anyhow!("task not found after insert"))
    }

    async fn list(&self) -> Result<Vec<Task>> {
        // rowid breaks created_at ties so same-instant inserts still list newest first.
        Ok(
            sqlx::query_as("SELECT * FROM tasks ORDER BY created_at DESC, rowid DESC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn set_completed(&self, id: &str, completed: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE tasks SET completed = ? WHERE id = ?")
            .bind(completed)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
