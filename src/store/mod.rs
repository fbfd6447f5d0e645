//! Task storage module with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database (default)

mod memory;
mod sqlite;

pub use memory::InMemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Maximum stored title length, in characters.
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum stored description length, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// A single to-do item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store. Immutable once assigned.
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
    /// Soft-delete marker. Deleted tasks stay in storage but are invisible
    /// to find/list and cannot be saved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

/// Fields for a task that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Error from a store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task {0} not found")]
    NotFound(i64),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Get current timestamp as RFC3339 string.
pub fn now_string() -> String {
    Utc::now().to_rfc3339()
}

/// Task store trait - implemented by all storage backends.
///
/// Each handler performs at most one read and one write; no transactional
/// composition across calls is provided.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// List tasks, ordered by id ascending. Soft-deleted tasks are excluded.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    /// Get a single task by id. `None` when absent or soft-deleted.
    async fn find_task(&self, id: i64) -> Result<Option<Task>, StoreError>;

    /// Create a new task. The store assigns the id and timestamps.
    async fn create_task(&self, draft: NewTask) -> Result<Task, StoreError>;

    /// Persist `task`'s title, description, and completed flag, stamping
    /// `updated_at`. Returns the stored copy.
    ///
    /// Fails with `StoreError::NotFound` when the row is absent or soft-deleted.
    async fn save_task(&self, task: &Task) -> Result<Task, StoreError>;

    /// Soft-delete a task. Returns `false` when no live row had that id.
    async fn delete_task(&self, id: i64) -> Result<bool, StoreError>;
}

/// Task store type selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskStoreType {
    Memory,
    #[default]
    Sqlite,
}

impl TaskStoreType {
    /// Parse from environment variable value.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "memory" => Self::Memory,
            "sqlite" | "db" => Self::Sqlite,
            _ => Self::default(),
        }
    }
}

impl std::fmt::Display for TaskStoreType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStoreType::Memory => write!(f, "memory"),
            TaskStoreType::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Create a task store based on type and configuration.
pub async fn create_task_store(
    store_type: TaskStoreType,
    database_path: PathBuf,
) -> Result<Box<dyn TaskStore>, StoreError> {
    match store_type {
        TaskStoreType::Memory => Ok(Box::new(InMemoryTaskStore::new())),
        TaskStoreType::Sqlite => {
            let store = SqliteTaskStore::new(database_path).await?;
            Ok(Box::new(store))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_monotonic_ids_and_starts_incomplete() {
        let store = InMemoryTaskStore::new();

        let first = store.create_task(draft("first")).await.expect("create");
        let second = store.create_task(draft("second")).await.expect("create");

        assert!(second.id > first.id, "ids must be monotonic");
        assert!(!first.completed, "new tasks start incomplete");
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn toggling_twice_restores_original_state() {
        let store = InMemoryTaskStore::new();
        let task = store.create_task(draft("flip me")).await.expect("create");

        let mut once = task.clone();
        once.completed = !once.completed;
        let once = store.save_task(&once).await.expect("first save");
        assert!(once.completed);

        let mut twice = once.clone();
        twice.completed = !twice.completed;
        let twice = store.save_task(&twice).await.expect("second save");

        assert_eq!(twice.completed, task.completed);
    }

    #[tokio::test]
    async fn save_on_missing_id_is_not_found() {
        let store = InMemoryTaskStore::new();
        let ghost = Task {
            id: 999,
            title: "ghost".to_string(),
            description: None,
            completed: false,
            created_at: now_string(),
            updated_at: now_string(),
            deleted_at: None,
        };

        let err = store.save_task(&ghost).await.expect_err("must fail");
        assert!(matches!(err, StoreError::NotFound(999)));
    }

    #[tokio::test]
    async fn delete_hides_task_from_find_and_list() {
        let store = InMemoryTaskStore::new();
        let keep = store.create_task(draft("keep")).await.expect("create");
        let gone = store.create_task(draft("gone")).await.expect("create");

        assert!(store.delete_task(gone.id).await.expect("delete"));

        let found = store.find_task(gone.id).await.expect("find");
        assert!(found.is_none(), "soft-deleted task must be invisible");

        let listed = store.list_tasks().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);
    }

    #[tokio::test]
    async fn delete_on_missing_id_returns_false() {
        let store = InMemoryTaskStore::new();
        assert!(!store.delete_task(42).await.expect("delete"));
    }

    #[test]
    fn store_type_parses_from_env_values() {
        assert_eq!(TaskStoreType::from_str("memory"), TaskStoreType::Memory);
        assert_eq!(TaskStoreType::from_str("sqlite"), TaskStoreType::Sqlite);
        assert_eq!(TaskStoreType::from_str("db"), TaskStoreType::Sqlite);
        assert_eq!(TaskStoreType::from_str("unknown"), TaskStoreType::Sqlite);
    }
}
