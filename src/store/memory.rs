//! In-memory task store (non-persistent).

use super::{now_string, NewTask, StoreError, Task, TaskStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<i64, Task>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| t.deleted_at.is_none())
            .cloned()
            .collect();
        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    async fn find_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        Ok(self
            .tasks
            .read()
            .await
            .get(&id)
            .filter(|t| t.deleted_at.is_none())
            .cloned())
    }

    async fn create_task(&self, draft: NewTask) -> Result<Task, StoreError> {
        let now = now_string();
        let task = Task {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            title: draft.title,
            description: draft.description,
            completed: false,
            created_at: now.clone(),
            updated_at: now,
            deleted_at: None,
        };
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn save_task(&self, task: &Task) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let stored = tasks
            .get_mut(&task.id)
            .filter(|t| t.deleted_at.is_none())
            .ok_or(StoreError::NotFound(task.id))?;
        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.completed = task.completed;
        stored.updated_at = now_string();
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: i64) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&id).filter(|t| t.deleted_at.is_none()) {
            Some(task) => {
                task.deleted_at = Some(now_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
