//! SQLite-based task store.

use super::{now_string, NewTask, StoreError, Task, TaskStore};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    deleted_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
CREATE INDEX IF NOT EXISTS idx_tasks_deleted_at ON tasks(deleted_at);
"#;

const TASK_COLUMNS: &str = "id, title, description, completed, created_at, updated_at, deleted_at";

pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| StoreError::Storage(format!("create database dir: {}", e)))?;
            }
        }

        // Open database in blocking task
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .map_err(|e| StoreError::Storage(format!("open database: {}", e)))?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| StoreError::Storage(format!("run schema: {}", e)))?;
            Ok::<_, StoreError>(conn)
        })
        .await
        .map_err(|e| StoreError::Storage(format!("task join error: {}", e)))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn parse_row(row: &rusqlite::Row<'_>) -> Result<Task, rusqlite::Error> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        completed: row.get::<_, i64>(3)? != 0,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        deleted_at: row.get(6)?,
    })
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM tasks WHERE deleted_at IS NULL ORDER BY id ASC",
                    TASK_COLUMNS
                ))
                .map_err(|e| StoreError::Storage(e.to_string()))?;

            let tasks = stmt
                .query_map([], parse_row)
                .map_err(|e| StoreError::Storage(e.to_string()))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| StoreError::Storage(e.to_string()))?;

            Ok(tasks)
        })
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
    }

    async fn find_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.query_row(
                &format!(
                    "SELECT {} FROM tasks WHERE id = ?1 AND deleted_at IS NULL",
                    TASK_COLUMNS
                ),
                params![id],
                parse_row,
            )
            .optional()
            .map_err(|e| StoreError::Storage(e.to_string()))
        })
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
    }

    async fn create_task(&self, draft: NewTask) -> Result<Task, StoreError> {
        let conn = self.conn.clone();
        let now = now_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            conn.execute(
                "INSERT INTO tasks (title, description, completed, created_at, updated_at)
                 VALUES (?1, ?2, 0, ?3, ?3)",
                params![draft.title, draft.description, now],
            )
            .map_err(|e| StoreError::Storage(e.to_string()))?;

            let id = conn.last_insert_rowid();
            Ok(Task {
                id,
                title: draft.title,
                description: draft.description,
                completed: false,
                created_at: now.clone(),
                updated_at: now,
                deleted_at: None,
            })
        })
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
    }

    async fn save_task(&self, task: &Task) -> Result<Task, StoreError> {
        let conn = self.conn.clone();
        let now = now_string();
        let mut task = task.clone();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let rows = conn
                .execute(
                    "UPDATE tasks
                     SET title = ?1, description = ?2, completed = ?3, updated_at = ?4
                     WHERE id = ?5 AND deleted_at IS NULL",
                    params![
                        task.title,
                        task.description,
                        if task.completed { 1 } else { 0 },
                        now,
                        task.id,
                    ],
                )
                .map_err(|e| StoreError::Storage(e.to_string()))?;

            if rows == 0 {
                return Err(StoreError::NotFound(task.id));
            }

            task.updated_at = now;
            Ok(task)
        })
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
    }

    async fn delete_task(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.conn.clone();
        let now = now_string();

        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            let rows = conn
                .execute(
                    "UPDATE tasks SET deleted_at = ?1, updated_at = ?1
                     WHERE id = ?2 AND deleted_at IS NULL",
                    params![now, id],
                )
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| StoreError::Storage(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open_store(dir: &tempfile::TempDir) -> SqliteTaskStore {
        SqliteTaskStore::new(dir.path().join("tasks.db"))
            .await
            .expect("open store")
    }

    fn draft(title: &str, description: Option<&str>) -> NewTask {
        NewTask {
            title: title.to_string(),
            description: description.map(|s| s.to_string()),
        }
    }

    #[tokio::test]
    async fn tasks_survive_a_store_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");

        let created = {
            let store = open_store(&dir).await;
            store
                .create_task(draft("persist me", Some("details")))
                .await
                .expect("create")
        };

        let store = open_store(&dir).await;
        let found = store
            .find_task(created.id)
            .await
            .expect("find")
            .expect("task present");

        assert_eq!(found.title, "persist me");
        assert_eq!(found.description.as_deref(), Some("details"));
        assert!(!found.completed);
    }

    #[tokio::test]
    async fn save_persists_toggled_completion() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let task = store.create_task(draft("toggle", None)).await.expect("create");
        let mut toggled = task.clone();
        toggled.completed = !toggled.completed;
        store.save_task(&toggled).await.expect("save");

        let found = store
            .find_task(task.id)
            .await
            .expect("find")
            .expect("task present");
        assert!(found.completed);
        assert_eq!(found.created_at, task.created_at);
    }

    #[tokio::test]
    async fn save_on_missing_or_deleted_row_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let task = store.create_task(draft("doomed", None)).await.expect("create");
        assert!(store.delete_task(task.id).await.expect("delete"));

        let err = store.save_task(&task).await.expect_err("must fail");
        assert!(matches!(err, StoreError::NotFound(id) if id == task.id));
    }

    #[tokio::test]
    async fn deleted_tasks_are_excluded_from_list() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = open_store(&dir).await;

        let keep = store.create_task(draft("keep", None)).await.expect("create");
        let gone = store.create_task(draft("gone", None)).await.expect("create");
        assert!(store.delete_task(gone.id).await.expect("delete"));

        let listed = store.list_tasks().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, keep.id);

        // A second delete of the same id is a no-op.
        assert!(!store.delete_task(gone.id).await.expect("delete again"));
    }
}
