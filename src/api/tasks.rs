//! Task route handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;

use crate::store::{NewTask, Task, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use crate::util::{is_blank, truncate_chars};

use super::routes::AppState;
use super::types::{ApiResponse, CreateTaskRequest, ErrorResponse, UpdateTaskRequest};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ErrorResponse>;

/// List all live tasks.
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Task>> {
    let tasks = state.store.list_tasks().await?;
    Ok(Json(ApiResponse::ok(tasks)))
}

/// Get a single task.
pub async fn get_task(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Task> {
    let task = state
        .store
        .find_task(id)
        .await?
        .ok_or_else(|| ErrorResponse::not_found("Task not found"))?;
    Ok(Json(ApiResponse::ok(task)))
}

/// Create a new task. The title is required and must be non-empty after
/// trimming; over-length fields are truncated rather than rejected.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Task> {
    if is_blank(&req.title) {
        return Err(ErrorResponse::bad_request("Title is required"));
    }

    let draft = NewTask {
        title: truncate_chars(&req.title, MAX_TITLE_LEN),
        description: req
            .description
            .as_deref()
            .map(|d| truncate_chars(d, MAX_DESCRIPTION_LEN)),
    };

    let task = state.store.create_task(draft).await?;
    tracing::info!(id = task.id, "task created");
    Ok(Json(ApiResponse::ok(task)))
}

/// Apply a partial update. Only fields present in the payload are applied.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Task> {
    let mut task = state
        .store
        .find_task(id)
        .await?
        .ok_or_else(|| ErrorResponse::not_found("Task not found"))?;

    if let Some(title) = &req.title {
        if is_blank(title) {
            return Err(ErrorResponse::bad_request("Title cannot be empty"));
        }
        task.title = truncate_chars(title, MAX_TITLE_LEN);
    }
    if let Some(description) = &req.description {
        task.description = Some(truncate_chars(description, MAX_DESCRIPTION_LEN));
    }
    if let Some(completed) = req.completed {
        task.completed = completed;
    }

    let task = state.store.save_task(&task).await?;
    Ok(Json(ApiResponse::ok(task)))
}

/// Toggle a task's completion flag.
///
/// Read-modify-write with no optimistic-concurrency check; the last writer
/// wins, so two concurrent toggles of the same task may collapse into one.
pub async fn toggle_task(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Task> {
    let mut task = state
        .store
        .find_task(id)
        .await?
        .ok_or_else(|| ErrorResponse::not_found("Task not found"))?;

    task.completed = !task.completed;

    let task = state.store.save_task(&task).await?;
    tracing::info!(id = task.id, completed = task.completed, "task toggled");
    Ok(Json(ApiResponse::ok(task)))
}

/// Soft-delete a task.
pub async fn delete_task(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<()> {
    if !state.store.delete_task(id).await? {
        return Err(ErrorResponse::not_found("Task not found"));
    }
    tracing::info!(id, "task deleted");
    Ok(Json(ApiResponse::message("Task deleted")))
}
