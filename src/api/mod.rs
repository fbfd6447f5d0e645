//! HTTP API for taskdeck.
//!
//! ## Endpoints
//!
//! - `GET /api/health` - Health check
//! - `GET /api/tasks` - List all tasks
//! - `POST /api/tasks` - Create a task
//! - `GET /api/tasks/{id}` - Get a single task
//! - `PATCH /api/tasks/{id}` - Partially update a task
//! - `PATCH /api/tasks/{id}/toggle` - Toggle task completion
//! - `DELETE /api/tasks/{id}` - Soft-delete a task

mod routes;
mod tasks;
pub mod types;

pub use routes::serve;
pub use types::*;
