//! HTTP request handlers for every Taskboard operation.
//!
//! Each submodule covers a logical group of operations. Handlers are async
//! functions that receive extractors and return
//! `Result<impl IntoResponse, AppError>`. They all follow the same shape:
//! authenticate, parse the body, validate, locate the record, check
//! ownership, mutate, persist, respond. Nothing is written until every check
//! has passed.
//!
//! All ownership logic lives here, not in storage.

pub mod auth;
pub mod comments;
pub mod likes;
pub mod tasks;

use std::sync::Arc;

use axum::Json;
use taskboard::{RecordId, Task, User};
use taskboard_api::MessageResponse;

use crate::{config::ServerConfig, error::AppError, storage::Store};

/// Shared application state threaded through all handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: ServerConfig,
}

/// `GET /`
pub async fn health() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Taskboard API is running".into(),
    })
}

/// Load a task or fail with 404 `Task not found`.
pub(crate) async fn load_task(state: &AppState, id: &RecordId) -> Result<Task, AppError> {
    state
        .store
        .get_task(id)
        .await?
        .ok_or_else(AppError::task_not_found)
}

/// 403 with `message` unless `user` is `owner`.
pub(crate) fn ensure_owner(owner: &RecordId, user: &User, message: &str) -> Result<(), AppError> {
    if owner == &user.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------
