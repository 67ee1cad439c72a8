//! Handlers for the task collection and individual tasks.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use taskboard::TaskDraft;
use taskboard::TaskQuery;
use taskboard_api::{
    CreateTaskRequest, MyTasksResponse, TaskResponse, UpdateTaskRequest, UpdateTaskResponse,
};

use crate::{
    error::AppError,
    extract::{JsonBody, TaskPath},
    middleware::auth::RequireUser,
};

use super::{ensure_owner, load_task, AppState};

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    JsonBody(req): JsonBody<CreateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = req.validate()?;
    let task = state
        .store
        .insert_task(TaskDraft::new(content, user.id.clone(), Utc::now()))
        .await?;

    tracing::info!(task_id = %task.id, user_id = %user.id, "task created");

    Ok((
        StatusCode::CREATED,
        Json(TaskResponse {
            message: "Task created successfully".into(),
            task,
        }),
    ))
}

/// `GET /api/tasks`
///
/// Public. Query keys are applied in order of first appearance; see
/// [`TaskQuery::parse`] for the rules.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, AppError> {
    let query = TaskQuery::parse(&pairs)?;
    let tasks = state.store.list_tasks().await?;
    Ok(Json(query.apply(tasks)))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    TaskPath(id): TaskPath,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(load_task(&state, &id).await?))
}

/// `PATCH /api/tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    TaskPath(id): TaskPath,
    JsonBody(req): JsonBody<UpdateTaskRequest>,
) -> Result<impl IntoResponse, AppError> {
    let patch = req.validate()?;
    let mut task = load_task(&state, &id).await?;
    ensure_owner(
        &task.user_id,
        &user,
        "Forbidden: You can only update your own tasks",
    )?;

    patch.apply(&mut task, Utc::now());
    state.store.replace_task(&task).await?;

    Ok(Json(UpdateTaskResponse {
        message: "Task updated successfully".into(),
        updated_task: task,
    }))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    TaskPath(id): TaskPath,
) -> Result<impl IntoResponse, AppError> {
    let task = load_task(&state, &id).await?;
    ensure_owner(
        &task.user_id,
        &user,
        "Forbidden: You can only delete your own tasks",
    )?;

    state.store.delete_task(&task.id).await?;
    tracing::info!(task_id = %task.id, user_id = %user.id, "task deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/tasks/{id}/complete`
pub async fn mark_complete(
    state: State<AppState>,
    user: RequireUser,
    path: TaskPath,
) -> Result<impl IntoResponse, AppError> {
    set_completion(state, user, path, true).await
}

/// `PATCH /api/tasks/{id}/incomplete`
pub async fn mark_incomplete(
    state: State<AppState>,
    user: RequireUser,
    path: TaskPath,
) -> Result<impl IntoResponse, AppError> {
    set_completion(state, user, path, false).await
}

async fn set_completion(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    TaskPath(id): TaskPath,
    completed: bool,
) -> Result<Json<TaskResponse>, AppError> {
    let mut task = load_task(&state, &id).await?;
    ensure_owner(
        &task.user_id,
        &user,
        "Forbidden: You can only update your own tasks",
    )?;

    task.completed = completed;
    task.updated_at = Utc::now();
    state.store.replace_task(&task).await?;

    let message = if completed {
        "Task marked as completed"
    } else {
        "Task marked as incomplete"
    };
    Ok(Json(TaskResponse {
        message: message.into(),
        task,
    }))
}

/// `GET /api/user/my-tasks`
pub async fn my_tasks(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<impl IntoResponse, AppError> {
    let mut data: Vec<_> = state
        .store
        .list_tasks()
        .await?
        .into_iter()
        .rev()
        .filter(|t| t.user_id == user.id)
        .collect();
    data.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(Json(MyTasksResponse {
        total_data: data.len(),
        data,
    }))
}
