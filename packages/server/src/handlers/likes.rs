//! Like toggles for tasks, comments, and replies.
//!
//! The like flag is global to the record, not tracked per user. Under
//! [`LikePolicy::Owner`] only the record's owner may toggle it; under
//! [`LikePolicy::Any`] every authenticated user may. Toggling does not touch
//! `updatedAt`.

use axum::{extract::State, response::IntoResponse, Json};
use taskboard::{RecordId, User};
use taskboard_api::{CommentResponse, ReplyResponse, TaskResponse};

use crate::{
    config::LikePolicy,
    error::AppError,
    extract::{CommentPath, ReplyPath, TaskPath},
    middleware::auth::RequireUser,
};

use super::{
    comments::{find_comment, find_reply},
    ensure_owner, load_task, AppState,
};

fn check_policy(
    state: &AppState,
    owner: &RecordId,
    user: &User,
    message: &str,
) -> Result<(), AppError> {
    match state.config.like_policy {
        LikePolicy::Owner => ensure_owner(owner, user, message),
        LikePolicy::Any => Ok(()),
    }
}

fn toggle_message(kind: &str, liked: bool) -> String {
    if liked {
        format!("{kind} liked!")
    } else {
        format!("{kind} unliked!")
    }
}

/// `POST /api/tasks/{id}/like`
pub async fn like_task(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    TaskPath(id): TaskPath,
) -> Result<impl IntoResponse, AppError> {
    let mut task = load_task(&state, &id).await?;
    check_policy(
        &state,
        &task.user_id,
        &user,
        "Forbidden: You can only like/unlike your own task.",
    )?;

    let liked = task.likes.toggle();
    state.store.replace_task(&task).await?;

    Ok(Json(TaskResponse {
        message: toggle_message("Task", liked),
        task,
    }))
}

/// `POST /api/tasks/{id}/comments/{commentId}/like`
pub async fn like_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CommentPath { task, comment }: CommentPath,
) -> Result<impl IntoResponse, AppError> {
    let mut record = load_task(&state, &task).await?;
    let target = find_comment(&mut record, &comment)?;
    check_policy(
        &state,
        &target.user_id,
        &user,
        "Forbidden: You can only like/unlike your own comment.",
    )?;

    let liked = target.likes.toggle();
    let updated = target.clone();
    state.store.replace_task(&record).await?;

    Ok(Json(CommentResponse {
        message: toggle_message("Comment", liked),
        comment: updated,
    }))
}

/// `POST /api/tasks/{id}/comments/{commentId}/replies/{replyId}/like`
pub async fn like_reply(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ReplyPath {
        task,
        comment,
        reply,
    }: ReplyPath,
) -> Result<impl IntoResponse, AppError> {
    let mut record = load_task(&state, &task).await?;
    let target = find_reply(find_comment(&mut record, &comment)?, &reply)?;
    check_policy(
        &state,
        &target.user_id,
        &user,
        "Forbidden: You can only like/unlike your own reply.",
    )?;

    let liked = target.likes.toggle();
    let updated = target.clone();
    state.store.replace_task(&record).await?;

    Ok(Json(ReplyResponse {
        message: toggle_message("Reply", liked),
        reply: updated,
    }))
}
