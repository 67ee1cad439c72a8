//! Handlers for comments on a task and replies to those comments.
//!
//! Comments and replies live inside their task record, so every mutation
//! loads the task, edits it in place, and writes the whole task back. Any
//! authenticated user may comment or reply; only the author may edit or
//! delete.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use taskboard::{Comment, Likes, RecordId, Reply, Task};
use taskboard_api::{CommentListResponse, CommentRequest, CommentResponse, ReplyResponse};

use crate::{
    error::AppError,
    extract::{CommentPath, JsonBody, ReplyPath, TaskPath},
    middleware::auth::RequireUser,
};

use super::{ensure_owner, load_task, AppState};

pub(crate) fn comment_not_found() -> AppError {
    AppError::NotFound("Comment not found".into())
}

pub(crate) fn reply_not_found() -> AppError {
    AppError::NotFound("Reply not found".into())
}

pub(crate) fn find_comment<'a>(
    task: &'a mut Task,
    id: &RecordId,
) -> Result<&'a mut Comment, AppError> {
    task.comment_mut(id).ok_or_else(comment_not_found)
}

pub(crate) fn find_reply<'a>(
    comment: &'a mut Comment,
    id: &RecordId,
) -> Result<&'a mut Reply, AppError> {
    comment.reply_mut(id).ok_or_else(reply_not_found)
}

/// `POST /api/tasks/{id}/comments`
pub async fn post_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    TaskPath(task_id): TaskPath,
    JsonBody(req): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let text = req.validate()?;
    let mut task = load_task(&state, &task_id).await?;

    let comment = Comment {
        id: state
            .store
            .id_scheme()
            .next(task.comments.iter().map(|c| &c.id)),
        user_id: user.id,
        username: user.username,
        text,
        date: Utc::now(),
        updated_at: None,
        replies: Vec::new(),
        likes: Likes::default(),
    };
    task.comments.push(comment.clone());
    state.store.replace_task(&task).await?;

    tracing::debug!(task_id = %task.id, comment_id = %comment.id, "comment added");

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment added successfully".into(),
            comment,
        }),
    ))
}

/// `GET /api/tasks/{id}/comments`
pub async fn list_comments(
    State(state): State<AppState>,
    TaskPath(task_id): TaskPath,
) -> Result<impl IntoResponse, AppError> {
    let task = load_task(&state, &task_id).await?;
    Ok(Json(CommentListResponse {
        task_id: task.id,
        comments: task.comments,
    }))
}

/// `POST /api/tasks/{id}/comment/{commentId}/reply`
pub async fn reply_to_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CommentPath { task, comment }: CommentPath,
    JsonBody(req): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let text = req.validate()?;
    let mut record = load_task(&state, &task).await?;
    let scheme = state.store.id_scheme();
    let parent = find_comment(&mut record, &comment)?;

    let reply = Reply {
        id: scheme.next(parent.replies.iter().map(|r| &r.id)),
        user_id: user.id,
        username: user.username,
        text,
        date: Utc::now(),
        updated_at: None,
        likes: Likes::default(),
    };
    parent.replies.push(reply.clone());
    state.store.replace_task(&record).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReplyResponse {
            message: "Reply added successfully".into(),
            reply,
        }),
    ))
}

/// `PATCH /api/tasks/{id}/comments/{commentId}`
pub async fn edit_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CommentPath { task, comment }: CommentPath,
    JsonBody(req): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let text = req.validate()?;
    let mut record = load_task(&state, &task).await?;
    let target = find_comment(&mut record, &comment)?;
    ensure_owner(
        &target.user_id,
        &user,
        "Forbidden: You can only edit your own comments",
    )?;

    target.text = text;
    target.updated_at = Some(Utc::now());
    let updated = target.clone();
    state.store.replace_task(&record).await?;

    Ok(Json(CommentResponse {
        message: "Comment updated".into(),
        comment: updated,
    }))
}

/// `PATCH /api/tasks/{id}/comments/{commentId}/replies/{replyId}`
pub async fn edit_reply(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ReplyPath {
        task,
        comment,
        reply,
    }: ReplyPath,
    JsonBody(req): JsonBody<CommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let text = req.validate()?;
    let mut record = load_task(&state, &task).await?;
    let target = find_reply(find_comment(&mut record, &comment)?, &reply)?;
    ensure_owner(
        &target.user_id,
        &user,
        "Forbidden: You can only edit your own replies",
    )?;

    target.text = text;
    target.updated_at = Some(Utc::now());
    let updated = target.clone();
    state.store.replace_task(&record).await?;

    Ok(Json(ReplyResponse {
        message: "Reply updated".into(),
        reply: updated,
    }))
}

/// `DELETE /api/tasks/{id}/comments/{commentId}`
///
/// Replies go with their comment.
pub async fn delete_comment(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    CommentPath { task, comment }: CommentPath,
) -> Result<impl IntoResponse, AppError> {
    let mut record = load_task(&state, &task).await?;
    let target = record.comment(&comment).ok_or_else(comment_not_found)?;
    ensure_owner(
        &target.user_id,
        &user,
        "Forbidden: You can only delete your own comments",
    )?;

    record.comments.retain(|c| c.id != comment);
    state.store.replace_task(&record).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/tasks/{id}/comments/{commentId}/replies/{replyId}`
pub async fn delete_reply(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ReplyPath {
        task,
        comment,
        reply,
    }: ReplyPath,
) -> Result<impl IntoResponse, AppError> {
    let mut record = load_task(&state, &task).await?;
    let parent = find_comment(&mut record, &comment)?;
    let target = parent.reply(&reply).ok_or_else(reply_not_found)?;
    ensure_owner(
        &target.user_id,
        &user,
        "Forbidden: You can only delete your own replies",
    )?;

    parent.replies.retain(|r| r.id != reply);
    state.store.replace_task(&record).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use taskboard::RecordId;

    use crate::handlers::test_support::{app, create_task, login_as, multi_user_app, send};
    use crate::storage::Store;

    #[tokio::test]
    async fn anyone_signed_in_may_comment() {
        let (app, _) = multi_user_app();
        let ada = login_as(&app, "ada").await;
        let bob = login_as(&app, "bob").await;
        create_task(&app, &ada, "Write").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/tasks/1/comments",
            Some(&bob),
            Some(json!({"text": "  Nice  "})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["comment"]["id"], 1);
        assert_eq!(body["comment"]["username"], "bob");
        assert_eq!(body["comment"]["text"], "Nice");

        let (status, body) = send(&app, Method::GET, "/api/tasks/1/comments", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["taskId"], 1);
        assert_eq!(body["comments"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn blank_comment_is_rejected() {
        let (app, store) = app();
        let token = login_as(&app, "ada").await;
        create_task(&app, &token, "Write").await;

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/tasks/1/comments",
            Some(&token),
            Some(json!({"text": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let task = store.get_task(&RecordId::Seq(1)).await.unwrap().unwrap();
        assert!(task.comments.is_empty());
    }

    #[tokio::test]
    async fn comment_on_missing_task_is_404() {
        let (app, _) = app();
        let token = login_as(&app, "ada").await;
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/tasks/7/comments",
            Some(&token),
            Some(json!({"text": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Task not found");
    }

    #[tokio::test]
    async fn replies_get_their_own_ids() {
        let (app, _) = app();
        let token = login_as(&app, "ada").await;
        create_task(&app, &token, "Write").await;
        send(
            &app,
            Method::POST,
            "/api/tasks/1/comments",
            Some(&token),
            Some(json!({"text": "first"})),
        )
        .await;

        for expected in 1..=2 {
            let (status, body) = send(
                &app,
                Method::POST,
                "/api/tasks/1/comment/1/reply",
                Some(&token),
                Some(json!({"text": "reply"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["reply"]["id"], expected);
        }

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/tasks/1/comment/5/reply",
            Some(&token),
            Some(json!({"text": "reply"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Comment not found");
    }

    #[tokio::test]
    async fn only_the_author_edits_or_deletes() {
        let (app, store) = multi_user_app();
        let ada = login_as(&app, "ada").await;
        let bob = login_as(&app, "bob").await;
        create_task(&app, &ada, "Write").await;
        send(
            &app,
            Method::POST,
            "/api/tasks/1/comments",
            Some(&bob),
            Some(json!({"text": "from bob"})),
        )
        .await;

        // The task owner is not the comment author.
        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/tasks/1/comments/1",
            Some(&ada),
            Some(json!({"text": "edited"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Forbidden: You can only edit your own comments");

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/tasks/1/comments/1",
            Some(&bob),
            Some(json!({"text": "edited"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comment"]["text"], "edited");
        assert!(body["comment"]["updatedAt"].is_string());

        let (status, _) =
            send(&app, Method::DELETE, "/api/tasks/1/comments/1", Some(&ada), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) =
            send(&app, Method::DELETE, "/api/tasks/1/comments/1", Some(&bob), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let task = store.get_task(&RecordId::Seq(1)).await.unwrap().unwrap();
        assert!(task.comments.is_empty());
    }

    #[tokio::test]
    async fn reply_edit_and_delete() {
        let (app, store) = multi_user_app();
        let ada = login_as(&app, "ada").await;
        let bob = login_as(&app, "bob").await;
        create_task(&app, &ada, "Write").await;
        send(
            &app,
            Method::POST,
            "/api/tasks/1/comments",
            Some(&ada),
            Some(json!({"text": "question"})),
        )
        .await;
        send(
            &app,
            Method::POST,
            "/api/tasks/1/comment/1/reply",
            Some(&bob),
            Some(json!({"text": "answer"})),
        )
        .await;

        let (status, _) = send(
            &app,
            Method::PATCH,
            "/api/tasks/1/comments/1/replies/1",
            Some(&ada),
            Some(json!({"text": "nope"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            &app,
            Method::PATCH,
            "/api/tasks/1/comments/1/replies/1",
            Some(&bob),
            Some(json!({"text": "better answer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Reply updated");
        assert_eq!(body["reply"]["text"], "better answer");

        let (status, body) = send(
            &app,
            Method::DELETE,
            "/api/tasks/1/comments/1/replies/9",
            Some(&bob),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Reply not found");

        let (status, _) = send(
            &app,
            Method::DELETE,
            "/api/tasks/1/comments/1/replies/1",
            Some(&bob),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let task = store.get_task(&RecordId::Seq(1)).await.unwrap().unwrap();
        assert!(task.comments[0].replies.is_empty());
    }
}
