//! Extractors for request bodies and matched path parameters.
//!
//! Path parameters are not captured by axum's router: every request goes
//! through [`dispatch`](crate::router::dispatch), which stores the
//! [`PathParams`] found by the route table in the request extensions. The
//! typed extractors here read them back.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use taskboard::RecordId;

use crate::{error::AppError, routes::PathParams};

// ---------------------------------------------------------------------------
// JSON bodies
// ---------------------------------------------------------------------------

/// A JSON request body.
///
/// The body is buffered in full, then parsed. Unlike `axum::Json` it does not
/// look at `Content-Type`, and a syntax or type error is a 400 `invalid_json`
/// in the standard error shape.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Could not read request body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected request body");
                AppError::InvalidJson("Invalid JSON".into())
            })
    }
}

// ---------------------------------------------------------------------------
// Path parameters
// ---------------------------------------------------------------------------

fn param(parts: &Parts, name: &str) -> Result<RecordId, AppError> {
    let raw = parts
        .extensions
        .get::<PathParams>()
        .and_then(|p| p.get(name))
        .ok_or_else(|| AppError::Internal(format!("path parameter {name:?} was not captured")))?;
    // RecordId parsing is infallible.
    Ok(raw.parse().unwrap_or_else(|never| match never {}))
}

/// `{task}` from the matched route.
pub struct TaskPath(pub RecordId);

impl<S: Send + Sync> FromRequestParts<S> for TaskPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(TaskPath(param(parts, "task")?))
    }
}

/// `{task}` and `{comment}` from the matched route.
pub struct CommentPath {
    pub task: RecordId,
    pub comment: RecordId,
}

impl<S: Send + Sync> FromRequestParts<S> for CommentPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CommentPath {
            task: param(parts, "task")?,
            comment: param(parts, "comment")?,
        })
    }
}

/// `{task}`, `{comment}`, and `{reply}` from the matched route.
pub struct ReplyPath {
    pub task: RecordId,
    pub comment: RecordId,
    pub reply: RecordId,
}

impl<S: Send + Sync> FromRequestParts<S> for ReplyPath {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ReplyPath {
            task: param(parts, "task")?,
            comment: param(parts, "comment")?,
            reply: param(parts, "reply")?,
        })
    }
}
