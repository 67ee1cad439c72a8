//! Assembles the Axum [`Router`] and dispatches requests through the route
//! table.
//!
//! Axum's own path router is not used: a single fallback handler asks
//! [`routes::classify`] which operation a request is, stores the captured
//! parameters in the request extensions, and calls the matching handler.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    handler::Handler,
    response::{IntoResponse, Response},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    error::AppError,
    handlers::{auth, comments, health, likes, tasks, AppState},
    routes::{self, Operation, ROUTES},
    storage::Store,
};

/// Build the complete application router with shared state.
pub fn build_router(store: Arc<dyn Store>, config: ServerConfig) -> Router {
    for (i, route) in ROUTES.iter().enumerate() {
        tracing::debug!(
            "route {i:>2}: {:<6} {:<60} {}",
            route.method.as_str(),
            route.pattern,
            route.operation
        );
    }

    let state = AppState { store, config };

    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Classify the request and run the handler for its operation.
pub async fn dispatch(State(state): State<AppState>, mut req: Request) -> Response {
    let Some(matched) = routes::classify(req.method(), req.uri().path()) else {
        tracing::warn!(method = %req.method(), path = %req.uri().path(), "no route matched");
        return AppError::RouteNotFound("Route not found".into()).into_response();
    };
    tracing::debug!(operation = %matched.operation, "route matched");
    req.extensions_mut().insert(matched.params);

    match matched.operation {
        Operation::Health => Handler::call(health, req, state).await,
        Operation::Register => Handler::call(auth::register, req, state).await,
        Operation::Login => Handler::call(auth::login, req, state).await,
        Operation::CreateTask => Handler::call(tasks::create_task, req, state).await,
        Operation::ListTasks => Handler::call(tasks::list_tasks, req, state).await,
        Operation::GetTask => Handler::call(tasks::get_task, req, state).await,
        Operation::UpdateTask => Handler::call(tasks::update_task, req, state).await,
        Operation::DeleteTask => Handler::call(tasks::delete_task, req, state).await,
        Operation::MarkComplete => Handler::call(tasks::mark_complete, req, state).await,
        Operation::MarkIncomplete => Handler::call(tasks::mark_incomplete, req, state).await,
        Operation::MyTasks => Handler::call(tasks::my_tasks, req, state).await,
        Operation::PostComment => Handler::call(comments::post_comment, req, state).await,
        Operation::ListComments => Handler::call(comments::list_comments, req, state).await,
        Operation::ReplyToComment => {
            Handler::call(comments::reply_to_comment, req, state).await
        }
        Operation::EditComment => Handler::call(comments::edit_comment, req, state).await,
        Operation::EditReply => Handler::call(comments::edit_reply, req, state).await,
        Operation::DeleteComment => Handler::call(comments::delete_comment, req, state).await,
        Operation::DeleteReply => Handler::call(comments::delete_reply, req, state).await,
        Operation::LikeTask => Handler::call(likes::like_task, req, state).await,
        Operation::LikeComment => Handler::call(likes::like_comment, req, state).await,
        Operation::LikeReply => Handler::call(likes::like_reply, req, state).await,
    }
}
