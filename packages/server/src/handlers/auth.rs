//! Handlers for `POST /api/register` and `POST /api/login`.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use taskboard::UserDraft;
use taskboard_api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::{
    error::AppError,
    extract::JsonBody,
    password::{hash_password, new_session_token, verify_password},
};

use super::AppState;

/// `POST /api/register`
///
/// Emails and usernames are unique, compared exactly. The email check runs
/// first, so a request that collides on both reports the email.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let registration = req.validate()?;

    if state
        .store
        .find_user_by_email(&registration.email)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Email already exists".into()));
    }
    if state
        .store
        .find_user_by_username(&registration.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest("Username already exists".into()));
    }

    let user = state
        .store
        .insert_user(UserDraft {
            username: registration.username,
            email: registration.email,
            password_digest: hash_password(&registration.password),
        })
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".into(),
            user: (&user).into(),
        }),
    ))
}

/// `POST /api/login`
///
/// Issues a fresh token. Under the global session scope every other user's
/// token stops working.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let credentials = req.validate()?;

    let user = state
        .store
        .find_user_by_email(&credentials.email)
        .await?
        .filter(|u| verify_password(&credentials.password, &u.password))
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".into()))?;

    let token = new_session_token();
    state
        .store
        .set_session_token(&user.id, &token, state.config.session_scope)
        .await?;

    tracing::info!(user_id = %user.id, scope = ?state.config.session_scope, "user logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".into(),
        token,
        user: (&user).into(),
    }))
}
