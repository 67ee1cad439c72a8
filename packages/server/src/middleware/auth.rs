//! Bearer-token authentication.
//!
//! A request is authenticated when its `Authorization` header holds exactly
//! two whitespace-separated words, the first of which is literally `Bearer`,
//! and the second equals the stored token of some user. Tokens never expire;
//! they stay valid until a later login replaces them.
//!
//! Provides:
//! - [`authenticate`]: resolves the header to `Option<User>`. Absence is a
//!   value, not an error.
//! - [`RequireUser`]: extractor that turns absence into a 401.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use taskboard::User;

use crate::{
    error::AppError,
    handlers::AppState,
    storage::{Store, StoreError},
};

/// The token carried by a well-formed `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut words = value.split_whitespace();
    match (words.next(), words.next(), words.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Resolve the request's bearer token to a user.
pub async fn authenticate(
    store: &dyn Store,
    headers: &HeaderMap,
) -> Result<Option<User>, StoreError> {
    match bearer_token(headers) {
        Some(token) => store.find_user_by_token(token).await,
        None => Ok(None),
    }
}

// ---------------------------------------------------------------------------
// RequireUser extractor
// ---------------------------------------------------------------------------

/// Axum extractor that requires a valid bearer token.
///
/// Returns 401 `Unauthorized` if the header is absent, malformed, or names no
/// user. A storage failure during the lookup is a 500.
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let app_state = AppState::from_ref(state);
        async move {
            let user = authenticate(app_state.store.as_ref(), &parts.headers)
                .await?
                .ok_or_else(AppError::unauthorized)?;
            tracing::debug!(user_id = %user.id, "authenticated");
            Ok(RequireUser(user))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;
    use taskboard::UserDraft;

    use super::*;
    use crate::config::SessionScope;
    use crate::storage::memory::MemoryStore;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn header_shape_is_strict() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("  Bearer   abc  ")), Some("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Bearer abc def")), None);
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn resolves_current_token_only() {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user(UserDraft {
                username: "ada".into(),
                email: "ada@example.com".into(),
                password_digest: "x".into(),
            })
            .await
            .unwrap();
        store
            .set_session_token(&user.id, "tok-1", SessionScope::Global)
            .await
            .unwrap();

        let found = authenticate(store.as_ref(), &headers("Bearer tok-1")).await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id.clone()));

        store
            .set_session_token(&user.id, "tok-2", SessionScope::Global)
            .await
            .unwrap();
        let stale = authenticate(store.as_ref(), &headers("Bearer tok-1")).await.unwrap();
        assert!(stale.is_none());
    }
}
