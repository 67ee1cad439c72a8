//! Storage abstraction layer for Taskboard.
//!
//! The [`Store`] trait defines the contract between the HTTP handler layer
//! and persistence. Ownership checks and validation live in the handlers;
//! storage is purely a data access layer.
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryStore`] | Tests, conformance suite, throwaway servers |
//! | [`JsonFileStore`] | Default; `users.json` / `tasks.json` rewritten wholesale |
//! | [`SqliteStore`] | Document store; one JSON document per record |
//!
//! [`MemoryStore`]: memory::MemoryStore
//! [`JsonFileStore`]: file::JsonFileStore
//! [`SqliteStore`]: sqlite::SqliteStore

pub mod file;
pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use taskboard::{IdScheme, RecordId, Task, TaskDraft, User, UserDraft};

use crate::config::SessionScope;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// Errors that storage operations can return.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("not found")]
    NotFound,

    /// A record with the same unique key already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected error in the underlying storage backend.
    #[error("internal storage error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// Store trait
// ---------------------------------------------------------------------------

/// The persistence contract for a Taskboard server.
///
/// All methods are `async` and return `Result<_, StoreError>`. Implementations
/// must be `Send + Sync + 'static` so they can be held in an `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// How this store allocates ids. Handlers use it for comment and reply
    /// ids, which live inside a task rather than in their own collection.
    fn id_scheme(&self) -> IdScheme;

    // --- Users ---------------------------------------------------------------

    /// Exact, case-sensitive match on `email`.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// The user whose current bearer token equals `token`, if any.
    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError>;

    /// Assign an id and persist the user. Returns [`StoreError::Conflict`] if
    /// the email or username is already taken.
    async fn insert_user(&self, draft: UserDraft) -> Result<User, StoreError>;

    /// Make `token` the user's only active token. With
    /// [`SessionScope::Global`] every other user's token is cleared as well.
    async fn set_session_token(
        &self,
        user_id: &RecordId,
        token: &str,
        scope: SessionScope,
    ) -> Result<(), StoreError>;

    // --- Tasks ---------------------------------------------------------------

    /// Every task, in insertion order.
    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError>;

    async fn get_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError>;

    /// Assign an id and persist the task.
    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, StoreError>;

    /// Overwrite the stored task with the same id. Returns
    /// [`StoreError::NotFound`] if there is none.
    async fn replace_task(&self, task: &Task) -> Result<(), StoreError>;

    /// Returns [`StoreError::NotFound`] if there is no such task; nothing is
    /// written in that case.
    async fn delete_task(&self, id: &RecordId) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// Test fixtures shared by the implementations
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use taskboard::{Label, NewTask, Priority, RecordId, Status, TaskDraft, UserDraft};

    pub fn user_draft(username: &str, email: &str) -> UserDraft {
        UserDraft {
            username: username.into(),
            email: email.into(),
            password_digest: "digest".into(),
        }
    }

    pub fn task_draft(owner: u64) -> TaskDraft {
        TaskDraft::new(
            NewTask {
                title: "Write report".into(),
                description: "Quarterly numbers".into(),
                priority: Priority::Medium,
                status: Status::Pending,
                labels: vec![Label::Work],
                completed: false,
            },
            RecordId::Seq(owner),
            chrono::Utc::now(),
        )
    }
}
