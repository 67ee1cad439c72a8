//! In-memory storage implementation.
//!
//! All data is held in RAM behind a [`RwLock`] and is lost when the process
//! exits. Use this for tests, the conformance suite, and throwaway servers.
//! Ids are sequential, the same as the JSON file store.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use taskboard::{IdScheme, RecordId, Task, TaskDraft, User, UserDraft};

use super::{Store, StoreError};
use crate::config::SessionScope;

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    tasks: Vec<Task>,
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Thread-safe, in-memory implementation of [`Store`].
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Store impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Store for MemoryStore {
    fn id_scheme(&self) -> IdScheme {
        IdScheme::Sequential
    }

    // --- Users ---------------------------------------------------------------

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .read()
            .users
            .iter()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn insert_user(&self, draft: UserDraft) -> Result<User, StoreError> {
        let mut inner = self.write();
        if inner.users.iter().any(|u| u.email == draft.email) {
            return Err(StoreError::Conflict("Email already exists".into()));
        }
        if inner.users.iter().any(|u| u.username == draft.username) {
            return Err(StoreError::Conflict("Username already exists".into()));
        }
        let id = IdScheme::Sequential.next(inner.users.iter().map(|u| &u.id));
        let user = draft.into_user(id);
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn set_session_token(
        &self,
        user_id: &RecordId,
        token: &str,
        scope: SessionScope,
    ) -> Result<(), StoreError> {
        let mut inner = self.write();
        if !inner.users.iter().any(|u| &u.id == user_id) {
            return Err(StoreError::NotFound);
        }
        for user in inner.users.iter_mut() {
            if &user.id == user_id {
                user.token = Some(token.to_string());
            } else if scope == SessionScope::Global {
                user.token = None;
            }
        }
        Ok(())
    }

    // --- Tasks ---------------------------------------------------------------

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.read().tasks.clone())
    }

    async fn get_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError> {
        Ok(self.read().tasks.iter().find(|t| &t.id == id).cloned())
    }

    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.write();
        let id = IdScheme::Sequential.next(inner.tasks.iter().map(|t| &t.id));
        let task = draft.into_task(id);
        inner.tasks.push(task.clone());
        Ok(task)
    }

    async fn replace_task(&self, task: &Task) -> Result<(), StoreError> {
        let mut inner = self.write();
        let slot = inner
            .tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(StoreError::NotFound)?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete_task(&self, id: &RecordId) -> Result<(), StoreError> {
        let mut inner = self.write();
        let index = inner
            .tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or(StoreError::NotFound)?;
        inner.tasks.remove(index);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
