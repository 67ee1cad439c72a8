//! JSON file storage implementation.
//!
//! Each collection is one pretty-printed JSON array on disk: `users.json`
//! and `tasks.json` inside the data directory. Every mutating call loads the
//! whole array, changes it in memory, and writes the whole array back
//! through a temporary file that is then renamed over the original.
//!
//! A per-collection async mutex serialises the load/save pair of a single
//! call. Handlers that read a task and later replace it make two calls, so
//! two such handlers racing on the same collection can still lose an update.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use taskboard::{IdScheme, RecordId, Task, TaskDraft, User, UserDraft};
use tokio::sync::Mutex;

use super::{Store, StoreError};
use crate::config::SessionScope;

pub const USERS_FILE: &str = "users.json";
pub const TASKS_FILE: &str = "tasks.json";

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// File-backed implementation of [`Store`] with sequential ids.
pub struct JsonFileStore {
    users_path: PathBuf,
    tasks_path: PathBuf,
    users_lock: Mutex<()>,
    tasks_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store in `dir`, creating the directory and any missing
    /// collection file (as `[]`).
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(map_io_err)?;

        let users_path = dir.join(USERS_FILE);
        let tasks_path = dir.join(TASKS_FILE);
        for path in [&users_path, &tasks_path] {
            if !path.exists() {
                std::fs::write(path, "[]").map_err(map_io_err)?;
            }
        }

        Ok(Self {
            users_path,
            tasks_path,
            users_lock: Mutex::new(()),
            tasks_lock: Mutex::new(()),
        })
    }
}

// ---------------------------------------------------------------------------
// Whole-collection load / save
// ---------------------------------------------------------------------------

fn map_io_err(e: std::io::Error) -> StoreError {
    StoreError::Internal(format!("I/O error: {e}"))
}

fn map_json_err(e: serde_json::Error) -> StoreError {
    StoreError::Internal(format!("JSON error: {e}"))
}

/// Read a collection. A missing or blank file is an empty collection.
async fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(map_io_err(e)),
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(map_json_err)
}

async fn save<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(records).map_err(map_json_err)?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, json).await.map_err(map_io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(map_io_err)
}

// ---------------------------------------------------------------------------
// Store impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Store for JsonFileStore {
    fn id_scheme(&self) -> IdScheme {
        IdScheme::Sequential
    }

    // --- Users ---------------------------------------------------------------

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users: Vec<User> = load(&self.users_path).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let users: Vec<User> = load(&self.users_path).await?;
        Ok(users.into_iter().find(|u| u.username == username))
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let users: Vec<User> = load(&self.users_path).await?;
        Ok(users
            .into_iter()
            .find(|u| u.token.as_deref() == Some(token)))
    }

    async fn insert_user(&self, draft: UserDraft) -> Result<User, StoreError> {
        let _guard = self.users_lock.lock().await;
        let mut users: Vec<User> = load(&self.users_path).await?;
        if users.iter().any(|u| u.email == draft.email) {
            return Err(StoreError::Conflict("Email already exists".into()));
        }
        if users.iter().any(|u| u.username == draft.username) {
            return Err(StoreError::Conflict("Username already exists".into()));
        }
        let id = IdScheme::Sequential.next(users.iter().map(|u| &u.id));
        let user = draft.into_user(id);
        users.push(user.clone());
        save(&self.users_path, &users).await?;
        Ok(user)
    }

    async fn set_session_token(
        &self,
        user_id: &RecordId,
        token: &str,
        scope: SessionScope,
    ) -> Result<(), StoreError> {
        let _guard = self.users_lock.lock().await;
        let mut users: Vec<User> = load(&self.users_path).await?;
        if !users.iter().any(|u| &u.id == user_id) {
            return Err(StoreError::NotFound);
        }
        for user in users.iter_mut() {
            if &user.id == user_id {
                user.token = Some(token.to_string());
            } else if scope == SessionScope::Global {
                user.token = None;
            }
        }
        save(&self.users_path, &users).await
    }

    // --- Tasks ---------------------------------------------------------------

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        load(&self.tasks_path).await
    }

    async fn get_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError> {
        let tasks: Vec<Task> = load(&self.tasks_path).await?;
        Ok(tasks.into_iter().find(|t| &t.id == id))
    }

    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let _guard = self.tasks_lock.lock().await;
        let mut tasks: Vec<Task> = load(&self.tasks_path).await?;
        let id = IdScheme::Sequential.next(tasks.iter().map(|t| &t.id));
        let task = draft.into_task(id);
        tasks.push(task.clone());
        save(&self.tasks_path, &tasks).await?;
        Ok(task)
    }

    async fn replace_task(&self, task: &Task) -> Result<(), StoreError> {
        let _guard = self.tasks_lock.lock().await;
        let mut tasks: Vec<Task> = load(&self.tasks_path).await?;
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or(StoreError::NotFound)?;
        *slot = task.clone();
        save(&self.tasks_path, &tasks).await
    }

    async fn delete_task(&self, id: &RecordId) -> Result<(), StoreError> {
        let _guard = self.tasks_lock.lock().await;
        let mut tasks: Vec<Task> = load(&self.tasks_path).await?;
        let index = tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or(StoreError::NotFound)?;
        tasks.remove(index);
        save(&self.tasks_path, &tasks).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
