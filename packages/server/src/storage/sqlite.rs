//! SQLite-backed document store.
//!
//! Uses `rusqlite` (with bundled SQLite) wrapped in an `Arc<Mutex<Connection>>`
//! to satisfy the `Send + Sync` requirements. All blocking calls are offloaded
//! to a thread-pool via `tokio::task::spawn_blocking`.
//!
//! Records are stored as JSON documents, one row each, and addressed with
//! targeted find-one / insert-one / update-one statements built on SQLite's
//! JSON functions rather than by rewriting whole collections. Ids are opaque
//! UUIDv7 strings.
//!
//! # Schema
//!
//! - `documents`: `(db, collection, id)` key plus the JSON `data` blob.
//!   `db` namespaces a logical database so several can share one file.
//!   Insertion order is the table's rowid order.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use taskboard::{IdScheme, RecordId, Task, TaskDraft, User, UserDraft};

use super::{Store, StoreError};
use crate::config::SessionScope;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    db          TEXT NOT NULL,
    collection  TEXT NOT NULL,
    id          TEXT NOT NULL,
    data        TEXT NOT NULL,
    PRIMARY KEY (db, collection, id)
);
";

const USERS: &str = "users";
const TASKS: &str = "tasks";

// ---------------------------------------------------------------------------
// SqliteStore
// ---------------------------------------------------------------------------

/// Document-store implementation of [`Store`].
///
/// Holds a single database connection protected by a `Mutex`. All operations
/// run inside `spawn_blocking` to avoid blocking the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    db: String,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at `path` and apply the schema.
    pub fn open(path: &str, db: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db: db.to_string(),
        })
    }

    /// Open an in-memory SQLite database (data is lost when dropped).
    pub fn open_in_memory(db: &str) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            db: db.to_string(),
        })
    }

    /// Run `f` against the locked connection on the blocking pool.
    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection, &str) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let db = self.db.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| StoreError::Internal("connection mutex poisoned".into()))?;
            f(&mut *conn, &db)
        })
        .await
        .map_err(|e| StoreError::Internal(format!("task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// Error conversions
// ---------------------------------------------------------------------------

fn map_err(e: rusqlite::Error) -> StoreError {
    StoreError::Internal(e.to_string())
}

fn map_json_err(e: serde_json::Error) -> StoreError {
    StoreError::Internal(format!("JSON error: {e}"))
}

// ---------------------------------------------------------------------------
// Document helpers
// ---------------------------------------------------------------------------

/// The first document in `collection` whose JSON `path` equals `value`.
fn find_one<T: DeserializeOwned>(
    conn: &Connection,
    db: &str,
    collection: &str,
    path: &str,
    value: &str,
) -> Result<Option<T>, StoreError> {
    let data: Option<String> = conn
        .query_row(
            "SELECT data FROM documents
             WHERE db = ?1 AND collection = ?2 AND json_extract(data, ?3) = ?4
             ORDER BY rowid LIMIT 1",
            params![db, collection, path, value],
            |row| row.get(0),
        )
        .optional()
        .map_err(map_err)?;
    data.map(|d| serde_json::from_str(&d).map_err(map_json_err))
        .transpose()
}

fn insert_one(
    conn: &Connection,
    db: &str,
    collection: &str,
    id: &RecordId,
    data: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO documents (db, collection, id, data) VALUES (?1, ?2, ?3, ?4)",
        params![db, collection, id.to_string(), data],
    )
    .map_err(map_err)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Store impl
// ---------------------------------------------------------------------------

#[async_trait]
impl Store for SqliteStore {
    fn id_scheme(&self) -> IdScheme {
        IdScheme::Opaque
    }

    // --- Users ---------------------------------------------------------------

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = email.to_string();
        self.run(move |conn, db| find_one(conn, db, USERS, "$.email", &email))
            .await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let username = username.to_string();
        self.run(move |conn, db| find_one(conn, db, USERS, "$.username", &username))
            .await
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let token = token.to_string();
        self.run(move |conn, db| find_one(conn, db, USERS, "$.token", &token))
            .await
    }

    async fn insert_user(&self, draft: UserDraft) -> Result<User, StoreError> {
        self.run(move |conn, db| {
            if find_one::<User>(conn, db, USERS, "$.email", &draft.email)?.is_some() {
                return Err(StoreError::Conflict("Email already exists".into()));
            }
            if find_one::<User>(conn, db, USERS, "$.username", &draft.username)?.is_some() {
                return Err(StoreError::Conflict("Username already exists".into()));
            }
            let user = draft.into_user(IdScheme::Opaque.next(std::iter::empty()));
            let data = serde_json::to_string(&user).map_err(map_json_err)?;
            insert_one(conn, db, USERS, &user.id, &data)?;
            Ok(user)
        })
        .await
    }

    async fn set_session_token(
        &self,
        user_id: &RecordId,
        token: &str,
        scope: SessionScope,
    ) -> Result<(), StoreError> {
        let user_id = user_id.to_string();
        let token = token.to_string();

        self.run(move |conn, db| {
            let tx = conn.transaction().map_err(map_err)?;
            let changed = tx
                .execute(
                    "UPDATE documents SET data = json_set(data, '$.token', ?3)
                     WHERE db = ?1 AND collection = 'users' AND id = ?2",
                    params![db, user_id, token],
                )
                .map_err(map_err)?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            if scope == SessionScope::Global {
                tx.execute(
                    "UPDATE documents SET data = json_remove(data, '$.token')
                     WHERE db = ?1 AND collection = 'users' AND id <> ?2",
                    params![db, user_id],
                )
                .map_err(map_err)?;
            }
            tx.commit().map_err(map_err)
        })
        .await
    }

    // --- Tasks ---------------------------------------------------------------

    async fn list_tasks(&self) -> Result<Vec<Task>, StoreError> {
        self.run(|conn, db| {
            let mut stmt = conn
                .prepare(
                    "SELECT data FROM documents
                     WHERE db = ?1 AND collection = 'tasks'
                     ORDER BY rowid",
                )
                .map_err(map_err)?;
            let rows = stmt
                .query_map(params![db], |row| row.get::<_, String>(0))
                .map_err(map_err)?;
            let mut tasks = Vec::new();
            for row in rows {
                let data = row.map_err(map_err)?;
                tasks.push(serde_json::from_str(&data).map_err(map_json_err)?);
            }
            Ok(tasks)
        })
        .await
    }

    async fn get_task(&self, id: &RecordId) -> Result<Option<Task>, StoreError> {
        let id = id.to_string();
        self.run(move |conn, db| {
            let data: Option<String> = conn
                .query_row(
                    "SELECT data FROM documents
                     WHERE db = ?1 AND collection = 'tasks' AND id = ?2",
                    params![db, id],
                    |row| row.get(0),
                )
                .optional()
                .map_err(map_err)?;
            data.map(|d| serde_json::from_str(&d).map_err(map_json_err))
                .transpose()
        })
        .await
    }

    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        self.run(move |conn, db| {
            let task = draft.into_task(IdScheme::Opaque.next(std::iter::empty()));
            let data = serde_json::to_string(&task).map_err(map_json_err)?;
            insert_one(conn, db, TASKS, &task.id, &data)?;
            Ok(task)
        })
        .await
    }

    async fn replace_task(&self, task: &Task) -> Result<(), StoreError> {
        let id = task.id.to_string();
        let data = serde_json::to_string(task).map_err(map_json_err)?;

        self.run(move |conn, db| {
            let changed = conn
                .execute(
                    "UPDATE documents SET data = ?3
                     WHERE db = ?1 AND collection = 'tasks' AND id = ?2",
                    params![db, id, data],
                )
                .map_err(map_err)?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, id: &RecordId) -> Result<(), StoreError> {
        let id = id.to_string();
        self.run(move |conn, db| {
            let changed = conn
                .execute(
                    "DELETE FROM documents WHERE db = ?1 AND collection = 'tasks' AND id = ?2",
                    params![db, id],
                )
                .map_err(map_err)?;
            if changed == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::{task_draft, user_draft};

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory("taskboard").unwrap()
    }

    #[tokio::test]
    async fn assigns_opaque_ids() {
        let s = store();
        let t = s.insert_task(task_draft(1)).await.unwrap();
        let RecordId::Opaque(raw) = &t.id else {
            panic!("expected an opaque id, got {:?}", t.id);
        };
        assert_eq!(raw.len(), 36);
        let got = s.get_task(&t.id).await.unwrap().unwrap();
        assert_eq!(got, t);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let s = store();
        let mut ids = Vec::new();
        for _ in 0..3 {
            ids.push(s.insert_task(task_draft(1)).await.unwrap().id);
        }
        let listed: Vec<_> = s.list_tasks().await.unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn finds_users_by_field() {
        let s = store();
        let u = s.insert_user(user_draft("ada", "ada@example.com")).await.unwrap();
        assert_eq!(
            s.find_user_by_username("ada").await.unwrap().unwrap().id,
            u.id
        );
        assert!(s.find_user_by_email("ADA@example.com").await.unwrap().is_none());
        let err = s
            .insert_user(user_draft("ada", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(msg) if msg == "Username already exists"));
    }

    #[tokio::test]
    async fn global_login_resets_other_tokens() {
        let s = store();
        let a = s.insert_user(user_draft("a", "a@example.com")).await.unwrap();
        let b = s.insert_user(user_draft("b", "b@example.com")).await.unwrap();
        s.set_session_token(&a.id, "tok-a", SessionScope::Global).await.unwrap();
        s.set_session_token(&b.id, "tok-b", SessionScope::Global).await.unwrap();

        assert!(s.find_user_by_token("tok-a").await.unwrap().is_none());
        let a = s.find_user_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(a.token, None);
        assert_eq!(s.find_user_by_token("tok-b").await.unwrap().unwrap().id, b.id);
    }

    #[tokio::test]
    async fn per_user_login_is_targeted() {
        let s = store();
        let a = s.insert_user(user_draft("a", "a@example.com")).await.unwrap();
        let b = s.insert_user(user_draft("b", "b@example.com")).await.unwrap();
        s.set_session_token(&a.id, "tok-a", SessionScope::PerUser).await.unwrap();
        s.set_session_token(&b.id, "tok-b", SessionScope::PerUser).await.unwrap();
        assert_eq!(s.find_user_by_token("tok-a").await.unwrap().unwrap().id, a.id);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let s = store();
        let mut t = s.insert_task(task_draft(1)).await.unwrap();
        t.id = RecordId::Seq(1);
        assert!(matches!(s.replace_task(&t).await, Err(StoreError::NotFound)));
        assert!(matches!(s.delete_task(&t.id).await, Err(StoreError::NotFound)));
        assert!(matches!(
            s.set_session_token(&RecordId::Seq(1), "x", SessionScope::Global).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn databases_are_namespaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shared.db");
        let path = path.to_str().unwrap();
        let a = SqliteStore::open(path, "alpha").unwrap();
        let b = SqliteStore::open(path, "beta").unwrap();
        a.insert_task(task_draft(1)).await.unwrap();
        assert_eq!(a.list_tasks().await.unwrap().len(), 1);
        assert!(b.list_tasks().await.unwrap().is_empty());
    }
}
