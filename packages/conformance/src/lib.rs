//! Shared helpers for the Taskboard conformance test suite.
//!
//! Provides [`spawn_server`], which binds a `TcpListener` on an ephemeral
//! port, wires up an in-process server backed by [`MemoryStore`], and returns
//! both the local URL and the store so tests can inspect persisted state
//! without going through the HTTP layer. [`spawn_server_with`] does the same
//! for any store and configuration.

use std::sync::Arc;

use serde_json::{json, Value};
use taskboard_server::{build_router, MemoryStore, ServerConfig, Store};

/// Start an ephemeral in-process server with default configuration and
/// return `(base_url, store)`.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound.
pub async fn spawn_server() -> (String, Arc<MemoryStore>) {
    spawn_memory_server(ServerConfig::default()).await
}

/// Like [`spawn_server`], with a custom configuration.
pub async fn spawn_memory_server(config: ServerConfig) -> (String, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let base = spawn_server_with(Arc::clone(&store) as Arc<dyn Store>, config).await;
    (base, store)
}

/// Start an ephemeral in-process server over `store` and return its base
/// URL, e.g. `http://127.0.0.1:51234`. The bind address in `config` is
/// ignored.
pub async fn spawn_server_with(store: Arc<dyn Store>, config: ServerConfig) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    let router = build_router(store, ServerConfig { bind_addr: addr, ..config });
    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance server error");
    });

    format!("http://{addr}")
}

/// A `reqwest` client with a short timeout.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("build HTTP client")
}

/// Register `name` (email `name@example.com`) and log in. Returns the token.
pub async fn register_and_login(client: &reqwest::Client, base: &str, name: &str) -> String {
    let email = format!("{name}@example.com");
    let resp = client
        .post(format!("{base}/api/register"))
        .json(&json!({"username": name, "email": email, "password": "Secur3!pw"}))
        .send()
        .await
        .expect("register request");
    assert_eq!(resp.status(), 201, "register {name}");
    login(client, base, &email).await
}

/// Log in an already-registered user. Returns the token.
pub async fn login(client: &reqwest::Client, base: &str, email: &str) -> String {
    let resp = client
        .post(format!("{base}/api/login"))
        .json(&json!({"email": email, "password": "Secur3!pw"}))
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), 200, "login {email}");
    let body: Value = resp.json().await.expect("login body");
    body["token"].as_str().expect("token in login body").to_string()
}

/// Create a task titled `title` and return its JSON.
pub async fn create_task(client: &reqwest::Client, base: &str, token: &str, title: &str) -> Value {
    let resp = client
        .post(format!("{base}/api/tasks"))
        .bearer_auth(token)
        .json(&json!({
            "title": title,
            "description": "Conformance task",
            "priority": "medium",
            "status": "pending",
            "labels": ["work"],
            "completed": false
        }))
        .send()
        .await
        .expect("create task request");
    assert_eq!(resp.status(), 201, "create task {title}");
    let body: Value = resp.json().await.expect("create task body");
    body["task"].clone()
}
