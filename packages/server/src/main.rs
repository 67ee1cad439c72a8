//! `taskboard-server`: the Taskboard HTTP API.
//!
//! # Quick start
//!
//! ```sh
//! # JSON files in the current directory on port 8080:
//! taskboard-server
//!
//! # SQLite document store, per-user sessions:
//! TASKBOARD_STORE=document DATABASE_URI=./taskboard.db SESSION_SCOPE=per-user taskboard-server
//!
//! # Throwaway in-memory server on another port:
//! TASKBOARD_STORE=memory PORT=3000 taskboard-server
//! ```
//!
//! # Environment variables
//!
//! See [`ServerConfig::from_env`] for the full list.

use std::sync::Arc;

use taskboard_server::{
    build_router,
    config::StoreBackend,
    JsonFileStore, MemoryStore, ServerConfig, SqliteStore, Store,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "taskboard_server=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"));

    let store: Arc<dyn Store> = match config.store {
        StoreBackend::File => {
            let dir = config.data_dir.display();
            tracing::info!("storage: JSON files in {dir}");
            Arc::new(
                JsonFileStore::open(&config.data_dir)
                    .unwrap_or_else(|e| panic!("failed to open data directory {dir}: {e}")),
            )
        }
        StoreBackend::Document => {
            let path = &config.database_uri;
            tracing::info!("storage: SQLite documents at {path} (db {})", config.db_name);
            Arc::new(
                SqliteStore::open(path, &config.db_name)
                    .unwrap_or_else(|e| panic!("failed to open SQLite database at {path}: {e}")),
            )
        }
        StoreBackend::Memory => {
            tracing::info!("storage: in-memory (data will not survive restart)");
            Arc::new(MemoryStore::new())
        }
    };

    tracing::info!(
        session_scope = ?config.session_scope,
        like_policy = ?config.like_policy,
        "policies"
    );

    let bind_addr = config.bind_addr;
    let app = build_router(store, config);

    tracing::info!("listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
