//! Public surface for the `taskboard-server` crate.
//!
//! Exposes the router builder, configuration, and store implementations so
//! that external crates (e.g. the conformance test suite) can run an
//! in-process server without spawning a subprocess.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod router;
pub mod routes;
pub mod storage;

pub use config::ServerConfig;
pub use router::build_router;
pub use storage::{file::JsonFileStore, memory::MemoryStore, sqlite::SqliteStore, Store};
