//! Server configuration, populated from environment variables.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Which [`Store`](crate::storage::Store) implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// `users.json` and `tasks.json` in [`ServerConfig::data_dir`].
    File,
    /// SQLite document store at [`ServerConfig::database_uri`].
    Document,
    /// Process memory; nothing survives a restart.
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(StoreBackend::File),
            "document" => Ok(StoreBackend::Document),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!(
                "unknown store {s:?}; expected one of: file, document, memory"
            )),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            StoreBackend::File => "file",
            StoreBackend::Document => "document",
            StoreBackend::Memory => "memory",
        })
    }
}

/// How far a login reaches when it issues a new token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionScope {
    /// A login clears every other user's token: one session system-wide.
    #[default]
    Global,
    /// A login replaces only the caller's own token.
    PerUser,
}

impl std::str::FromStr for SessionScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(SessionScope::Global),
            "per-user" => Ok(SessionScope::PerUser),
            _ => Err(format!(
                "unknown session scope {s:?}; expected one of: global, per-user"
            )),
        }
    }
}

/// Who may toggle the like flag on a task, comment, or reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikePolicy {
    /// Only the record's owner.
    #[default]
    Owner,
    /// Any authenticated user.
    Any,
}

impl std::str::FromStr for LikePolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(LikePolicy::Owner),
            "any" => Ok(LikePolicy::Any),
            _ => Err(format!("unknown like policy {s:?}; expected one of: owner, any")),
        }
    }
}

/// A configuration value that could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub reason: String,
}

/// Runtime configuration for a Taskboard server.
///
/// All fields are populated from environment variables with defaults, so a
/// server can be started with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `PORT` | `8080` | TCP port to listen on |
/// | `TASKBOARD_HOST` | `0.0.0.0` | Address to bind |
/// | `TASKBOARD_STORE` | `file` | `file`, `document`, or `memory` |
/// | `DATA_DIR` | `.` | Directory holding `users.json` and `tasks.json` |
/// | `DATABASE_URI` | `taskboard.db` | SQLite file for the document store |
/// | `DB_NAME` | `taskboard` | Logical database name inside the document store |
/// | `SESSION_SCOPE` | `global` | `global` or `per-user` |
/// | `LIKE_POLICY` | `owner` | `owner` or `any` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: SocketAddr,

    pub store: StoreBackend,

    pub data_dir: PathBuf,

    pub database_uri: String,

    /// Namespaces every document, so several logical databases can share
    /// one SQLite file.
    pub db_name: String,

    pub session_scope: SessionScope,

    pub like_policy: LikePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::File,
            data_dir: PathBuf::from("."),
            database_uri: "taskboard.db".into(),
            db_name: "taskboard".into(),
            session_scope: SessionScope::Global,
            like_policy: LikePolicy::Owner,
        }
    }
}

impl ServerConfig {
    /// Populate config from environment variables, applying defaults where absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port: u16 = parse_var(&lookup, "PORT")?.unwrap_or(defaults.bind_addr.port());
        let host: IpAddr = parse_var(&lookup, "TASKBOARD_HOST")?.unwrap_or(defaults.bind_addr.ip());

        Ok(Self {
            bind_addr: SocketAddr::new(host, port),
            store: parse_var(&lookup, "TASKBOARD_STORE")?.unwrap_or(defaults.store),
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            database_uri: lookup("DATABASE_URI").unwrap_or(defaults.database_uri),
            db_name: lookup("DB_NAME").unwrap_or(defaults.db_name),
            session_scope: parse_var(&lookup, "SESSION_SCOPE")?.unwrap_or_default(),
            like_policy: parse_var(&lookup, "LIKE_POLICY")?.unwrap_or_default(),
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|e: T::Err| ConfigError {
            var,
            reason: e.to_string(),
        }),
    }
}
