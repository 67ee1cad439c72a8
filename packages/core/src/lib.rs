//! Domain model of the Taskboard service.
//!
//! This crate holds the records the server stores and the rules that govern
//! them. It performs no I/O; the HTTP layer lives in `taskboard-server` and
//! the request/response schemas in `taskboard-api`.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`types`] | Records: [`User`], [`Task`], [`Comment`], [`Reply`], plus [`RecordId`] and the task enumerations |
//! | [`validation`] | Field checks shared by every operation, reported as [`ValidationError`] |
//! | [`query`] | Filtering and pagination of the task listing via [`TaskQuery`] |
//!
//! # Quick start
//!
//! ```rust
//! use taskboard::{Label, NewTask, Priority, RecordId, Status, TaskDraft};
//!
//! let draft = TaskDraft::new(
//!     NewTask {
//!         title: "Buy milk".into(),
//!         description: "Semi-skimmed".into(),
//!         priority: Priority::Low,
//!         status: Status::Pending,
//!         labels: vec![Label::Personal],
//!         completed: false,
//!     },
//!     RecordId::Seq(1),
//!     chrono::Utc::now(),
//! );
//! let mut task = draft.into_task(RecordId::Seq(1));
//! assert!(task.likes.toggle());
//! ```

pub mod query;
pub mod types;
pub mod validation;

pub use query::{Page, QueryError, TaskQuery};
pub use types::{
    Comment, IdScheme, Label, Likes, NewTask, Priority, RecordId, Reply, Status, Task, TaskDraft,
    TaskPatch, User, UserDraft,
};
pub use validation::ValidationError;
