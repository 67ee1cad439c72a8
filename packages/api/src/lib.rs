//! Request and response types for the Taskboard HTTP API.
//!
//! Every body the server accepts is deserialised into one of the request
//! types here and validated into a domain input before any record is
//! touched. Every body it returns is one of the response types.
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | GET | `/` | → [`MessageResponse`] |
//! | POST | `/api/register` | [`RegisterRequest`] → [`RegisterResponse`] |
//! | POST | `/api/login` | [`LoginRequest`] → [`LoginResponse`] |
//! | POST | `/api/tasks` | [`CreateTaskRequest`] → [`TaskResponse`] |
//! | GET | `/api/tasks` | → [`taskboard::Page`] |
//! | GET | `/api/tasks/{id}` | → [`taskboard::Task`] |
//! | PATCH | `/api/tasks/{id}` | [`UpdateTaskRequest`] → [`UpdateTaskResponse`] |
//! | DELETE | `/api/tasks/{id}` | → `204` |
//! | PATCH | `/api/tasks/{id}/complete` | → [`TaskResponse`] |
//! | PATCH | `/api/tasks/{id}/incomplete` | → [`TaskResponse`] |
//! | POST | `/api/tasks/{id}/like` | → [`TaskResponse`] |
//! | POST | `/api/tasks/{id}/comments` | [`CommentRequest`] → [`CommentResponse`] |
//! | GET | `/api/tasks/{id}/comments` | → [`CommentListResponse`] |
//! | POST | `/api/tasks/{id}/comment/{cid}/reply` | [`CommentRequest`] → [`ReplyResponse`] |
//! | PATCH | `/api/tasks/{id}/comments/{cid}` | [`CommentRequest`] → [`CommentResponse`] |
//! | PATCH | `/api/tasks/{id}/comments/{cid}/replies/{rid}` | [`CommentRequest`] → [`ReplyResponse`] |
//! | DELETE | `/api/tasks/{id}/comments/{cid}[/replies/{rid}]` | → `204` |
//! | POST | `/api/tasks/{id}/comments/{cid}/like` | → [`CommentResponse`] |
//! | POST | `/api/tasks/{id}/comments/{cid}/replies/{rid}/like` | → [`ReplyResponse`] |
//! | GET | `/api/user/my-tasks` | → [`MyTasksResponse`] |

pub mod auth;
pub mod comment;
pub mod error;
pub mod task;

pub use auth::{
    Credentials, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, Registration,
    UserSummary,
};
pub use comment::{CommentListResponse, CommentRequest, CommentResponse, ReplyResponse};
pub use error::ErrorResponse;
pub use task::{
    CreateTaskRequest, MessageResponse, MyTasksResponse, TaskResponse, UpdateTaskRequest,
    UpdateTaskResponse,
};
