//! Core data types for Taskboard.
//!
//! This module defines the persisted records: [`User`], [`Task`], [`Comment`],
//! and [`Reply`], together with the enumerations a task is built from
//! ([`Priority`], [`Status`], [`Label`]) and the [`RecordId`] that keys them.
//! All types serialise to and from the camelCase JSON the HTTP API and the
//! JSON file store use.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// Identifier of a stored record.
///
/// Sequential stores (JSON file, in-memory) hand out small integers; the
/// document store hands out opaque UUIDv7 strings. The two shapes serialise
/// as a JSON number and a JSON string respectively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Seq(u64),
    Opaque(String),
}

impl RecordId {
    /// The numeric value of a sequential id.
    pub fn as_seq(&self) -> Option<u64> {
        match self {
            RecordId::Seq(n) => Some(*n),
            RecordId::Opaque(_) => None,
        }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Seq(n) => write!(f, "{n}"),
            RecordId::Opaque(s) => f.write_str(s),
        }
    }
}

/// Parses a path segment: all-digit strings become [`RecordId::Seq`],
/// anything else [`RecordId::Opaque`]. Never fails; an id of the wrong
/// shape for a store simply matches nothing.
impl std::str::FromStr for RecordId {
    type Err = std::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse::<u64>() {
                return Ok(RecordId::Seq(n));
            }
        }
        Ok(RecordId::Opaque(s.to_string()))
    }
}

impl From<u64> for RecordId {
    fn from(n: u64) -> Self {
        RecordId::Seq(n)
    }
}

/// How a store allocates ids for new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// `max(existing) + 1`, starting at 1.
    Sequential,
    /// A fresh UUIDv7 string.
    Opaque,
}

impl IdScheme {
    /// Allocate the next id for a collection that currently holds `existing`.
    pub fn next<'a, I>(self, existing: I) -> RecordId
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        match self {
            IdScheme::Sequential => {
                let max = existing.into_iter().filter_map(RecordId::as_seq).max();
                RecordId::Seq(max.map_or(1, |m| m + 1))
            }
            IdScheme::Opaque => RecordId::Opaque(uuid::Uuid::now_v7().to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Task enumerations
// ---------------------------------------------------------------------------

/// Task priority. Serialises as a lowercase string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!(
                "unknown priority {s:?}; expected one of: low, medium, high"
            )),
        }
    }
}

/// Task workflow status. Serialises as a kebab-case string (`"in-progress"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in-progress",
            Status::Completed => "completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Status::Pending),
            "in-progress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            _ => Err(format!(
                "unknown status {s:?}; expected one of: pending, in-progress, completed"
            )),
        }
    }
}

/// Task label. Serialises as a lowercase string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Work,
    Personal,
    Urgent,
    Misc,
}

impl Label {
    pub const ALL: [Label; 4] = [Label::Work, Label::Personal, Label::Urgent, Label::Misc];

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Work => "work",
            Label::Personal => "personal",
            Label::Urgent => "urgent",
            Label::Misc => "misc",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Label::Work),
            "personal" => Ok(Label::Personal),
            "urgent" => Ok(Label::Urgent),
            "misc" => Ok(Label::Misc),
            _ => Err(format!(
                "unknown label {s:?}; expected one of: work, personal, urgent, misc"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Likes
// ---------------------------------------------------------------------------

/// Like state shared by tasks, comments, and replies.
///
/// Both fields are absent until the first toggle, matching records written
/// before likes existed. The flag is global to the record, not per user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Likes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_liked: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<u64>,
}

impl Likes {
    pub fn is_liked(&self) -> bool {
        self.is_liked.unwrap_or(false)
    }

    pub fn count(&self) -> u64 {
        self.likes_count.unwrap_or(0)
    }

    /// Flip the like flag and move the counter with it. The counter
    /// saturates at zero. Returns the new flag.
    pub fn toggle(&mut self) -> bool {
        let liked = self.is_liked();
        let count = self.count();
        if liked {
            self.likes_count = Some(count.saturating_sub(1));
        } else {
            self.likes_count = Some(count + 1);
        }
        self.is_liked = Some(!liked);
        !liked
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A registered user.
///
/// `password` holds the salted digest, never the plain text. `token` is the
/// single active bearer token, if any. Never serialise a `User` to a client;
/// use a summary type instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// A user that has passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password_digest: String,
}

impl UserDraft {
    pub fn into_user(self, id: RecordId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            password: self.password_digest,
            token: None,
        }
    }
}

/// A reply to a [`Comment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: RecordId,
    pub user_id: RecordId,
    pub username: String,
    pub text: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub likes: Likes,
}

/// A comment on a [`Task`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: RecordId,
    pub user_id: RecordId,
    pub username: String,
    pub text: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub replies: Vec<Reply>,
    #[serde(flatten)]
    pub likes: Likes,
}

impl Comment {
    pub fn reply(&self, id: &RecordId) -> Option<&Reply> {
        self.replies.iter().find(|r| &r.id == id)
    }

    pub fn reply_mut(&mut self, id: &RecordId) -> Option<&mut Reply> {
        self.replies.iter_mut().find(|r| &r.id == id)
    }
}

/// The primary resource: a todo item owned by the user who created it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub labels: Vec<Label>,
    pub completed: bool,
    pub user_id: RecordId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub likes: Likes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Task {
    pub fn comment(&self, id: &RecordId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    pub fn comment_mut(&mut self, id: &RecordId) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| &c.id == id)
    }

    /// `true` if any of title, description, or labels contains `needle`
    /// (already lower-cased) as a case-insensitive substring.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.labels.iter().any(|l| l.as_str().contains(needle))
    }
}

/// Validated content for a new task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub labels: Vec<Label>,
    pub completed: bool,
}

/// A task that is ready to be stored once the store assigns it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub content: NewTask,
    pub user_id: RecordId,
    pub created_at: DateTime<Utc>,
}

impl TaskDraft {
    pub fn new(content: NewTask, user_id: RecordId, created_at: DateTime<Utc>) -> Self {
        Self {
            content,
            user_id,
            created_at,
        }
    }

    pub fn into_task(self, id: RecordId) -> Task {
        let NewTask {
            title,
            description,
            priority,
            status,
            labels,
            completed,
        } = self.content;
        Task {
            id,
            title,
            description,
            priority,
            status,
            labels,
            completed,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at: self.created_at,
            likes: Likes::default(),
            comments: Vec::new(),
        }
    }
}

/// A validated partial update to a task. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub labels: Option<Vec<Label>>,
}

impl TaskPatch {
    /// Apply the patch and bump `updated_at`.
    pub fn apply(self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(labels) = self.labels {
            task.labels = labels;
        }
        task.updated_at = now;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        let draft = TaskDraft::new(
            NewTask {
                title: "Write report".into(),
                description: "Quarterly numbers".into(),
                priority: Priority::High,
                status: Status::InProgress,
                labels: vec![Label::Work, Label::Urgent],
                completed: false,
            },
            RecordId::Seq(7),
            "2026-03-01T10:00:00Z".parse().unwrap(),
        );
        draft.into_task(RecordId::Seq(1))
    }

    #[test]
    fn record_id_parses_digits_as_sequential() {
        assert_eq!("42".parse::<RecordId>().unwrap(), RecordId::Seq(42));
        assert_eq!(
            "0195f3a2-7c3e".parse::<RecordId>().unwrap(),
            RecordId::Opaque("0195f3a2-7c3e".into())
        );
        assert_eq!("".parse::<RecordId>().unwrap(), RecordId::Opaque(String::new()));
    }

    #[test]
    fn record_id_serialises_by_shape() {
        assert_eq!(serde_json::to_string(&RecordId::Seq(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&RecordId::Opaque("abc".into())).unwrap(),
            "\"abc\""
        );
        let back: RecordId = serde_json::from_str("12").unwrap();
        assert_eq!(back, RecordId::Seq(12));
    }

    #[test]
    fn sequential_ids_follow_the_maximum() {
        let existing = [RecordId::Seq(2), RecordId::Seq(9), RecordId::Seq(4)];
        assert_eq!(IdScheme::Sequential.next(&existing), RecordId::Seq(10));
        assert_eq!(IdScheme::Sequential.next(std::iter::empty()), RecordId::Seq(1));
    }

    #[test]
    fn opaque_ids_are_unique() {
        let a = IdScheme::Opaque.next(std::iter::empty());
        let b = IdScheme::Opaque.next(std::iter::empty());
        assert!(matches!(a, RecordId::Opaque(_)));
        assert_ne!(a, b);
    }

    #[test]
    fn like_toggle_twice_restores_state() {
        let mut likes = Likes {
            is_liked: Some(false),
            likes_count: Some(4),
        };
        assert!(likes.toggle());
        assert_eq!(likes.count(), 5);
        assert!(!likes.toggle());
        assert_eq!(likes.count(), 4);
        assert!(!likes.is_liked());
    }

    #[test]
    fn like_counter_never_goes_negative() {
        let mut likes = Likes {
            is_liked: Some(true),
            likes_count: Some(0),
        };
        likes.toggle();
        assert_eq!(likes.count(), 0);
    }

    #[test]
    fn task_serialises_camel_case() {
        let json = serde_json::to_value(task()).unwrap();
        assert_eq!(json["userId"], 7);
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["labels"][1], "urgent");
        assert!(json.get("createdAt").is_some());
        // Absent until first like / first comment.
        assert!(json.get("isLiked").is_none());
        assert!(json.get("comments").is_none());
    }

    #[test]
    fn task_reads_legacy_record_with_likes() {
        let json = r#"{
            "id": 3, "title": "t", "description": "d", "priority": "low",
            "status": "pending", "labels": ["misc"], "completed": true,
            "userId": 1, "createdAt": "2025-11-02T08:00:00.000Z",
            "updatedAt": "2025-11-02T08:00:00.000Z",
            "isLiked": true, "likesCount": 2
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, RecordId::Seq(3));
        assert!(task.likes.is_liked());
        assert_eq!(task.likes.count(), 2);
        assert!(task.comments.is_empty());
    }

    #[test]
    fn search_covers_title_description_and_labels() {
        let t = task();
        assert!(t.matches_search("report"));
        assert!(t.matches_search("quarterly"));
        assert!(t.matches_search("urg"));
        assert!(!t.matches_search("holiday"));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut t = task();
        let now: DateTime<Utc> = "2026-03-02T10:00:00Z".parse().unwrap();
        TaskPatch {
            status: Some(Status::Completed),
            ..Default::default()
        }
        .apply(&mut t, now);
        assert_eq!(t.status, Status::Completed);
        assert_eq!(t.title, "Write report");
        assert_eq!(t.updated_at, now);
    }
}
