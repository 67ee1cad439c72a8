//! Comment and reply types.

use serde::{Deserialize, Serialize};
use taskboard::validation::comment_text;
use taskboard::{Comment, RecordId, Reply, ValidationError};

/// Body shared by post-comment, reply-to-comment, edit-comment, and
/// edit-reply.
///
/// ```json
/// { "text": "Looks good to me" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRequest {
    pub text: Option<String>,
}

impl CommentRequest {
    /// The trimmed text, which must not be empty.
    pub fn validate(self) -> Result<String, ValidationError> {
        comment_text(self.text.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentResponse {
    pub message: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyResponse {
    pub message: String,
    pub reply: Reply,
}

/// Response of `GET /api/tasks/{id}/comments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentListResponse {
    pub task_id: RecordId,
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let req: CommentRequest = serde_json::from_str(r#"{"text":"   "}"#).unwrap();
        assert_eq!(req.validate().unwrap_err(), ValidationError::MissingText);
        let req: CommentRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn list_uses_task_id_key() {
        let json = serde_json::to_value(CommentListResponse {
            task_id: RecordId::Opaque("abc".into()),
            comments: vec![],
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"taskId": "abc", "comments": []}));
    }
}
