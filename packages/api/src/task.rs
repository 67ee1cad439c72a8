//! Task types: creation, partial update, and the response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use taskboard::validation::{
    new_task_labels, new_task_priority, new_task_status, optional_text, patch_labels,
    patch_priority, patch_status, required_text,
};
use taskboard::{NewTask, Task, TaskPatch, ValidationError};

/// Body of `POST /api/tasks`.
///
/// Every field is required. `completed` is kept as raw JSON so a non-boolean
/// value is reported as a validation failure rather than a parse failure.
///
/// ```json
/// {
///   "title": "Write report",
///   "description": "Quarterly numbers",
///   "priority": "high",
///   "status": "pending",
///   "labels": ["work"],
///   "completed": false
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub labels: Option<Vec<String>>,
    pub completed: Option<Value>,
}

impl CreateTaskRequest {
    pub fn validate(self) -> Result<NewTask, ValidationError> {
        let title = required_text(self.title.as_deref(), "Title")?;
        let description = required_text(self.description.as_deref(), "Description")?;
        let priority = new_task_priority(self.priority.as_deref())?;
        let status = new_task_status(self.status.as_deref())?;
        let labels = new_task_labels(self.labels.as_deref())?;
        let completed = self
            .completed
            .as_ref()
            .and_then(Value::as_bool)
            .ok_or(ValidationError::CompletedNotBoolean)?;
        Ok(NewTask {
            title,
            description,
            priority,
            status,
            labels,
            completed,
        })
    }
}

/// Body of `PATCH /api/tasks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl UpdateTaskRequest {
    /// Blank values are reported before unknown ones, field by field.
    pub fn validate(self) -> Result<TaskPatch, ValidationError> {
        let title = optional_text(self.title.as_deref(), "Title")?;
        let description = optional_text(self.description.as_deref(), "Description")?;
        optional_text(self.priority.as_deref(), "Priority")?;
        optional_text(self.status.as_deref(), "Status")?;
        if self.labels.as_ref().is_some_and(Vec::is_empty) {
            return Err(ValidationError::Empty("Labels"));
        }

        let status = patch_status(self.status.as_deref())?;
        let priority = patch_priority(self.priority.as_deref())?;
        let labels = patch_labels(self.labels.as_deref())?;
        Ok(TaskPatch {
            title,
            description,
            priority,
            status,
            labels,
        })
    }
}

/// `{ "message": ... }`, used by the health check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

/// Envelope for create, mark-complete/incomplete, and like-task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskResponse {
    pub message: String,
    pub task: Task,
}

/// Envelope for `PATCH /api/tasks/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskResponse {
    pub message: String,
    pub updated_task: Task,
}

/// Response of `GET /api/user/my-tasks`: the caller's tasks, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MyTasksResponse {
    pub total_data: usize,
    pub data: Vec<Task>,
}

#[cfg(test)]
mod tests {
    use taskboard::{Label, Priority, RecordId, Status};

    use super::*;

    fn create(json: &str) -> Result<NewTask, ValidationError> {
        serde_json::from_str::<CreateTaskRequest>(json).unwrap().validate()
    }

    #[test]
    fn create_builds_trimmed_task() {
        let t = create(
            r#"{"title":"  Write  ","description":"d","priority":"high",
                "status":"in-progress","labels":["work","work","urgent"],"completed":false}"#,
        )
        .unwrap();
        assert_eq!(t.title, "Write");
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.status, Status::InProgress);
        assert_eq!(t.labels, vec![Label::Work, Label::Urgent]);
        assert!(!t.completed);
    }

    #[test]
    fn create_reports_first_failure() {
        assert_eq!(
            create(r#"{"description":"d"}"#).unwrap_err().to_string(),
            "Title is required."
        );
        assert_eq!(
            create(r#"{"title":"t","description":"d","priority":"urgent"}"#).unwrap_err(),
            ValidationError::InvalidPriority
        );
        assert_eq!(
            create(
                r#"{"title":"t","description":"d","priority":"low","status":"pending","labels":[]}"#
            )
            .unwrap_err(),
            ValidationError::MissingLabels
        );
    }

    #[test]
    fn create_requires_boolean_completed() {
        let base = r#""title":"t","description":"d","priority":"low","status":"pending","labels":["misc"]"#;
        assert_eq!(
            create(&format!("{{{base},\"completed\":\"yes\"}}")).unwrap_err(),
            ValidationError::CompletedNotBoolean
        );
        assert_eq!(
            create(&format!("{{{base}}}")).unwrap_err(),
            ValidationError::CompletedNotBoolean
        );
        assert!(create(&format!("{{{base},\"completed\":true}}")).unwrap().completed);
    }

    #[test]
    fn update_checks_blanks_before_values() {
        let req = UpdateTaskRequest {
            status: Some("bogus".into()),
            labels: Some(vec![]),
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err().to_string(), "Labels cannot be empty");

        let req = UpdateTaskRequest {
            status: Some("bogus".into()),
            priority: Some("bogus".into()),
            ..Default::default()
        };
        assert_eq!(req.validate().unwrap_err(), ValidationError::UnknownStatus);
    }

    #[test]
    fn update_lowercases_values() {
        let patch = UpdateTaskRequest {
            status: Some("COMPLETED".into()),
            labels: Some(vec!["Personal".into()]),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(patch.status, Some(Status::Completed));
        assert_eq!(patch.labels, Some(vec![Label::Personal]));
        assert_eq!(patch.title, None);
    }

    #[test]
    fn update_response_uses_camel_case() {
        let t = create(
            r#"{"title":"t","description":"d","priority":"low","status":"pending","labels":["misc"],"completed":false}"#,
        )
        .unwrap();
        let created = "2026-02-01T09:00:00Z".parse().unwrap();
        let task = taskboard::TaskDraft::new(t, RecordId::Seq(1), created).into_task(RecordId::Seq(2));
        let json = serde_json::to_value(UpdateTaskResponse {
            message: "Task updated successfully".into(),
            updated_task: task,
        })
        .unwrap();
        assert_eq!(json["updatedTask"]["id"], 2);
    }
}
