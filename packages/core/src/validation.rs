//! Field-level validation shared by every operation that accepts input.
//!
//! Each check returns the first [`ValidationError`] it finds. Callers run all
//! checks before touching storage, so a failed request never mutates
//! anything.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{Label, Priority, Status};

/// Errors returned when request input fails validation. The `Display`
/// output is the message sent to the client.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    // --- accounts ------------------------------------------------------------
    #[error("All fields are required")]
    MissingAccountFields,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error(
        "Password must be at least 8 characters long and include uppercase, \
         lowercase, number, and special character"
    )]
    WeakPassword,

    // --- task creation -------------------------------------------------------
    #[error("{0} is required.")]
    Required(&'static str),

    #[error("Invalid priority provided.")]
    InvalidPriority,

    #[error("Invalid status provided.")]
    InvalidStatus,

    #[error("At least one label is required.")]
    MissingLabels,

    #[error("Invalid label(s) provided.")]
    InvalidLabel,

    #[error("Completed must be boolean")]
    CompletedNotBoolean,

    // --- task update ---------------------------------------------------------
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Invalid status.")]
    UnknownStatus,

    #[error("Invalid priority.")]
    UnknownPriority,

    #[error("Invalid labels: {}. Allowed: work, personal, urgent, misc", .0.join(", "))]
    UnknownLabels(Vec<String>),

    // --- comments ------------------------------------------------------------
    #[error("Comment text is required.")]
    MissingText,
}

/// `^[^\s@]+@[^\s@]+\.[^\s@]+$`
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex")
});

const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 8 characters with a lowercase letter, an uppercase letter, a
/// digit, and one of `!@#$%^&*(),.?":{}|<>`.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= 8
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

/// Trim `value` and require it to be non-empty.
pub fn required_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::Required(field)),
    }
}

/// For partial updates: absent is fine, present-but-blank is not.
pub fn optional_text(
    value: Option<&str>,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Err(ValidationError::Empty(field)),
        Some(v) => Ok(Some(v.trim().to_string())),
    }
}

/// Collapse duplicate labels, keeping the first occurrence's position.
pub fn dedup_labels(labels: Vec<Label>) -> Vec<Label> {
    let mut out: Vec<Label> = Vec::with_capacity(labels.len());
    for label in labels {
        if !out.contains(&label) {
            out.push(label);
        }
    }
    out
}

/// Parse the label list of a new task. Values must already be lowercase.
pub fn new_task_labels(labels: Option<&[String]>) -> Result<Vec<Label>, ValidationError> {
    let labels = match labels {
        Some(l) if !l.is_empty() => l,
        _ => return Err(ValidationError::MissingLabels),
    };
    let parsed = labels
        .iter()
        .map(|l| l.parse::<Label>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| ValidationError::InvalidLabel)?;
    Ok(dedup_labels(parsed))
}

pub fn new_task_priority(value: Option<&str>) -> Result<Priority, ValidationError> {
    let v = required_text(value, "Priority")?;
    v.parse().map_err(|_| ValidationError::InvalidPriority)
}

pub fn new_task_status(value: Option<&str>) -> Result<Status, ValidationError> {
    let v = required_text(value, "Status")?;
    v.parse().map_err(|_| ValidationError::InvalidStatus)
}

/// Update variant: case-insensitive, blank rejected, absent allowed.
pub fn patch_priority(value: Option<&str>) -> Result<Option<Priority>, ValidationError> {
    match optional_text(value, "Priority")? {
        None => Ok(None),
        Some(v) => v
            .to_lowercase()
            .parse()
            .map(Some)
            .map_err(|_| ValidationError::UnknownPriority),
    }
}

pub fn patch_status(value: Option<&str>) -> Result<Option<Status>, ValidationError> {
    match optional_text(value, "Status")? {
        None => Ok(None),
        Some(v) => v
            .to_lowercase()
            .parse()
            .map(Some)
            .map_err(|_| ValidationError::UnknownStatus),
    }
}

pub fn patch_labels(labels: Option<&[String]>) -> Result<Option<Vec<Label>>, ValidationError> {
    let Some(labels) = labels else {
        return Ok(None);
    };
    if labels.is_empty() {
        return Err(ValidationError::Empty("Labels"));
    }
    let mut parsed = Vec::with_capacity(labels.len());
    let mut invalid = Vec::new();
    for raw in labels {
        match raw.to_lowercase().parse::<Label>() {
            Ok(l) => parsed.push(l),
            Err(_) => invalid.push(raw.clone()),
        }
    }
    if !invalid.is_empty() {
        return Err(ValidationError::UnknownLabels(invalid));
    }
    Ok(Some(dedup_labels(parsed)))
}

pub fn comment_text(value: Option<&str>) -> Result<String, ValidationError> {
    required_text(value, "Text").map_err(|_| ValidationError::MissingText)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("ada@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada @example.com"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn password_strength() {
        assert!(is_strong_password("Secur3!pw"));
        assert!(!is_strong_password("Sh0rt!"));
        assert!(!is_strong_password("nouppercase1!"));
        assert!(!is_strong_password("NOLOWERCASE1!"));
        assert!(!is_strong_password("NoDigits!!"));
        assert!(!is_strong_password("NoSpecial12"));
    }

    #[test]
    fn required_text_trims() {
        assert_eq!(required_text(Some("  hi  "), "Title").unwrap(), "hi");
        assert_eq!(
            required_text(Some("   "), "Title").unwrap_err().to_string(),
            "Title is required."
        );
        assert_eq!(
            required_text(None, "Description").unwrap_err(),
            ValidationError::Required("Description")
        );
    }

    #[test]
    fn new_task_enums_are_case_sensitive() {
        assert_eq!(new_task_priority(Some("high")).unwrap(), Priority::High);
        assert_eq!(
            new_task_priority(Some("HIGH")).unwrap_err(),
            ValidationError::InvalidPriority
        );
        assert_eq!(new_task_status(Some("in-progress")).unwrap(), Status::InProgress);
        assert_eq!(
            new_task_status(Some("")).unwrap_err(),
            ValidationError::Required("Status")
        );
    }

    #[test]
    fn new_task_labels_rules() {
        assert_eq!(
            new_task_labels(Some(&strs(&[]))).unwrap_err(),
            ValidationError::MissingLabels
        );
        assert_eq!(new_task_labels(None).unwrap_err(), ValidationError::MissingLabels);
        assert_eq!(
            new_task_labels(Some(&strs(&["work", "beach"]))).unwrap_err(),
            ValidationError::InvalidLabel
        );
        assert_eq!(
            new_task_labels(Some(&strs(&["work", "misc", "work"]))).unwrap(),
            vec![Label::Work, Label::Misc]
        );
    }

    #[test]
    fn patch_values_are_lowercased() {
        assert_eq!(patch_status(Some("Completed")).unwrap(), Some(Status::Completed));
        assert_eq!(patch_priority(None).unwrap(), None);
        assert_eq!(
            patch_priority(Some(" ")).unwrap_err().to_string(),
            "Priority cannot be empty"
        );
        assert_eq!(
            patch_status(Some("done")).unwrap_err(),
            ValidationError::UnknownStatus
        );
    }

    #[test]
    fn patch_labels_lists_offenders() {
        let err = patch_labels(Some(&strs(&["Work", "beach", "gym"]))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid labels: beach, gym. Allowed: work, personal, urgent, misc"
        );
        assert_eq!(
            patch_labels(Some(&strs(&[]))).unwrap_err().to_string(),
            "Labels cannot be empty"
        );
        assert_eq!(
            patch_labels(Some(&strs(&["URGENT"]))).unwrap(),
            Some(vec![Label::Urgent])
        );
    }

    #[test]
    fn comment_text_rules() {
        assert_eq!(comment_text(Some(" nice ")).unwrap(), "nice");
        assert_eq!(comment_text(Some("")).unwrap_err(), ValidationError::MissingText);
    }
}
