//! Filtering and pagination for the public task listing.
//!
//! [`TaskQuery::parse`] walks the query pairs once, in order of first
//! appearance, and either rejects an unknown key or records the filters.
//! A recognised key with an unrecognised value (`status=bogus`) is not an
//! error: it makes the whole query unsatisfiable, so the listing comes back
//! as an empty page.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Label, Priority, Status, Task};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

const KNOWN_KEYS: [&str; 6] = ["page", "limit", "status", "priority", "labels", "search"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Invalid query key: {0}")]
    InvalidKey(String),
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub total_data: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub limit: usize,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn empty(current_page: usize, limit: usize) -> Self {
        Self {
            total_data: 0,
            total_pages: 0,
            current_page,
            limit,
            data: Vec::new(),
        }
    }
}

/// A parsed listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub page: usize,
    pub limit: usize,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub label: Option<Label>,
    /// Lower-cased search needle.
    pub search: Option<String>,
    /// Set when a filter value named nothing that exists.
    pub unsatisfiable: bool,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            status: None,
            priority: None,
            label: None,
            search: None,
            unsatisfiable: false,
        }
    }
}

impl TaskQuery {
    /// Parse raw `(key, value)` pairs as they appear in the query string.
    pub fn parse(pairs: &[(String, String)]) -> Result<Self, QueryError> {
        let mut query = TaskQuery::default();

        // First appearance fixes the order; the last occurrence wins the value.
        let mut keys: Vec<&str> = Vec::new();
        for (key, _) in pairs {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }

        // page and limit are read up front so an early empty page still
        // echoes them.
        if keys.contains(&"page") {
            query.page = positive_or(last_value(pairs, "page"), DEFAULT_PAGE);
        }
        if keys.contains(&"limit") {
            query.limit = positive_or(last_value(pairs, "limit"), DEFAULT_LIMIT);
        }

        for key in keys {
            if !KNOWN_KEYS.contains(&key) {
                return Err(QueryError::InvalidKey(key.to_string()));
            }
            let value = last_value(pairs, key).to_lowercase();
            match key {
                "status" => match value.parse() {
                    Ok(s) => query.status = Some(s),
                    Err(_) => return Ok(query.unsatisfiable()),
                },
                "priority" => match value.parse() {
                    Ok(p) => query.priority = Some(p),
                    Err(_) => return Ok(query.unsatisfiable()),
                },
                "labels" => match value.parse() {
                    Ok(l) => query.label = Some(l),
                    Err(_) => return Ok(query.unsatisfiable()),
                },
                "search" => query.search = Some(value),
                _ => {}
            }
        }
        Ok(query)
    }

    fn unsatisfiable(mut self) -> Self {
        self.unsatisfiable = true;
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if self.unsatisfiable {
            return false;
        }
        self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self.label.is_none_or(|l| task.labels.contains(&l))
            && self
                .search
                .as_deref()
                .is_none_or(|needle| task.matches_search(needle))
    }

    /// Sort newest first, filter, and cut out the requested page.
    pub fn apply(&self, mut tasks: Vec<Task>) -> Page<Task> {
        if self.unsatisfiable {
            return Page::empty(self.page, self.limit);
        }
        // Later insertions win ties.
        tasks.reverse();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tasks.retain(|t| self.matches(t));

        let total_data = tasks.len();
        let total_pages = total_data.div_ceil(self.limit);
        let start = (self.page - 1).saturating_mul(self.limit);
        let data = tasks.into_iter().skip(start).take(self.limit).collect();

        Page {
            total_data,
            total_pages,
            current_page: self.page,
            limit: self.limit,
            data,
        }
    }
}

fn last_value<'a>(pairs: &'a [(String, String)], key: &str) -> &'a str {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .unwrap_or_default()
}

/// Leading-digit parse clamped to at least 1. Anything without a leading
/// digit falls back to `default`.
fn positive_or(raw: &str, default: usize) -> usize {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return default;
    }
    if sign < 0 {
        return 1;
    }
    digits[..end].parse::<usize>().unwrap_or(usize::MAX).max(1)
}
