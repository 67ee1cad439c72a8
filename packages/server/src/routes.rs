//! The ordered route table and the matcher that consults it.
//!
//! Several task routes share the `/api/tasks/...` prefix and differ only in a
//! trailing segment or an embedded keyword (`comments` against `comment`,
//! with or without `replies`). The table is scanned top to bottom and the
//! first row whose method and pattern both match wins, so the order of
//! [`ROUTES`] is part of the API.
//!
//! Pattern syntax, one `/`-delimited segment at a time:
//!
//! | Segment | Matches |
//! |---------|---------|
//! | `tasks` | exactly that literal |
//! | `{task}` | one non-empty segment, percent-decoded, captured as `task` |
//! | `{*rest}` | zero or more trailing segments |

use std::sync::LazyLock;

use axum::http::Method;

/// A logical request kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Health,
    Register,
    Login,
    LikeReply,
    LikeComment,
    EditComment,
    EditReply,
    DeleteComment,
    DeleteReply,
    CreateTask,
    ListComments,
    GetTask,
    ListTasks,
    UpdateTask,
    MarkComplete,
    MarkIncomplete,
    PostComment,
    ReplyToComment,
    DeleteTask,
    LikeTask,
    MyTasks,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Health => "health",
            Operation::Register => "register",
            Operation::Login => "login",
            Operation::LikeReply => "like-reply",
            Operation::LikeComment => "like-comment",
            Operation::EditComment => "edit-comment",
            Operation::EditReply => "edit-reply",
            Operation::DeleteComment => "delete-comment",
            Operation::DeleteReply => "delete-reply",
            Operation::CreateTask => "create-task",
            Operation::ListComments => "list-comments",
            Operation::GetTask => "get-task",
            Operation::ListTasks => "list-tasks",
            Operation::UpdateTask => "update-task",
            Operation::MarkComplete => "mark-complete",
            Operation::MarkIncomplete => "mark-incomplete",
            Operation::PostComment => "post-comment",
            Operation::ReplyToComment => "reply-to-comment",
            Operation::DeleteTask => "delete-task",
            Operation::LikeTask => "like-task",
            Operation::MyTasks => "my-tasks",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Path parameters
// ---------------------------------------------------------------------------

/// Parameters captured while matching, in pattern order. Inserted into the
/// request extensions by the dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(&'static str, String)>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Param(&'static str),
    Rest(&'static str),
}

/// One compiled row of the table.
#[derive(Debug)]
pub struct Route {
    pub method: Method,
    pub pattern: &'static str,
    pub operation: Operation,
    segments: Vec<Segment>,
}

impl Route {
    fn new(method: Method, pattern: &'static str, operation: Operation) -> Self {
        let segments = split(pattern)
            .map(|s| {
                if let Some(name) = s.strip_prefix("{*").and_then(|s| s.strip_suffix('}')) {
                    Segment::Rest(name)
                } else if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Segment::Param(name)
                } else {
                    Segment::Literal(s)
                }
            })
            .collect();
        Self {
            method,
            pattern,
            operation,
            segments,
        }
    }

    /// Match `path` against this row's pattern, ignoring the method.
    fn match_path(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split(path).collect();
        let mut params = Vec::new();

        for (i, segment) in self.segments.iter().enumerate() {
            match *segment {
                Segment::Literal(lit) => {
                    if parts.get(i) != Some(&lit) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let raw = parts.get(i).filter(|p| !p.is_empty())?;
                    let value = urlencoding::decode(raw).ok()?;
                    params.push((name, value.into_owned()));
                }
                Segment::Rest(name) => {
                    let rest = parts.get(i..).unwrap_or_default().join("/");
                    params.push((name, rest));
                    return Some(PathParams(params));
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(PathParams(params))
    }
}

/// `"/"` and `""` have no segments; otherwise split after the leading slash.
fn split(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    trimmed.split('/').filter(move |_| !trimmed.is_empty())
}

/// The route table, in priority order.
pub static ROUTES: LazyLock<Vec<Route>> = LazyLock::new(|| {
    use Operation::*;

    [
        (Method::GET, "/", Health),
        (Method::POST, "/api/register", Register),
        (Method::POST, "/api/login", Login),
        (
            Method::POST,
            "/api/tasks/{task}/comments/{comment}/replies/{reply}/like",
            LikeReply,
        ),
        (Method::POST, "/api/tasks/{task}/comments/{comment}/like", LikeComment),
        (Method::PATCH, "/api/tasks/{task}/comments/{comment}", EditComment),
        (
            Method::PATCH,
            "/api/tasks/{task}/comments/{comment}/replies/{reply}",
            EditReply,
        ),
        (Method::DELETE, "/api/tasks/{task}/comments/{comment}", DeleteComment),
        (
            Method::DELETE,
            "/api/tasks/{task}/comments/{comment}/replies/{reply}",
            DeleteReply,
        ),
        (Method::POST, "/api/tasks", CreateTask),
        (Method::GET, "/api/tasks/{task}/comments", ListComments),
        (Method::GET, "/api/tasks/{task}", GetTask),
        (Method::GET, "/api/tasks/{*rest}", ListTasks),
        (Method::PATCH, "/api/tasks/{task}", UpdateTask),
        (Method::PATCH, "/api/tasks/{task}/complete", MarkComplete),
        (Method::PATCH, "/api/tasks/{task}/incomplete", MarkIncomplete),
        (Method::POST, "/api/tasks/{task}/comments", PostComment),
        (Method::POST, "/api/tasks/{task}/comment/{comment}/reply", ReplyToComment),
        (Method::DELETE, "/api/tasks/{task}", DeleteTask),
        (Method::POST, "/api/tasks/{task}/like", LikeTask),
        (Method::GET, "/api/user/my-tasks", MyTasks),
    ]
    .into_iter()
    .map(|(method, pattern, operation)| Route::new(method, pattern, operation))
    .collect()
});

/// The outcome of a successful classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub operation: Operation,
    pub params: PathParams,
}

/// Classify a request by method and URI path. `None` means no row matched.
pub fn classify(method: &Method, path: &str) -> Option<RouteMatch> {
    ROUTES
        .iter()
        .filter(|route| route.method == *method)
        .find_map(|route| {
            route.match_path(path).map(|params| RouteMatch {
                operation: route.operation,
                params,
            })
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn op(method: Method, path: &str) -> Option<Operation> {
        classify(&method, path).map(|m| m.operation)
    }

    #[test]
    fn every_row_classifies_its_canonical_path() {
        let cases = [
            (Method::GET, "/", Operation::Health),
            (Method::POST, "/api/register", Operation::Register),
            (Method::POST, "/api/login", Operation::Login),
            (Method::POST, "/api/tasks/5/comments/3/replies/7/like", Operation::LikeReply),
            (Method::POST, "/api/tasks/5/comments/3/like", Operation::LikeComment),
            (Method::PATCH, "/api/tasks/5/comments/3", Operation::EditComment),
            (Method::PATCH, "/api/tasks/5/comments/3/replies/7", Operation::EditReply),
            (Method::DELETE, "/api/tasks/5/comments/3", Operation::DeleteComment),
            (Method::DELETE, "/api/tasks/5/comments/3/replies/7", Operation::DeleteReply),
            (Method::POST, "/api/tasks", Operation::CreateTask),
            (Method::GET, "/api/tasks/5/comments", Operation::ListComments),
            (Method::GET, "/api/tasks/5", Operation::GetTask),
            (Method::GET, "/api/tasks", Operation::ListTasks),
            (Method::PATCH, "/api/tasks/5", Operation::UpdateTask),
            (Method::PATCH, "/api/tasks/5/complete", Operation::MarkComplete),
            (Method::PATCH, "/api/tasks/5/incomplete", Operation::MarkIncomplete),
            (Method::POST, "/api/tasks/5/comments", Operation::PostComment),
            (Method::POST, "/api/tasks/5/comment/3/reply", Operation::ReplyToComment),
            (Method::DELETE, "/api/tasks/5", Operation::DeleteTask),
            (Method::POST, "/api/tasks/5/like", Operation::LikeTask),
            (Method::GET, "/api/user/my-tasks", Operation::MyTasks),
        ];
        for (method, path, expected) in &cases {
            assert_eq!(op(method.clone(), path), Some(*expected), "{method} {path}");
        }
        assert_eq!(ROUTES.len(), cases.len());
    }

    #[test]
    fn reply_like_wins_over_shorter_likes() {
        let m = classify(&Method::POST, "/api/tasks/5/comments/3/replies/7/like").unwrap();
        assert_eq!(m.operation, Operation::LikeReply);
        assert_eq!(m.params.get("task"), Some("5"));
        assert_eq!(m.params.get("comment"), Some("3"));
        assert_eq!(m.params.get("reply"), Some("7"));
    }

    #[test]
    fn singular_comment_is_a_distinct_shape() {
        assert_eq!(
            op(Method::POST, "/api/tasks/5/comment/3/reply"),
            Some(Operation::ReplyToComment)
        );
        assert_eq!(op(Method::POST, "/api/tasks/5/comments/3/reply"), None);
        assert_eq!(op(Method::POST, "/api/tasks/5/comment"), None);
    }

    #[test]
    fn get_prefix_falls_through_to_listing() {
        assert_eq!(op(Method::GET, "/api/tasks/5/bogus"), Some(Operation::ListTasks));
        assert_eq!(op(Method::GET, "/api/tasks/"), Some(Operation::ListTasks));
        let m = classify(&Method::GET, "/api/tasks/a/b/c").unwrap();
        assert_eq!(m.params.get("rest"), Some("a/b/c"));
    }

    #[test]
    fn params_never_match_empty_segments() {
        assert_eq!(op(Method::PATCH, "/api/tasks/"), None);
        assert_eq!(op(Method::DELETE, "/api/tasks//comments/3"), None);
    }

    #[test]
    fn params_are_percent_decoded() {
        let m = classify(&Method::GET, "/api/tasks/0195f3a2%2D7c3e").unwrap();
        assert_eq!(m.operation, Operation::GetTask);
        assert_eq!(m.params.get("task"), Some("0195f3a2-7c3e"));
    }

    #[test]
    fn method_and_prefix_must_both_match() {
        assert_eq!(op(Method::PUT, "/api/tasks/5"), None);
        assert_eq!(op(Method::GET, "/api/tasksfoo"), None);
        assert_eq!(op(Method::GET, "/api/user/my-tasks/extra"), None);
        assert_eq!(op(Method::POST, "/api/tasks/5/like/extra"), None);
        assert_eq!(op(Method::GET, "/health"), None);
    }
}
