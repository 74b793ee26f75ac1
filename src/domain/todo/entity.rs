//! Todo entity and related types

use std::fmt;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Todo identifier assigned by the durable store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    /// Parses a path/key segment; only positive decimal integers are ids
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().parse::<i64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(DomainError::invalid_id(format!(
                "todo id must be a positive integer, got '{}'",
                raw
            ))),
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored todo
///
/// `completed` is the single source of truth for completion; `complete` is
/// derived from it and only exists on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TodoRecord", into = "TodoRecord")]
pub struct Todo {
    id: TodoId,
    title: String,
    updated: DateTime<Utc>,
    completed: Option<DateTime<Utc>>,
}

impl Todo {
    /// Rebuilds a todo from stored columns
    pub fn restore(
        id: TodoId,
        title: impl Into<String>,
        updated: DateTime<Utc>,
        completed: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            updated,
            completed,
        }
    }

    /// Builds the first stored version of a new todo
    pub fn created(id: TodoId, candidate: &NewTodo, now: DateTime<Utc>) -> Self {
        let updated = write_time(None, now);

        Self {
            id,
            title: candidate.title.clone(),
            updated,
            completed: candidate.complete.then_some(updated),
        }
    }

    pub fn id(&self) -> TodoId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn updated(&self) -> DateTime<Utc> {
        self.updated
    }

    pub fn completed(&self) -> Option<DateTime<Utc>> {
        self.completed
    }

    pub fn is_complete(&self) -> bool {
        self.completed.is_some()
    }

    /// Returns the version of this todo after applying `update` at `now`
    ///
    /// The title is always overwritten and `updated` always advances.
    /// `completed` is set on incomplete -> complete, cleared on
    /// complete -> incomplete, and kept otherwise.
    pub fn apply_update(&self, update: &UpdateTodo, now: DateTime<Utc>) -> Self {
        let updated = write_time(Some(self.updated), now);

        let completed = match (self.completed, update.complete) {
            (None, true) => Some(updated),
            (Some(_), false) => None,
            (existing, _) => existing,
        };

        Self {
            id: self.id,
            title: update.title.clone(),
            updated,
            completed,
        }
    }
}

/// Timestamp for a write, at microsecond precision and strictly after `previous`
pub fn write_time(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    let now = now.trunc_subsecs(6);

    match previous {
        Some(previous) if now <= previous => previous + Duration::microseconds(1),
        _ => now,
    }
}

/// Orders todos for the collection view: most recently updated first
pub fn sort_for_listing(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        b.updated
            .cmp(&a.updated)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[derive(Serialize, Deserialize)]
struct TodoRecord {
    id: TodoId,
    title: String,
    updated: DateTime<Utc>,
    #[serde(default)]
    completed: Option<DateTime<Utc>>,
    #[serde(default)]
    complete: bool,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            updated: record.updated,
            completed: record.completed,
        }
    }
}

impl From<Todo> for TodoRecord {
    fn from(todo: Todo) -> Self {
        Self {
            complete: todo.completed.is_some(),
            id: todo.id,
            title: todo.title,
            updated: todo.updated,
            completed: todo.completed,
        }
    }
}

/// Candidate for creation; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub complete: bool,
}

impl NewTodo {
    pub fn new(title: impl Into<String>, complete: bool) -> Self {
        Self {
            title: title.into(),
            complete,
        }
    }
}

/// Desired state of an existing todo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTodo {
    pub id: TodoId,
    pub title: String,
    pub complete: bool,
}

impl UpdateTodo {
    pub fn new(id: TodoId, title: impl Into<String>, complete: bool) -> Self {
        Self {
            id,
            title: title.into(),
            complete,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(TodoId::parse("15").unwrap(), TodoId::new(15));
        assert!(TodoId::parse("abc").is_err());
        assert!(TodoId::parse("0").is_err());
        assert!(TodoId::parse("-3").is_err());
        assert!(matches!(
            TodoId::parse("x1"),
            Err(DomainError::InvalidId { .. })
        ));
    }

    #[test]
    fn test_created_sets_completed_only_when_complete() {
        let open = Todo::created(TodoId::new(1), &NewTodo::new("buy milk", false), at(100));
        assert!(!open.is_complete());
        assert_eq!(open.completed(), None);
        assert_eq!(open.updated(), at(100));

        let done = Todo::created(TodoId::new(2), &NewTodo::new("pay rent", true), at(100));
        assert!(done.is_complete());
        assert_eq!(done.completed(), Some(at(100)));
    }

    #[test]
    fn test_apply_update_transitions() {
        let todo = Todo::created(TodoId::new(1), &NewTodo::new("a", false), at(100));

        let done = todo.apply_update(&UpdateTodo::new(todo.id(), "a", true), at(200));
        assert_eq!(done.completed(), Some(at(200)));
        assert_eq!(done.updated(), at(200));

        let still_done = done.apply_update(&UpdateTodo::new(todo.id(), "b", true), at(300));
        assert_eq!(still_done.completed(), Some(at(200)));
        assert_eq!(still_done.title(), "b");
        assert_eq!(still_done.updated(), at(300));

        let reopened = still_done.apply_update(&UpdateTodo::new(todo.id(), "b", false), at(400));
        assert_eq!(reopened.completed(), None);
        assert!(!reopened.is_complete());
    }

    #[test]
    fn test_write_time_strictly_increases() {
        let previous = at(500);

        assert_eq!(
            write_time(Some(previous), at(400)),
            previous + Duration::microseconds(1)
        );
        assert_eq!(
            write_time(Some(previous), previous),
            previous + Duration::microseconds(1)
        );
        assert_eq!(write_time(Some(previous), at(600)), at(600));
    }

    #[test]
    fn test_write_time_truncates_to_micros() {
        let now = Utc.timestamp_opt(10, 123_456_789).unwrap();
        assert_eq!(write_time(None, now).timestamp_subsec_nanos(), 123_456_000);
    }

    #[test]
    fn test_sort_for_listing() {
        let mut todos = vec![
            Todo::restore(TodoId::new(1), "old", at(10), None),
            Todo::restore(TodoId::new(2), "new", at(30), None),
            Todo::restore(TodoId::new(3), "mid", at(20), None),
        ];

        sort_for_listing(&mut todos);

        let ids: Vec<i64> = todos.iter().map(|t| t.id().value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_serialization_carries_derived_complete() {
        let todo = Todo::restore(TodoId::new(9), "x", at(10), Some(at(10)));
        let json = serde_json::to_value(&todo).unwrap();

        assert_eq!(json["id"], 9);
        assert_eq!(json["complete"], true);
        assert!(json["completed"].is_string());

        let back: Todo = serde_json::from_value(json).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn test_deserialization_trusts_completed_over_flag() {
        let json = serde_json::json!({
            "id": 4,
            "title": "x",
            "updated": "2024-01-01T00:00:00Z",
            "completed": null,
            "complete": true
        });

        let todo: Todo = serde_json::from_value(json).unwrap();
        assert!(!todo.is_complete());
    }
}
