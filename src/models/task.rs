use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Paging;

/// Represents a task entity as stored in `task_table` and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Task {
    /// Unique identifier, assigned by the store.
    pub id: i32,
    /// The task text. Never empty.
    pub text: String,
    /// Whether the task has been completed.
    pub is_done: bool,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every update.
    pub updated_at: DateTime<Utc>,
    /// The owning user. Fixed at creation.
    pub author_id: i32,
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    #[validate(length(min = 1))]
    pub text: String,
}

/// Partial update for a task. Only the fields that are present are applied.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    pub is_done: Option<bool>,
}

impl TaskUpdate {
    /// Merges the present fields into `task` and advances `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if `now` lags behind it.
    pub fn apply_to(&self, task: &mut Task, now: DateTime<Utc>) {
        if let Some(text) = &self.text {
            task.text = text.clone();
        }
        if let Some(is_done) = self.is_done {
            task.is_done = is_done;
        }
        task.updated_at = now.max(task.updated_at);
    }
}

/// Represents query parameters for listing tasks.
///
/// Paging fields are spelled out rather than `#[serde(flatten)]`ed from
/// [`Paging`]: query-string numbers do not deserialize through a flattened struct.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Filter tasks by completion state.
    pub done: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TaskQuery {
    pub fn paging(&self) -> Paging {
        Paging {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

impl Task {
    /// Creates an unsaved task owned by `author_id`. The store assigns the id.
    pub fn new(text: String, author_id: i32, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            text,
            is_done: false,
            created_at: now,
            updated_at: now,
            author_id,
        }
    }
}
