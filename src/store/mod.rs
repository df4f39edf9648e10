//! Persistence seam for users and tasks.
//!
//! Every task method takes the owner's id and only ever touches rows whose
//! `author_id` matches it. A task owned by someone else behaves exactly like a
//! task that does not exist.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskUpdate, User, UserChanges};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError>;

    /// Fails with `AppError::Conflict` if the login is already taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, AppError>;

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks of `author_id`, ordered by `created_at` then `id`.
    async fn list_tasks(
        &self,
        author_id: i32,
        done: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, AppError>;

    async fn insert_task(&self, author_id: i32, text: String, now: DateTime<Utc>) -> Result<Task, AppError>;

    async fn find_task(&self, author_id: i32, id: i32) -> Result<Option<Task>, AppError>;

    async fn update_task(
        &self,
        author_id: i32,
        id: i32,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError>;

    /// Returns `false` when no matching task was deleted.
    async fn delete_task(&self, author_id: i32, id: i32) -> Result<bool, AppError>;
}

/// Everything the service needs from its backing store.
pub trait Store: UserStore + TaskStore {}

impl<T: UserStore + TaskStore> Store for T {}
