use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskUpdate, User, UserChanges};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    tasks: BTreeMap<i32, Task>,
    last_user_id: i32,
    last_task_id: i32,
}

/// In-process store with the same semantics as [`super::PgStore`].
///
/// Used by the test suite and for running the service without a database.
/// Each call takes the lock once and releases it before returning.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(page(tables.users.values().cloned(), limit, offset))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.login == user.login) {
            return Err(AppError::Conflict("Login is already in use".into()));
        }

        tables.last_user_id += 1;
        let stored = User {
            id: tables.last_user_id,
            login: user.login,
            password: user.password_hash,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            registered_at: user.registered_at,
        };
        tables.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.login == login).cloned())
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables.users.get_mut(&id).map(|user| {
            changes.apply_to(user);
            user.clone()
        }))
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(
        &self,
        author_id: i32,
        done: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, AppError> {
        let tables = self.tables.lock().await;
        let mut owned: Vec<&Task> = tables
            .tasks
            .values()
            .filter(|t| t.author_id == author_id)
            .filter(|t| done.map_or(true, |d| t.is_done == d))
            .collect();
        owned.sort_by_key(|t| (t.created_at, t.id));

        Ok(page(owned.into_iter().cloned(), limit, offset))
    }

    async fn insert_task(&self, author_id: i32, text: String, now: DateTime<Utc>) -> Result<Task, AppError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.contains_key(&author_id) {
            return Err(AppError::DatabaseError(format!(
                "author {} does not exist",
                author_id
            )));
        }

        tables.last_task_id += 1;
        let mut task = Task::new(text, author_id, now);
        task.id = tables.last_task_id;
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find_task(&self, author_id: i32, id: i32) -> Result<Option<Task>, AppError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .tasks
            .get(&id)
            .filter(|t| t.author_id == author_id)
            .cloned())
    }

    async fn update_task(
        &self,
        author_id: i32,
        id: i32,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError> {
        let mut tables = self.tables.lock().await;
        Ok(tables
            .tasks
            .get_mut(&id)
            .filter(|t| t.author_id == author_id)
            .map(|task| {
                update.apply_to(task, now);
                task.clone()
            }))
    }

    async fn delete_task(&self, author_id: i32, id: i32) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().await;
        let owned = tables
            .tasks
            .get(&id)
            .map_or(false, |t| t.author_id == author_id);
        if owned {
            tables.tasks.remove(&id);
        }
        Ok(owned)
    }
}
