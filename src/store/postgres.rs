use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use super::{TaskStore, UserStore};
use crate::error::AppError;
use crate::models::{NewUser, Task, TaskUpdate, User, UserChanges};

const USER_COLUMNS: &str = "id, login, password, email, first_name, last_name, registered_at";
const TASK_COLUMNS: &str = "id, text, is_done, created_at, updated_at, author_id";

/// PostgreSQL-backed store.
///
/// Writes run inside a transaction taken from the pool. A transaction that is
/// dropped without `commit` is rolled back, so every early return through `?`
/// releases the connection and discards partial work.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(options: PgConnectOptions, max_connections: u32) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn connect_url(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let options: PgConnectOptions = database_url.parse()?;
        Self::connect(options, max_connections).await
    }

    /// Applies the embedded migrations from `migrations/`.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM user_table ORDER BY id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO user_table (login, password, email, first_name, last_name, registered_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&user.login)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.registered_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict("Login is already in use".into()),
            other => other,
        })?;

        tx.commit().await?;
        Ok(created)
    }

    async fn find_user_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM user_table WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM user_table WHERE login = $1",
            USER_COLUMNS
        ))
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_user(&self, id: i32, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE user_table
             SET password = COALESCE($2, password),
                 email = COALESCE($3, email),
                 first_name = COALESCE($4, first_name),
                 last_name = COALESCE($5, last_name)
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(&changes.password_hash)
        .bind(&changes.email)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(
        &self,
        author_id: i32,
        done: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM task_table
             WHERE author_id = $1 AND ($2::boolean IS NULL OR is_done = $2)
             ORDER BY created_at, id
             LIMIT $3 OFFSET $4",
            TASK_COLUMNS
        ))
        .bind(author_id)
        .bind(done)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn insert_task(&self, author_id: i32, text: String, now: DateTime<Utc>) -> Result<Task, AppError> {
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO task_table (text, is_done, created_at, updated_at, author_id)
             VALUES ($1, FALSE, $2, $2, $3)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(text)
        .bind(now)
        .bind(author_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn find_task(&self, author_id: i32, id: i32) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM task_table WHERE id = $1 AND author_id = $2",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn update_task(
        &self,
        author_id: i32,
        id: i32,
        update: TaskUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<Task>, AppError> {
        let mut tx = self.pool.begin().await?;

        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE task_table
             SET text = COALESCE($3, text),
                 is_done = COALESCE($4, is_done),
                 updated_at = GREATEST($5, updated_at)
             WHERE id = $1 AND author_id = $2
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(author_id)
        .bind(update.text)
        .bind(update.is_done)
        .bind(now)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    async fn delete_task(&self, author_id: i32, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM task_table WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
