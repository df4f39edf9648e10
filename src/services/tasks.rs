//! Task operations on behalf of a resolved requester.
//!
//! Every operation is scoped by `requester.id`. A task that belongs to another
//! user yields the same `NotFound` as a task that does not exist.

use chrono::Utc;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskCreate, TaskQuery, TaskUpdate, User};
use crate::store::TaskStore;

fn task_not_found() -> AppError {
    AppError::NotFound("Task not found".into())
}

/// An empty page is a valid result.
pub async fn list<S: TaskStore + ?Sized>(
    store: &S,
    requester: &User,
    query: TaskQuery,
) -> Result<Vec<Task>, AppError> {
    let paging = query.paging();
    paging.validate()?;
    store
        .list_tasks(requester.id, query.done, paging.limit(), paging.offset())
        .await
}

pub async fn create<S: TaskStore + ?Sized>(
    store: &S,
    requester: &User,
    input: TaskCreate,
) -> Result<Task, AppError> {
    input.validate()?;
    let task = store.insert_task(requester.id, input.text, Utc::now()).await?;

    log::info!("User {} created task {}", requester.id, task.id);
    Ok(task)
}

pub async fn get<S: TaskStore + ?Sized>(store: &S, requester: &User, task_id: i32) -> Result<Task, AppError> {
    store
        .find_task(requester.id, task_id)
        .await?
        .ok_or_else(task_not_found)
}

/// Applies only the supplied fields; `updated_at` is refreshed regardless.
pub async fn update<S: TaskStore + ?Sized>(
    store: &S,
    requester: &User,
    task_id: i32,
    input: TaskUpdate,
) -> Result<Task, AppError> {
    input.validate()?;
    store
        .update_task(requester.id, task_id, input, Utc::now())
        .await?
        .ok_or_else(task_not_found)
}

/// Deleting an already deleted task fails with `NotFound`.
pub async fn delete<S: TaskStore + ?Sized>(store: &S, requester: &User, task_id: i32) -> Result<(), AppError> {
    if !store.delete_task(requester.id, task_id).await? {
        return Err(task_not_found());
    }

    log::info!("User {} deleted task {}", requester.id, task_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::store::{MemoryStore, UserStore};
    use pretty_assertions::assert_eq;

    async fn user(store: &MemoryStore, login: &str) -> User {
        store
            .insert_user(NewUser {
                login: login.to_string(),
                password_hash: "hash".to_string(),
                email: None,
                first_name: None,
                last_name: None,
                registered_at: Utc::now(),
            })
            .await
            .unwrap()
    }

    fn text(t: &str) -> TaskCreate {
        TaskCreate { text: t.to_string() }
    }

    #[actix_rt::test]
    async fn test_create_sets_author_and_defaults() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        let task = create(&store, &alice, text("buy milk")).await.unwrap();

        assert_eq!(task.author_id, alice.id);
        assert_eq!(task.text, "buy milk");
        assert!(!task.is_done);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[actix_rt::test]
    async fn test_create_rejects_empty_text() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;

        let result = create(&store, &alice, text("")).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn test_other_users_task_is_not_found() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let task = create(&store, &alice, text("buy milk")).await.unwrap();

        let as_missing = get(&store, &bob, 9999).await.unwrap_err().to_string();
        let as_foreign = get(&store, &bob, task.id).await.unwrap_err().to_string();
        assert_eq!(as_foreign, as_missing);

        let update_result = update(
            &store,
            &bob,
            task.id,
            TaskUpdate {
                text: Some("hijacked".into()),
                is_done: None,
            },
        )
        .await;
        assert!(matches!(update_result, Err(AppError::NotFound(_))));
        assert!(matches!(delete(&store, &bob, task.id).await, Err(AppError::NotFound(_))));

        let untouched = get(&store, &alice, task.id).await.unwrap();
        assert_eq!(untouched.text, "buy milk");
        assert!(list(&store, &bob, TaskQuery::default()).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_update_changes_only_supplied_fields() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let task = create(&store, &alice, text("buy milk")).await.unwrap();

        let done = update(
            &store,
            &alice,
            task.id,
            TaskUpdate {
                text: None,
                is_done: Some(true),
            },
        )
        .await
        .unwrap();
        assert_eq!(done.text, "buy milk");
        assert!(done.is_done);
        assert!(done.updated_at >= task.updated_at);
        assert_eq!(done.created_at, task.created_at);

        let renamed = update(&store, &alice, task.id, TaskUpdate::default()).await.unwrap();
        assert_eq!(renamed.text, "buy milk");
        assert!(renamed.is_done);
        assert!(renamed.updated_at >= done.updated_at);
    }

    #[actix_rt::test]
    async fn test_delete_twice_fails() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let task = create(&store, &alice, text("buy milk")).await.unwrap();

        delete(&store, &alice, task.id).await.unwrap();
        assert!(matches!(delete(&store, &alice, task.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(get(&store, &alice, task.id).await, Err(AppError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_list_filters_by_done() {
        let store = MemoryStore::new();
        let alice = user(&store, "alice").await;
        let first = create(&store, &alice, text("one")).await.unwrap();
        create(&store, &alice, text("two")).await.unwrap();
        update(
            &store,
            &alice,
            first.id,
            TaskUpdate {
                text: None,
                is_done: Some(true),
            },
        )
        .await
        .unwrap();

        let done = list(
            &store,
            &alice,
            TaskQuery {
                done: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].text, "one");

        assert_eq!(list(&store, &alice, TaskQuery::default()).await.unwrap().len(), 2);
    }
}
