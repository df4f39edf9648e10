use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TaskCreate, TaskQuery, TaskUpdate},
    services::tasks,
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

/// Retrieves the authenticated user's tasks.
///
/// Tasks are ordered by creation time, oldest first.
///
/// ## Query Parameters:
/// - `done` (optional): only tasks with this completion state.
/// - `limit` (optional, 1..=1000, default 100) and `offset` (optional, default 0).
///
/// ## Responses:
/// - `200 OK`: a JSON array of `Task` objects, possibly empty.
/// - `401 Unauthorized` / `403 Forbidden`: missing, expired or invalid token.
#[get("/")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = tasks::list(state.store.as_ref(), &user, query_params.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Responses:
/// - `201 Created`: the new `Task`.
/// - `422 Unprocessable Entity`: the text is empty.
#[post("/")]
pub async fn create_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_data: web::Json<TaskCreate>,
) -> Result<impl Responder, AppError> {
    let task = tasks::create(state.store.as_ref(), &user, task_data.into_inner()).await?;
    Ok(HttpResponse::Created().json(task))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: the `Task`.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[get("/{id}/")]
pub async fn get_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let task = tasks::get(state.store.as_ref(), &user, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task. Absent fields keep their value.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[patch("/{id}/")]
pub async fn update_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<i32>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    let task = tasks::update(
        state.store.as_ref(),
        &user,
        task_id.into_inner(),
        task_data.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task.
///
/// ## Responses:
/// - `204 No Content`: on successful deletion.
/// - `404 Not Found`: no such task, or it belongs to another user.
#[delete("/{id}/")]
pub async fn delete_task(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    task_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    tasks::delete(state.store.as_ref(), &user, task_id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
