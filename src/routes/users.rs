use crate::{
    auth::{identity, CurrentUser, LoginForm, RefreshRequest},
    error::AppError,
    models::{UserCreate, UserQuery, UserResponse, UserUpdate},
    services,
    state::AppState,
};
use actix_web::{get, patch, post, web, HttpResponse, Responder};
use validator::Validate;

/// List users
///
/// Public listing of registered users, paged by `limit` and `offset`.
#[get("/")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserQuery>,
) -> Result<impl Responder, AppError> {
    let users = services::users::list_users(state.store.as_ref(), query.into_inner()).await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Register a new user
///
/// ## Responses:
/// - `201 Created`: the new user, without its password hash.
/// - `409 Conflict`: the login is already in use.
/// - `422 Unprocessable Entity`: the payload failed validation.
#[post("/")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<UserCreate>,
) -> Result<impl Responder, AppError> {
    let user = services::users::register(
        state.store.as_ref(),
        &state.hasher,
        register_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Update the authenticated user's profile
///
/// Only the fields present in the body are changed.
#[patch("/")]
pub async fn update_me(
    state: web::Data<AppState>,
    CurrentUser(user): CurrentUser,
    update_data: web::Json<UserUpdate>,
) -> Result<impl Responder, AppError> {
    let user = services::users::update_profile(
        state.store.as_ref(),
        &state.hasher,
        user.id,
        update_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Login user
///
/// Takes `username` and `password` as form fields and returns an access and a
/// refresh token.
///
/// ## Responses:
/// - `200 OK`: `{access_token, refresh_token}`.
/// - `401 Unauthorized`: the password is wrong.
/// - `404 Not Found`: no user has that login.
#[post("/login/")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Form<LoginForm>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = services::users::authenticate(
        state.store.as_ref(),
        &state.hasher,
        &login_data.username,
        &login_data.password,
    )
    .await?;
    let tokens = state.tokens.issue_pair(&user.login)?;

    log::info!("User {} logged in", user.login);
    Ok(HttpResponse::Ok().json(tokens))
}

/// Refresh tokens
///
/// Exchanges a valid refresh token for a new token pair.
#[post("/refresh/")]
pub async fn refresh(
    state: web::Data<AppState>,
    refresh_data: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    refresh_data.validate()?;

    let user =
        identity::resolve_refresh(&state.tokens, state.store.as_ref(), &refresh_data.refresh_token)
            .await?;
    let tokens = state.tokens.issue_pair(&user.login)?;

    Ok(HttpResponse::Ok().json(tokens))
}

/// The authenticated user
#[get("/me/")]
pub async fn me(CurrentUser(user): CurrentUser) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// A user by id
#[get("/{id}/")]
pub async fn get_user(
    state: web::Data<AppState>,
    user_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = services::users::get_user(state.store.as_ref(), user_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
