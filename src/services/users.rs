//! Credential operations: registration, password authentication and profile
//! updates. Raw passwords never reach the store; they are hashed here first.

use chrono::Utc;
use validator::Validate;

use crate::auth::PasswordHasher;
use crate::error::AppError;
use crate::models::{NewUser, User, UserChanges, UserCreate, UserQuery, UserUpdate};
use crate::store::UserStore;

/// Creates a user. Fails with `Conflict` if the login is taken (exact match).
pub async fn register<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    input: UserCreate,
) -> Result<User, AppError> {
    input.validate()?;

    let user = store
        .insert_user(NewUser {
            password_hash: hasher.hash(&input.password)?,
            login: input.login,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            registered_at: Utc::now(),
        })
        .await?;

    log::info!("Registered user {} (id {})", user.login, user.id);
    Ok(user)
}

/// Checks a login/password pair.
///
/// An unknown login is `NotFound`; a wrong password is `Unauthorized`.
pub async fn authenticate<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    login: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = store
        .find_user_by_login(login)
        .await?
        .ok_or_else(|| AppError::NotFound("User does not exist".into()))?;

    if !hasher.verify(password, &user.password)? {
        log::warn!("Failed login attempt for {}", login);
        return Err(AppError::Unauthorized("Password is incorrect".into()));
    }

    Ok(user)
}

/// Applies a partial profile update. A new password is re-hashed before storing.
pub async fn update_profile<S: UserStore + ?Sized>(
    store: &S,
    hasher: &PasswordHasher,
    user_id: i32,
    input: UserUpdate,
) -> Result<User, AppError> {
    input.validate()?;

    let changes = UserChanges {
        password_hash: input
            .password
            .as_deref()
            .map(|password| hasher.hash(password))
            .transpose()?,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
    };

    let user = store
        .update_user(user_id, changes)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    log::info!("Updated profile of user {}", user.id);
    Ok(user)
}

pub async fn list_users<S: UserStore + ?Sized>(store: &S, query: UserQuery) -> Result<Vec<User>, AppError> {
    query.validate()?;
    store.list_users(query.limit(), query.offset()).await
}

pub async fn get_user<S: UserStore + ?Sized>(store: &S, user_id: i32) -> Result<User, AppError> {
    log::debug!("Looking up user {}", user_id);
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}
