//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the service.
//! Credential, identity and task operations fail with one of its variants; the
//! HTTP boundary turns each variant into a status code and a JSON body through
//! the `actix_web::error::ResponseError` implementation below.
//!
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors` and
//! `bcrypt::BcryptError` let the `?` operator do the conversion.

use actix_web::{
    error::ResponseError,
    http::{header, StatusCode},
    HttpResponse,
};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad credentials, an expired token or a missing bearer header (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// A token that is malformed or carries an invalid signature (HTTP 403).
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// Malformed request that passed deserialization (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Missing user or task, including a task owned by someone else (HTTP 404).
    #[error("Not Found: {0}")]
    NotFound(String),
    /// Duplicate login on registration (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    InternalServerError(String),
    /// Storage-layer failure (HTTP 500). The detail is logged, never returned.
    #[error("Database Error: {0}")]
    DatabaseError(String),
    /// Input validation failure (HTTP 422 Unprocessable Entity).
    #[error("Validation Error: {0}")]
    ValidationError(String),
    /// Missing or invalid configuration value, raised at startup.
    #[error("Configuration Error: {0}")]
    Config(String),
}

impl AppError {
    /// Message sent to the client. Internal failures are reduced to an opaque text.
    fn public_message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) | AppError::Config(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) | AppError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }

        let mut builder = HttpResponse::build(status);
        if matches!(self, AppError::Unauthorized(_) | AppError::Forbidden(_)) {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(json!({
            "error": self.public_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `NotFound` and a unique-constraint violation becomes
/// `Conflict`; everything else is an opaque `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Record already exists".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("Migration failed: {}", error))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
