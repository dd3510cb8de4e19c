//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the application.
//! Services return it directly, and the HTTP layer turns it into a status code and
//! a JSON body of the form `{"error": "..."}` through `actix_web::error::ResponseError`.
//!
//! `From` implementations exist for `sqlx::Error`, `validator::ValidationErrors` and
//! `bcrypt::BcryptError` so the `?` operator works across layers.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A user with this username already exists (HTTP 400).
    #[error("Username '{0}' already exists")]
    DuplicateUsername(String),
    /// Unknown username or wrong password. Deliberately the same error for both (HTTP 401).
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// A `status` query value that names no task status (HTTP 400).
    #[error("Invalid status filter: {0}")]
    InvalidStatusFilter(String),
    /// The requested entity does not exist (HTTP 404).
    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },
    /// A request field failed boundary validation (HTTP 400).
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },
    /// The request could not be decoded at all (HTTP 400).
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// Token signature, structure or claims are wrong (HTTP 401).
    #[error("Invalid token")]
    TokenInvalid,
    /// Token was valid but its expiry has passed (HTTP 401).
    #[error("Token expired")]
    TokenExpired,
    /// Errors originating from the storage layer (HTTP 500).
    #[error("Database Error: {0}")]
    Database(String),
    /// Any other unexpected server-side failure (HTTP 500).
    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn task_not_found(id: impl ToString) -> Self {
        AppError::NotFound {
            entity: "Task",
            id: id.to_string(),
        }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Server-side failures are logged here and reported to the client without detail.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateUsername(_)
            | AppError::InvalidStatusFilter(_)
            | AppError::Validation { .. }
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::TokenInvalid | AppError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::Database(error.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::Database(format!("migration failed: {}", error))
    }
}

/// Reports the first failing field, in alphabetical order so the result is stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, field_errors)) => {
                let reason = field_errors
                    .first()
                    .map(|e| match &e.message {
                        Some(message) => message.to_string(),
                        None => e.code.to_string(),
                    })
                    .unwrap_or_else(|| "invalid value".to_string());
                AppError::validation(*field, reason)
            }
            None => AppError::BadRequest(errors.to_string()),
        }
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}
