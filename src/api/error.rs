use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ErrorResponse;
use crate::db::{Constraint, violated_constraint};
use crate::services::{AuthError, UserAdminError};

/// HTTP-facing error. Every variant renders `{"error": "<code>"}` with a
/// stable machine-readable code.
#[derive(Debug)]
pub enum ApiError {
    NotFound,

    DatabaseError(String),

    ValidationError(String),

    Conflict(String),

    Unauthorized(String),

    Forbidden(String),

    InternalError { code: &'static str, message: String },
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Not found"),
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(code) => write!(f, "Validation error: {code}"),
            Self::Conflict(code) => write!(f, "Conflict: {code}"),
            Self::Unauthorized(code) => write!(f, "Unauthorized: {code}"),
            Self::Forbidden(code) => write!(f, "Forbidden: {code}"),
            Self::InternalError { code, message } => write!(f, "{code}: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match self {
            Self::NotFound => (StatusCode::NOT_FOUND, "not_found".to_string()),
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "db_error".to_string())
            }
            Self::ValidationError(code) => (StatusCode::BAD_REQUEST, code),
            Self::Conflict(code) => (StatusCode::CONFLICT, code),
            Self::Unauthorized(code) => (StatusCode::UNAUTHORIZED, code),
            Self::Forbidden(code) => (StatusCode::FORBIDDEN, code),
            Self::InternalError { code, message } => {
                tracing::error!(code, "Internal error: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, code.to_string())
            }
        };

        let body = ErrorResponse { error: code };
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match violated_constraint(&err) {
            Some(Constraint::ForeignKey) => Self::Conflict("in_use".to_string()),
            Some(Constraint::Unique) => Self::Conflict("conflict".to_string()),
            None => Self::DatabaseError(format!("{err:#}")),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(reason) => Self::validation(reason.code()),
            AuthError::MissingCredentials => Self::validation("username_and_password_required"),
            AuthError::UsernameTaken => Self::Conflict("username_taken".to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized("invalid_credentials".to_string()),
            AuthError::MissingOrMalformedAuthorization(problem) => {
                Self::Unauthorized(problem.code().to_string())
            }
            AuthError::InvalidToken => Self::Unauthorized("invalid_token".to_string()),
            AuthError::PendingApproval => Self::Forbidden("account_pending_approval".to_string()),
            AuthError::Forbidden => Self::Forbidden("forbidden".to_string()),
            AuthError::Store(msg) => Self::DatabaseError(msg),
            AuthError::HashingFailure(message) => Self::InternalError {
                code: "password_hash_failed",
                message,
            },
            AuthError::SigningFailure(message) => Self::InternalError {
                code: "token_issue_failed",
                message,
            },
        }
    }
}

impl From<UserAdminError> for ApiError {
    fn from(err: UserAdminError) -> Self {
        match err {
            UserAdminError::NotFound => Self::NotFound,
            UserAdminError::CannotDisableAdmin => Self::validation("cannot_disable_admin"),
            UserAdminError::CannotDeleteAdmin => Self::validation("cannot_delete_admin"),
            UserAdminError::CannotDeleteSelf => Self::validation("cannot_delete_self"),
            UserAdminError::Store(msg) => Self::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(code: impl Into<String>) -> Self {
        Self::ValidationError(code.into())
    }

    /// Maps a failed write whose foreign key points at a missing row.
    /// Other failures fall back to the default conversion.
    pub fn missing_reference(err: anyhow::Error, code: &str) -> Self {
        if violated_constraint(&err) == Some(Constraint::ForeignKey) {
            Self::validation(code)
        } else {
            err.into()
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::NotFound => "not_found",
            Self::DatabaseError(_) => "db_error",
            Self::ValidationError(code)
            | Self::Conflict(code)
            | Self::Unauthorized(code)
            | Self::Forbidden(code) => code.as_str(),
            Self::InternalError { code, .. } => code,
        }
    }
}
