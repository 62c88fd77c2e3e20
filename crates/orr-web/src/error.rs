//! Mapping from every lower-layer error onto an HTTP response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use orr_auth::AuthError;
use orr_core::errors::ValidationErrors;
use orr_db::error::DatabaseError;
use serde::Serialize;
use thiserror::Error;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("not found")]
    NotFound,

    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("validation failed")]
    Validation(ValidationErrors),

    #[error("malformed request body: {0}")]
    Malformed(String),

    #[error("request body must be JSON")]
    UnsupportedMediaType,

    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: String,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a ValidationErrors>,
}

impl WebError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Malformed(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthenticated => "unauthenticated",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Validation(_) => "invalid",
            Self::Malformed(_) => "malformed",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match &self {
            Self::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let fields = match &self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        };
        let body = ErrorBody {
            error,
            code: self.code(),
            fields,
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for WebError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<DatabaseError> for WebError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NoResult => Self::NotFound,
            DatabaseError::Validation(errors) => Self::Validation(errors),
            DatabaseError::Conflict(message) => Self::Conflict(message),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for WebError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated => Self::Unauthenticated,
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::WeakPassword(message) => {
                Self::Validation(ValidationErrors::single("password", message))
            }
            other @ (AuthError::Hash(_) | AuthError::Random(_)) => {
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<tokio::task::JoinError> for WebError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(format!("blocking task failed: {err}"))
    }
}

pub type WebResult<T> = Result<T, WebError>;
