/*
 * Responsibility
 * - Shared AppError for handlers and middleware
 * - IntoResponse (HTTP status / JSON error body)
 * - Authentication failures -> 401, authorization failures -> 403 (access_denied)
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::middleware::auth::access_denied;
use crate::services::auth::{AuthError, CodecError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::Auth(AuthError::Token(e)) => (StatusCode::UNAUTHORIZED, e.code()),
            AppError::Auth(AuthError::UserNotFound(_)) => {
                (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND")
            }
            AppError::Auth(AuthError::Directory(_)) => {
                return internal_error();
            }
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::Forbidden => return access_denied::respond(),
            AppError::Internal => return internal_error(),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// Backend details stay in the logs.
fn internal_error() -> Response {
    let body = ErrorResponse {
        error: ErrorBody {
            code: "INTERNAL",
            message: AppError::Internal.to_string(),
        },
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<CodecError> for AppError {
    fn from(e: CodecError) -> Self {
        error!(error = %e, "token codec failure");
        AppError::Internal
    }
}
