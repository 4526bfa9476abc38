//! Application error handling
//!
//! `AccountError` is the outcome taxonomy of the account store. `ApiError`
//! converts those outcomes into HTTP responses without leaking internal
//! error text.

use crate::repositories::RepositoryError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use movie_accounts_shared::AuthResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

/// Errors produced by the account store and its collaborators
#[derive(Error, Debug)]
pub enum AccountError {
    /// Missing or incorrect input, including wrong credentials and unknown emails
    #[error("{0}")]
    Validation(String),

    #[error("user already exists")]
    DuplicateAccount,

    #[error("user not found")]
    NotFound,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("storage failure")]
    Storage(#[from] RepositoryError),
}

impl AccountError {
    /// Whether this outcome is an expected, caller-recoverable result
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            AccountError::Validation(_)
                | AccountError::DuplicateAccount
                | AccountError::NotFound
                | AccountError::InvalidArgument(_)
        )
    }
}

/// API error type that can be converted to HTTP responses
#[derive(Error, Debug)]
pub enum ApiError {
    /// Registration or authentication refused; answered with an auth payload
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Classify a store outcome, attaching `context` to unexpected failures
    pub fn from_account(err: AccountError, context: &'static str) -> Self {
        if err.is_expected() {
            debug!(error = %err, context, "Request refused");
        }
        match err {
            AccountError::Validation(msg) => ApiError::AuthFailed(msg),
            err @ AccountError::DuplicateAccount => ApiError::AuthFailed(err.to_string()),
            AccountError::NotFound => ApiError::NotFound("User not found".to_string()),
            AccountError::InvalidArgument(msg) => ApiError::BadRequest(msg),
            err => ApiError::Internal(anyhow::Error::new(err).context(context)),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::AuthFailed(msg) => {
                return (StatusCode::UNAUTHORIZED, Json(AuthResponse::failure(msg))).into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Internal(err) => {
                error!("Internal error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
