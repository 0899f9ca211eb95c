//! Custom error types for the forum service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::validation::ValidationError;

/// Custom error type for the forum service
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The write collides with an existing record
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(validation) = err.downcast_ref::<ValidationError>() {
            return ApiError::Validation(validation.clone());
        }

        if let Some(db_error) = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
        {
            if db_error.is_unique_violation() {
                return ApiError::Conflict("A record with these values already exists".to_string());
            }
            if db_error.is_foreign_key_violation() {
                return ApiError::BadRequest("Referenced record does not exist".to_string());
            }
        }

        error!("Request failed: {:#}", err);
        ApiError::InternalServerError
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
