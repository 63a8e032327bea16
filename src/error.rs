use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::reply::ReplyError;

/// Every failure the chat API reports to its callers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// A required field is missing or empty.
    #[error("{0}")]
    Validation(String),

    /// The username is already registered.
    #[error("{0}")]
    Conflict(String),

    /// Bad credentials or an unknown session.
    #[error("{0}")]
    Auth(String),

    /// The operator-supplied reply could not be parsed.
    #[error("{0}")]
    MalformedInput(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Auth("Unauthorized".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::MalformedInput(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ReplyError> for ApiError {
    fn from(err: ReplyError) -> Self {
        ApiError::MalformedInput(err.to_string())
    }
}
