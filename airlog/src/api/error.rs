//! API error responses
//!
//! Every error surfaces as a JSON `{"error": ...}` body with the matching
//! status code. Validation failures carry the field-specific message so DJ
//! tooling can show it verbatim.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API errors shared by the song and discrepancy handlers
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid required field; rejected before any persistence
    Validation(String),
    /// Unknown id on a single-record read
    NotFound(String),
    /// Store failure during the request
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Database(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Database error: {}", msg))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<airlog_common::Error> for ApiError {
    fn from(err: airlog_common::Error) -> Self {
        match err {
            airlog_common::Error::InvalidInput(msg) => ApiError::Validation(msg),
            other => ApiError::Database(other.to_string()),
        }
    }
}
