//! Basic-auth gate for mutating endpoints
//!
//! One static username/password pair from configuration protects the two
//! write routes. Read routes never pass through this middleware. When no
//! credentials are configured the gate is disabled (logged at startup).

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::json;
use tracing::warn;

use crate::AppState;

/// Authentication middleware for the mutating routes
///
/// Returns 401 with a `WWW-Authenticate` challenge when credentials are
/// missing or wrong, before the handler (and therefore before any
/// persistence) runs.
pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // No configured credentials disables the gate entirely
    let Some(credentials) = &state.auth else {
        return Ok(next.run(request).await);
    };

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?;

    let (username, password) = decode_basic(header_value.to_str().unwrap_or(""))?;

    if username != credentials.username || password != credentials.password {
        warn!(username = %username, "Rejected write with invalid credentials");
        return Err(AuthError::InvalidCredentials);
    }

    Ok(next.run(request).await)
}

/// Decode an `Authorization: Basic <base64(user:pass)>` header value
fn decode_basic(header_value: &str) -> Result<(String, String), AuthError> {
    let encoded = header_value
        .strip_prefix("Basic ")
        .ok_or_else(|| AuthError::Malformed("Expected Basic authentication".to_string()))?;

    let decoded = BASE64
        .decode(encoded.trim())
        .map_err(|_| AuthError::Malformed("Invalid base64 in Authorization header".to_string()))?;

    let decoded = String::from_utf8(decoded)
        .map_err(|_| AuthError::Malformed("Authorization header is not UTF-8".to_string()))?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or_else(|| AuthError::Malformed("Missing ':' in credentials".to_string()))?;

    Ok((username.to_string(), password.to_string()))
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    MissingCredentials,
    InvalidCredentials,
    Malformed(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials => "Authentication required".to_string(),
            AuthError::InvalidCredentials => "Invalid username or password".to_string(),
            AuthError::Malformed(msg) => msg,
        };

        let body = Json(json!({
            "error": message,
        }));

        let mut response = (StatusCode::UNAUTHORIZED, body).into_response();
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("Basic realm=\"airlog\""),
        );
        response
    }
}
