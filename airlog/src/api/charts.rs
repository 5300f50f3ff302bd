//! Charts endpoint placeholder
//!
//! Play-count charts never shipped upstream; the route is reserved so
//! clients probing it get a defined answer instead of a 404.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// GET /api/v1.0/charts
pub async fn get_charts() -> impl IntoResponse {
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(json!({
            "error": "Charts are not implemented",
        })),
    )
}
