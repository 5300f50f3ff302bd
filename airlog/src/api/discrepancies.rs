//! Discrepancy (on-air incident) endpoints
//!
//! A discrepancy records a word trigger during a show and whether the delay
//! unit suppressed it before broadcast. The wire field names (`word`,
//! `bees_released`) are kept from the legacy logger for client
//! compatibility; storage uses a native boolean.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::api::ApiError;
use crate::db::discrepancies::{self, DiscrepancyRow, NewDiscrepancy};
use crate::AppState;

/// Incident submission (wire names preserved from the legacy logger)
#[derive(Debug, Deserialize)]
pub struct CreateDiscrepancyRequest {
    pub show_host: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// The trigger word spoken on air
    pub word: Option<String>,
    /// Whether the delay unit muted the broadcast
    pub bees_released: Option<bool>,
}

/// Serialized incident record
#[derive(Debug, Serialize)]
pub struct DiscrepancyView {
    pub timestamp: String,
    pub show_host: String,
    pub title: String,
    pub artist: String,
    pub word: String,
    pub bees_released: bool,
}

impl DiscrepancyView {
    fn from_row(row: &DiscrepancyRow, state: &AppState) -> Self {
        Self {
            timestamp: state.clock.format_local(row.occurred_at),
            show_host: row.show_host.clone(),
            title: row.title.clone(),
            artist: row.artist.clone(),
            word: row.trigger_word.clone(),
            bees_released: row.suppressed,
        }
    }
}

/// POST /api/v1.0/discrepancies
pub async fn create_discrepancy(
    State(state): State<AppState>,
    Json(body): Json<CreateDiscrepancyRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let show_host = require(body.show_host, "No show host provided")?;
    let title = require(body.title, "No song title provided")?;
    let artist = require(body.artist, "No artist name provided")?;
    let trigger_word = require(body.word, "No trigger word provided")?;
    let suppressed = body
        .bees_released
        .ok_or_else(|| ApiError::Validation("No bees_released flag provided".to_string()))?;

    let new_discrepancy = NewDiscrepancy {
        show_host,
        title,
        artist,
        trigger_word,
        suppressed,
        occurred_at: state.clock.now().timestamp(),
    };

    let row = discrepancies::insert_discrepancy(&state.db, &new_discrepancy).await?;
    info!(
        id = row.id,
        show_host = %row.show_host,
        suppressed = row.suppressed,
        "Logged discrepancy"
    );

    let view = DiscrepancyView::from_row(&row, &state);
    Ok((StatusCode::CREATED, Json(json!({ "discrepancy": view }))))
}

/// GET /api/v1.0/discrepancy/:id
pub async fn get_discrepancy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let row = discrepancies::get_discrepancy(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No discrepancy with id {}", id)))?;

    let view = DiscrepancyView::from_row(&row, &state);
    Ok(Json(json!({ "discrepancy": view })))
}

fn require(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(message.to_string())),
    }
}
