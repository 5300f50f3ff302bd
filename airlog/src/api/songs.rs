//! Song log endpoints
//!
//! `POST /api/v1.0/songs` ingests a played-song submission, persists it,
//! and schedules the deferred publish. `GET /api/v1.0/songs` serves the
//! filtered log with delay- and timezone-aware windowing.

use airlog_common::normalize::{strip_tags, truncate_artist};
use airlog_common::time::BROADCAST_DELAY_SECS;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::api::ApiError;
use crate::db::songs::{self, NewSong, SongFilter, SongRow};
use crate::publish::NowPlaying;
use crate::AppState;

/// Default number of rows returned by a log query
const DEFAULT_LIMIT: i64 = 500;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the song log (all optional)
#[derive(Debug, Deserialize)]
pub struct SongQuery {
    /// Maximum number of results
    #[serde(default = "default_limit")]
    pub n: i64,

    /// Cursor: only records with id greater than this are returned
    pub id: Option<i64>,

    /// Single-day mode: calendar date (YYYY-MM-DD, broadcast-local)
    pub date: Option<String>,

    /// Range mode: window start (ISO 8601, any offset)
    pub start: Option<String>,

    /// Range mode: window end (ISO 8601, any offset)
    pub end: Option<String>,

    /// Hide records newer than the 30-second broadcast delay
    #[serde(default)]
    pub delay: bool,

    /// Reverse ordering (descending id)
    #[serde(default)]
    pub desc: bool,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Played-song submission
#[derive(Debug, Deserialize)]
pub struct CreateSongRequest {
    /// Section of the music library the song came from (required)
    pub location: Option<String>,
    /// External media identifier (CD/LP alpha tag or playout asset id)
    pub asset_id: Option<String>,
    /// Song title (required)
    pub title: Option<String>,
    /// Song artist (required)
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
}

/// Serialized song record as exposed by the API
#[derive(Debug, Serialize)]
pub struct SongView {
    /// Play time, ISO 8601 in the broadcast-local timezone
    pub timestamp: String,
    pub location: String,
    pub asset_id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    /// Canonical path of the single-record read for this song
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub struct SongsResponse {
    pub songs: Vec<SongView>,
}

impl SongView {
    fn from_row(row: &SongRow, state: &AppState) -> Self {
        Self {
            timestamp: state.clock.format_local(row.played_at),
            location: row.location.clone(),
            asset_id: row.asset_id.clone(),
            title: row.title.clone(),
            artist: row.artist.clone(),
            album: row.album.clone(),
            genre: row.genre.clone(),
            uri: format!("/api/v1.0/song/{}", row.id),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1.0/songs
///
/// Filters are conjunctive: id cursor AND time window AND delay cutoff.
/// `date` takes precedence over `start`/`end`; with neither present the
/// whole log is eligible.
pub async fn list_songs(
    State(state): State<AppState>,
    Query(query): Query<SongQuery>,
) -> Result<Json<SongsResponse>, ApiError> {
    let window = resolve_window(&state, &query)?;

    // Records logged less than 30 seconds ago have not aired yet
    let played_before = if query.delay {
        Some(state.clock.now().timestamp() - BROADCAST_DELAY_SECS)
    } else {
        None
    };

    let filter = SongFilter {
        after_id: query.id,
        window,
        played_before,
        descending: query.desc,
        limit: query.n.max(0),
    };

    let rows = songs::list_songs(&state.db, &filter).await?;

    Ok(Json(SongsResponse {
        songs: rows.iter().map(|r| SongView::from_row(r, &state)).collect(),
    }))
}

/// Resolve the requested time window to UTC epoch bounds
fn resolve_window(state: &AppState, query: &SongQuery) -> Result<Option<(i64, i64)>, ApiError> {
    // Single-day mode wins when both styles are given
    if let Some(date) = &query.date {
        let date = state.clock.parse_date(date)?;
        return Ok(Some(state.clock.day_window(date)));
    }

    if query.start.is_none() && query.end.is_none() {
        return Ok(None);
    }

    // Range mode: a missing side of a half-given range defaults to today's
    // local midnight / 23:59:59
    let today = state.clock.today();
    let start = match &query.start {
        Some(s) => state.clock.parse_timestamp(s)?.timestamp(),
        None => state.clock.day_start(today),
    };
    let end = match &query.end {
        Some(s) => state.clock.parse_timestamp(s)?.timestamp(),
        None => state.clock.day_end(today),
    };

    Ok(Some((start, end)))
}

/// POST /api/v1.0/songs
///
/// Validates and normalizes the submission, persists it, and schedules the
/// deferred publish. Responds 202 since the publish has not yet occurred.
pub async fn create_song(
    State(state): State<AppState>,
    Json(body): Json<CreateSongRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let location = require(body.location, "No record location provided")?;
    let title = require(body.title, "No song title provided")?;
    let artist = require(body.artist, "No artist name provided")?;

    // Free-text fields get scrubbed of markup before persistence
    let title = strip_tags(&title);
    let artist = strip_tags(&artist);
    let album = strip_tags(body.album.as_deref().unwrap_or(""));
    let genre = strip_tags(body.genre.as_deref().unwrap_or(""));

    let new_song = NewSong {
        asset_id: body.asset_id.unwrap_or_default(),
        truncated_artist: truncate_artist(&artist, state.strip_featured),
        title,
        artist,
        album,
        genre,
        location,
        played_at: state.clock.now().timestamp(),
    };

    let row = songs::insert_song(&state.db, &new_song).await?;
    info!(id = row.id, title = %row.title, artist = %row.artist, "Logged song");

    // Fire-and-forget: the response does not wait for the publish and its
    // outcome is never reported back to the caller
    state.publishers.schedule(NowPlaying {
        title: row.title.clone(),
        artist: row.artist.clone(),
        album: row.album.clone(),
        played_at: row.played_at,
    });

    let view = SongView::from_row(&row, &state);
    Ok((StatusCode::ACCEPTED, Json(json!({ "song": view }))))
}

/// GET /api/v1.0/song/:id
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let row = songs::get_song(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No song with id {}", id)))?;

    let view = SongView::from_row(&row, &state);
    Ok(Json(json!({ "song": view })))
}

/// Reject a missing or empty required field with its field-specific message
fn require(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::Validation(message.to_string())),
    }
}
