//! airlog library - radio play log service
//!
//! Logs songs played on the broadcast, serves them over a small REST API,
//! and relays "now playing" metadata to external services after the
//! 30-second broadcast delay.

use airlog_common::config::AuthConfig;
use airlog_common::time::BroadcastClock;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::publish::Publishers;

pub mod api;
pub mod db;
pub mod publish;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Clock bound to the broadcast-local timezone
    pub clock: BroadcastClock,
    /// Also truncate the display artist at " feat. "
    pub strip_featured: bool,
    /// Basic-auth credentials for mutating endpoints (None disables auth)
    pub auth: Option<AuthConfig>,
    /// External publish targets, built once at startup
    pub publishers: Arc<Publishers>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        clock: BroadcastClock,
        strip_featured: bool,
        auth: Option<AuthConfig>,
        publishers: Arc<Publishers>,
    ) -> Self {
        Self {
            db,
            clock,
            strip_featured,
            auth,
            publishers,
        }
    }
}

/// Build application router
///
/// Mutating endpoints sit behind the Basic-auth gate; reads are public and
/// CORS-open so station widgets can embed the log.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};
    use tower_http::cors::CorsLayer;

    // Protected routes (require authentication)
    let protected = Router::new()
        .route("/api/v1.0/songs", post(api::create_song))
        .route("/api/v1.0/discrepancies", post(api::create_discrepancy))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_basic_auth,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route("/api/v1.0/songs", get(api::list_songs))
        .route("/api/v1.0/song/:id", get(api::get_song))
        .route("/api/v1.0/discrepancy/:id", get(api::get_discrepancy))
        .route("/api/v1.0/charts", get(api::get_charts))
        .merge(api::health_routes());

    // Combine routers, allow cross-origin reads
    Router::new()
        .merge(protected)
        .merge(public)
        .with_state(state)
        .layer(CorsLayer::permissive())
}
