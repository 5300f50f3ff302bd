//! HTTP API handlers for airlog

pub mod auth;
pub mod charts;
pub mod discrepancies;
pub mod error;
pub mod health;
pub mod songs;

pub use auth::require_basic_auth;
pub use charts::get_charts;
pub use discrepancies::{create_discrepancy, get_discrepancy};
pub use error::ApiError;
pub use health::health_routes;
pub use songs::{create_song, get_song, list_songs};
