//! Errors shared across the airlog crates

use thiserror::Error;

/// Result alias used throughout airlog
pub type Result<T> = std::result::Result<T, Error>;

/// Failures that cross crate boundaries
///
/// Request handlers translate these into API responses; everything else
/// (startup, config loading) reports them directly.
#[derive(Error, Debug)]
pub enum Error {
    /// Store access failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A request parameter that could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
