//! # Airlog Common Library
//!
//! Shared code for the airlog play-logging service:
//! - Error types
//! - Configuration loading
//! - Broadcast-timezone clock utilities
//! - Title/artist normalization helpers

pub mod config;
pub mod error;
pub mod normalize;
pub mod time;

pub use error::{Error, Result};
