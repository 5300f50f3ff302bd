//! Configuration loading and resolution
//!
//! The service reads one TOML file resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `AIRLOG_CONFIG` environment variable
//! 3. Platform config directory (`~/.config/airlog/config.toml` on Linux)
//! 4. Built-in defaults (fallback, logged as a warning)
//!
//! A missing config file is not fatal: the service starts with defaults and
//! every publish target disabled.

use crate::{Error, Result};
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default broadcast timezone when none is configured
pub const DEFAULT_TIMEZONE: &str = "America/Detroit";

/// Top-level service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// SQLite database file path
    #[serde(default = "default_database")]
    pub database: PathBuf,

    /// IANA timezone name of the broadcast (station-local time)
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Also truncate the display artist at the first " feat. " separator
    #[serde(default)]
    pub strip_featured: bool,

    /// Static Basic-auth credentials for mutating endpoints.
    /// Absent section disables authentication (logged at startup).
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    /// Scrobbling target (Last.fm style listening-history service)
    #[serde(default)]
    pub lastfm: Option<LastfmConfig>,

    /// Station-directory target (TuneIn style "now playing" feed)
    #[serde(default)]
    pub tunein: Option<TuneinConfig>,

    /// Streaming-server metadata target (Icecast admin endpoint)
    #[serde(default)]
    pub icecast: Option<IcecastConfig>,
}

/// Static credential pair for the write-endpoint auth gate
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub username: String,
    pub password: String,
}

/// Last.fm scrobbling credentials
#[derive(Debug, Clone, Deserialize)]
pub struct LastfmConfig {
    pub api_key: String,
    pub api_secret: String,
    pub username: String,
    pub password: String,
    /// API root, overridable for testing
    #[serde(default = "default_lastfm_root")]
    pub api_root: String,
}

/// TuneIn directory credentials
#[derive(Debug, Clone, Deserialize)]
pub struct TuneinConfig {
    pub partner_id: String,
    pub partner_key: String,
    pub station_id: String,
    /// Playing.ashx endpoint, overridable for testing
    #[serde(default = "default_tunein_uri")]
    pub api_uri: String,
}

/// Icecast admin credentials
#[derive(Debug, Clone, Deserialize)]
pub struct IcecastConfig {
    /// Server root, e.g. "http://stream.example.org:8000/"
    pub server_uri: String,
    pub username: String,
    pub password: String,
    /// Mountpoints to update, e.g. ["/live", "/live-hq"]
    pub mountpoints: Vec<String>,
}

fn default_bind_addr() -> String {
    "127.0.0.1:5728".to_string()
}

fn default_database() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("airlog").join("airlog.db"))
        .unwrap_or_else(|| PathBuf::from("./airlog.db"))
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

fn default_lastfm_root() -> String {
    "https://ws.audioscrobbler.com/2.0/".to_string()
}

fn default_tunein_uri() -> String {
    "https://air.radiotime.com/Playing.ashx".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database: default_database(),
            timezone: default_timezone(),
            strip_featured: false,
            auth: None,
            lastfm: None,
            tunein: None,
            icecast: None,
        }
    }
}

impl AppConfig {
    /// Load configuration following the 4-tier resolution order
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        // Priority 1: Command-line argument
        if let Some(path) = cli_path {
            return Self::from_file(path);
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var("AIRLOG_CONFIG") {
            return Self::from_file(Path::new(&path));
        }

        // Priority 3: Platform config directory
        if let Some(path) = Self::platform_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        // Priority 4: Built-in defaults
        warn!("No config file found, starting with defaults (publishing disabled)");
        Ok(Self::default())
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Cannot parse {}: {}", path.display(), e)))
    }

    /// Default config file location for the platform
    pub fn platform_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("airlog").join("config.toml"))
    }

    /// Parse the configured broadcast timezone name
    pub fn broadcast_tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| Error::Config(format!("Unknown timezone: {}", self.timezone)))
    }
}
