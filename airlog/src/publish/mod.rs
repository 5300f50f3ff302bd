//! Deferred "now playing" publishing
//!
//! Each ingested song schedules exactly one publish, 30 seconds after
//! persistence, matching the on-air broadcast delay. The fan-out notifies
//! whichever targets are configured; each call is independent and a failure
//! is logged but never retried, never persisted, and never surfaced to a
//! client.

use airlog_common::config::AppConfig;
use airlog_common::time::BROADCAST_DELAY_SECS;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

mod icecast;
mod lastfm;
mod tunein;

pub use icecast::IcecastClient;
pub use lastfm::LastfmClient;
pub use tunein::TuneinClient;

/// Lag between persisting a record and publishing it
pub const BROADCAST_DELAY: Duration = Duration::from_secs(BROADCAST_DELAY_SECS as u64);

/// Shared User-Agent for outbound requests
const USER_AGENT: &str = concat!("airlog/", env!("CARGO_PKG_VERSION"));

/// Outbound request timeout
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Publish client errors
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Metadata payload carried by one deferred publish
#[derive(Debug, Clone)]
pub struct NowPlaying {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Unix seconds, UTC
    pub played_at: i64,
}

/// One external "now playing" destination
#[async_trait]
pub trait PublishTarget: Send + Sync {
    /// Target name for log lines and the startup banner
    fn name(&self) -> &'static str;

    /// Push one song's metadata to this destination
    async fn publish(&self, now_playing: &NowPlaying) -> Result<(), PublishError>;
}

/// The configured external publish targets
///
/// Built once at startup and shared read-only thereafter; any subset of the
/// targets may be configured.
pub struct Publishers {
    targets: Vec<Box<dyn PublishTarget>>,
}

impl Publishers {
    /// Build clients for every configured target
    pub fn from_config(config: &AppConfig) -> Result<Self, PublishError> {
        let mut targets: Vec<Box<dyn PublishTarget>> = Vec::new();
        if let Some(lastfm) = &config.lastfm {
            targets.push(Box::new(LastfmClient::new(lastfm)?));
        }
        if let Some(tunein) = &config.tunein {
            targets.push(Box::new(TuneinClient::new(tunein)?));
        }
        if let Some(icecast) = &config.icecast {
            targets.push(Box::new(IcecastClient::new(icecast)?));
        }
        Ok(Self { targets })
    }

    /// No targets at all (tests, or a station running log-only)
    pub fn disabled() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    #[cfg(test)]
    fn from_targets(targets: Vec<Box<dyn PublishTarget>>) -> Self {
        Self { targets }
    }

    /// Names of the configured targets, for the startup banner
    pub fn enabled_targets(&self) -> Vec<&'static str> {
        self.targets.iter().map(|t| t.name()).collect()
    }

    /// Schedule the one-shot deferred publish for a freshly logged song.
    ///
    /// Fire-and-forget: returns immediately, the task has no cancellation
    /// path, and once scheduled it always fires.
    pub fn schedule(self: &Arc<Self>, now_playing: NowPlaying) {
        if self.targets.is_empty() {
            debug!("No publish targets configured, skipping deferred publish");
            return;
        }

        let publishers = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(BROADCAST_DELAY).await;
            publishers.publish(&now_playing).await;
        });
    }

    /// Fan out to every configured target. Failure of one target does not
    /// block the others.
    pub async fn publish(&self, now_playing: &NowPlaying) {
        for target in &self.targets {
            if let Err(e) = target.publish(now_playing).await {
                warn!(target = target.name(), error = %e, "Publish failed");
            }
        }
    }
}

/// Build the shared outbound HTTP client
fn http_client() -> Result<reqwest::Client, PublishError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| PublishError::Network(e.to_string()))
}
