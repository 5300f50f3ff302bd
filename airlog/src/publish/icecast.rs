//! Icecast metadata client
//!
//! Pushes the "artist | title" song string to the streaming server's admin
//! metadata endpoint, once per configured mountpoint, with Basic auth.

use airlog_common::config::IcecastConfig;
use async_trait::async_trait;
use tracing::info;

use super::{http_client, NowPlaying, PublishError, PublishTarget};

pub struct IcecastClient {
    http: reqwest::Client,
    admin_uri: String,
    username: String,
    password: String,
    mountpoints: Vec<String>,
}

impl IcecastClient {
    pub fn new(config: &IcecastConfig) -> Result<Self, PublishError> {
        let mut admin_uri = config.server_uri.clone();
        if !admin_uri.ends_with('/') {
            admin_uri.push('/');
        }
        admin_uri.push_str("admin/metadata");

        Ok(Self {
            http: http_client()?,
            admin_uri,
            username: config.username.clone(),
            password: config.password.clone(),
            mountpoints: config.mountpoints.clone(),
        })
    }

    /// Update the song string on every configured mountpoint
    pub async fn update(&self, now_playing: &NowPlaying) -> Result<(), PublishError> {
        let song = song_string(now_playing);

        for mount in &self.mountpoints {
            let response = self
                .http
                .get(&self.admin_uri)
                .query(&[
                    ("mode", "updinfo"),
                    ("mount", mount.as_str()),
                    ("song", song.as_str()),
                ])
                .basic_auth(&self.username, Some(&self.password))
                .send()
                .await
                .map_err(|e| PublishError::Network(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(PublishError::Api(status.as_u16(), body));
            }
        }

        info!(song = %song, mountpoints = self.mountpoints.len(), "Updated Icecast metadata");
        Ok(())
    }
}

#[async_trait]
impl PublishTarget for IcecastClient {
    fn name(&self) -> &'static str {
        "icecast"
    }

    async fn publish(&self, now_playing: &NowPlaying) -> Result<(), PublishError> {
        self.update(now_playing).await
    }
}

/// The display string Icecast shows to listeners
fn song_string(now_playing: &NowPlaying) -> String {
    format!("{} | {}", now_playing.artist, now_playing.title)
}
