//! TuneIn directory client
//!
//! One GET against the Playing.ashx endpoint per published song, carrying
//! the station's partner credentials as query parameters.

use airlog_common::config::TuneinConfig;
use async_trait::async_trait;
use tracing::info;

use super::{http_client, NowPlaying, PublishError, PublishTarget};

pub struct TuneinClient {
    http: reqwest::Client,
    api_uri: String,
    partner_id: String,
    partner_key: String,
    station_id: String,
}

impl TuneinClient {
    pub fn new(config: &TuneinConfig) -> Result<Self, PublishError> {
        Ok(Self {
            http: http_client()?,
            api_uri: config.api_uri.clone(),
            partner_id: config.partner_id.clone(),
            partner_key: config.partner_key.clone(),
            station_id: config.station_id.clone(),
        })
    }

    /// Update the station's "now playing" metadata
    pub async fn notify(&self, now_playing: &NowPlaying) -> Result<(), PublishError> {
        let params = self.notify_params(now_playing);

        let response = self
            .http
            .get(&self.api_uri)
            .query(&params)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PublishError::Api(status.as_u16(), body));
        }

        info!(artist = %now_playing.artist, title = %now_playing.title, "Updated TuneIn");
        Ok(())
    }

    /// Query parameters for one update; album only when non-empty
    fn notify_params(&self, now_playing: &NowPlaying) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("partnerId", self.partner_id.clone()),
            ("partnerKey", self.partner_key.clone()),
            ("id", self.station_id.clone()),
            ("title", now_playing.title.clone()),
            ("artist", now_playing.artist.clone()),
        ];
        if !now_playing.album.is_empty() {
            params.push(("album", now_playing.album.clone()));
        }
        params
    }
}

#[async_trait]
impl PublishTarget for TuneinClient {
    fn name(&self) -> &'static str {
        "tunein"
    }

    async fn publish(&self, now_playing: &NowPlaying) -> Result<(), PublishError> {
        self.notify(now_playing).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TuneinClient {
        TuneinClient::new(&TuneinConfig {
            partner_id: "p1".to_string(),
            partner_key: "k1".to_string(),
            station_id: "s12345".to_string(),
            api_uri: "https://air.radiotime.com/Playing.ashx".to_string(),
        })
        .unwrap()
    }

    fn now_playing(album: &str) -> NowPlaying {
        NowPlaying {
            title: "Test Song".to_string(),
            artist: "The Testers".to_string(),
            album: album.to_string(),
            played_at: 1_700_000_000,
        }
    }

    #[test]
    fn test_album_omitted_when_empty() {
        let params = client().notify_params(&now_playing(""));
        assert!(params.iter().all(|(name, _)| *name != "album"));
    }

    #[test]
    fn test_album_included_when_present() {
        let params = client().notify_params(&now_playing("Test Album"));
        assert!(params.contains(&("album", "Test Album".to_string())));
    }

    #[test]
    fn test_station_credentials_present() {
        let params = client().notify_params(&now_playing(""));
        assert!(params.contains(&("partnerId", "p1".to_string())));
        assert!(params.contains(&("partnerKey", "k1".to_string())));
        assert!(params.contains(&("id", "s12345".to_string())));
    }
}
