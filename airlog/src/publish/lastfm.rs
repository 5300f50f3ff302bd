//! Last.fm scrobbling client
//!
//! Speaks the audioscrobbler 2.0 protocol: a lazily-established mobile
//! session (authToken flow, credentials from static configuration), then
//! one `track.scrobble` call per published song. Every signed call carries
//! an MD5 api_sig over the sorted parameters plus the shared secret.

use airlog_common::config::LastfmConfig;
use async_trait::async_trait;
use md5::{Digest, Md5};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{http_client, NowPlaying, PublishError, PublishTarget};

pub struct LastfmClient {
    http: reqwest::Client,
    api_root: String,
    api_key: String,
    api_secret: String,
    username: String,
    /// md5(password), the only form the auth flow ever needs
    password_hash: String,
    /// Session key obtained on first scrobble and reused afterwards
    session_key: Mutex<Option<String>>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session: Session,
}

#[derive(Debug, Deserialize)]
struct Session {
    key: String,
}

impl LastfmClient {
    pub fn new(config: &LastfmConfig) -> Result<Self, PublishError> {
        Ok(Self {
            http: http_client()?,
            api_root: config.api_root.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            username: config.username.clone(),
            password_hash: md5_hex(&config.password),
            session_key: Mutex::new(None),
        })
    }

    /// Submit one play event
    pub async fn scrobble(&self, now_playing: &NowPlaying) -> Result<(), PublishError> {
        let session_key = self.session_key().await?;

        let mut params = vec![
            ("method".to_string(), "track.scrobble".to_string()),
            ("api_key".to_string(), self.api_key.clone()),
            ("sk".to_string(), session_key),
            ("artist".to_string(), now_playing.artist.clone()),
            ("track".to_string(), now_playing.title.clone()),
            ("timestamp".to_string(), now_playing.played_at.to_string()),
        ];
        if !now_playing.album.is_empty() {
            params.push(("album".to_string(), now_playing.album.clone()));
        }

        self.signed_call(params).await?;
        info!(artist = %now_playing.artist, track = %now_playing.title, "Scrobbled");
        Ok(())
    }

    /// Get the cached session key, establishing the session on first use
    async fn session_key(&self) -> Result<String, PublishError> {
        let mut cached = self.session_key.lock().await;
        if let Some(key) = cached.as_ref() {
            return Ok(key.clone());
        }

        debug!(username = %self.username, "Establishing scrobble session");

        let auth_token = md5_hex(&format!("{}{}", self.username, self.password_hash));
        let params = vec![
            ("method".to_string(), "auth.getMobileSession".to_string()),
            ("api_key".to_string(), self.api_key.clone()),
            ("username".to_string(), self.username.clone()),
            ("authToken".to_string(), auth_token),
        ];

        let body = self.signed_call(params).await?;
        let response: SessionResponse =
            serde_json::from_str(&body).map_err(|e| PublishError::Parse(e.to_string()))?;

        *cached = Some(response.session.key.clone());
        Ok(response.session.key)
    }

    /// POST a signed API call, returning the raw response body
    async fn signed_call(&self, mut params: Vec<(String, String)>) -> Result<String, PublishError> {
        let signature = api_signature(&params, &self.api_secret);
        params.push(("api_sig".to_string(), signature));
        // format is excluded from signing per protocol
        params.push(("format".to_string(), "json".to_string()));

        let response = self
            .http
            .post(&self.api_root)
            .form(&params)
            .send()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PublishError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(PublishError::Api(status.as_u16(), body));
        }

        Ok(body)
    }
}

#[async_trait]
impl PublishTarget for LastfmClient {
    fn name(&self) -> &'static str {
        "lastfm"
    }

    async fn publish(&self, now_playing: &NowPlaying) -> Result<(), PublishError> {
        self.scrobble(now_playing).await
    }
}

/// MD5 api_sig: parameters sorted by name, concatenated as name+value,
/// secret appended, hashed
fn api_signature(params: &[(String, String)], secret: &str) -> String {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut material = String::new();
    for (name, value) in sorted {
        material.push_str(name);
        material.push_str(value);
    }
    material.push_str(secret);

    md5_hex(&material)
}

fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}
