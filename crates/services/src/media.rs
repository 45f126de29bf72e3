use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use lingoroom_config::MediaSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Token issuance failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Media service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Media service error {status}: {body}")]
    Endpoint { status: u16, body: String },
}

/// Claims carried by a media room access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct MediaTokenClaims {
    /// Media API key.
    pub iss: String,
    /// Participant identity.
    pub sub: String,
    pub room: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

/// Credentials a participant needs to connect to the media room.
#[derive(Debug, Clone, Serialize)]
pub struct AccessGrant {
    pub identity: String,
    pub access_token: String,
    pub expires_in: u64,
}

/// Wraps the hosted video/media service: access-token minting and the
/// room REST API.
pub struct MediaService {
    client: reqwest::Client,
    settings: MediaSettings,
    encoding_key: EncodingKey,
}

impl MediaService {
    pub fn new(settings: MediaSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.api_secret.as_bytes());
        Self {
            client: reqwest::Client::new(),
            settings,
            encoding_key,
        }
    }

    /// Issues a short-lived room access token (5-minute TTL by default).
    pub fn create_token(&self, identity: &str, room: &str) -> Result<AccessGrant, MediaError> {
        let now = Utc::now();
        let ttl = self.settings.token_ttl_secs;
        let claims = MediaTokenClaims {
            iss: self.settings.api_key.clone(),
            sub: identity.to_string(),
            room: room.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl as i64)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(AccessGrant {
            identity: identity.to_string(),
            access_token: token,
            expires_in: ttl,
        })
    }

    /// Creates the room on the media service. An already-existing room is
    /// success: rooms are keyed by name and shared by joiners.
    pub async fn ensure_room(&self, name: &str) -> Result<(), MediaError> {
        let url = format!("{}/v1/rooms", self.settings.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.settings.api_key, Some(&self.settings.api_secret))
            .json(&serde_json::json!({ "unique_name": name }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(%name, "Media room created");
            return Ok(());
        }
        if status.as_u16() == 409 {
            debug!(%name, "Media room already exists");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MediaError::Endpoint {
            status: status.as_u16(),
            body,
        })
    }
}
