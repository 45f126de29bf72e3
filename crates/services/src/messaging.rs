use async_trait::async_trait;
use hmac::{Hmac, Mac};
use lingoroom_captions::transport::UTTERANCE_EVENT;
use lingoroom_captions::{TranscriptPublisher, Utterance};
use lingoroom_config::MessagingSettings;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Subscription credential for a private channel.
#[derive(Debug, Serialize)]
pub struct ChannelAuth {
    pub auth: String,
}

/// Wraps the hosted channel-messaging service's REST publish API and
/// channel-auth signing.
pub struct MessagingService {
    client: reqwest::Client,
    settings: MessagingSettings,
}

impl MessagingService {
    pub fn new(settings: MessagingSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    fn events_path(&self) -> String {
        format!("/apps/{}/events", self.settings.app_id)
    }

    /// Builds the signed publish URL for `body` at `timestamp`.
    ///
    /// The signature is HMAC-SHA256 over `"POST\n{path}\n{query}"` with
    /// the query keys in lexicographic order and a SHA-256 body digest.
    pub fn signed_publish_url(&self, body: &str, timestamp: i64) -> String {
        let path = self.events_path();
        let body_digest = hex::encode(Sha256::digest(body.as_bytes()));
        let query = format!(
            "auth_key={}&auth_timestamp={}&auth_version=1.0&body_sha256={}",
            self.settings.key, timestamp, body_digest
        );
        let signature = self.sign(format!("POST\n{path}\n{query}").as_bytes());
        format!(
            "https://api-{}.{}{}?{}&auth_signature={}",
            self.settings.cluster, self.settings.host, path, query, signature
        )
    }

    fn sign(&self, payload: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(self.settings.secret.as_bytes())
            .expect("HMAC key can be any length");
        mac.update(payload);
        hex::encode(mac.finalize().into_bytes())
    }

    /// Publishes `data` as `event` on `channel`. The service expects the
    /// payload JSON-encoded as a string inside the envelope.
    pub async fn publish_event(
        &self,
        channel: &str,
        event: &str,
        data: &impl Serialize,
    ) -> anyhow::Result<()> {
        let payload = serde_json::to_string(data)?;
        let body = serde_json::json!({
            "name": event,
            "channel": channel,
            "data": payload,
        })
        .to_string();

        let url = self.signed_publish_url(&body, chrono::Utc::now().timestamp());
        self.client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .error_for_status()?;

        debug!(%channel, %event, "Published messaging event");
        Ok(())
    }

    /// Signs a private-channel subscription for a connected socket.
    pub fn channel_auth(&self, socket_id: &str, channel: &str) -> ChannelAuth {
        let signature = self.sign(format!("{socket_id}:{channel}").as_bytes());
        ChannelAuth {
            auth: format!("{}:{}", self.settings.key, signature),
        }
    }
}

#[async_trait]
impl TranscriptPublisher for MessagingService {
    async fn publish(&self, room: &str, utterance: &Utterance) -> anyhow::Result<()> {
        self.publish_event(room, UTTERANCE_EVENT, utterance).await
    }
}
