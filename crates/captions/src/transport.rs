use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::pipeline::CaptionFeed;
use crate::Utterance;

/// Event name carrying finalized utterances on a room channel.
pub const UTTERANCE_EVENT: &str = "utterance";

/// Connection parameters for the hosted messaging service.
#[derive(Debug, Clone)]
pub struct MessagingConnection {
    pub key: String,
    pub cluster: String,
    pub host: String,
}

impl MessagingConnection {
    pub fn websocket_url(&self) -> String {
        format!(
            "wss://ws-{}.{}/app/{}?protocol=7&client=lingoroom&version={}",
            self.cluster,
            self.host,
            self.key,
            env!("CARGO_PKG_VERSION"),
        )
    }
}

/// Messaging frame envelope. The service JSON-encodes event payloads as a
/// string inside `data`.
#[derive(Debug, Deserialize)]
struct Envelope {
    event: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    data: Option<String>,
}

/// Subscribes to a room's channel on the messaging service and pushes
/// finalized utterances into a caption queue.
pub struct MessagingSubscriber {
    connection: MessagingConnection,
}

impl MessagingSubscriber {
    pub fn new(connection: MessagingConnection) -> Self {
        Self { connection }
    }

    /// Runs until the socket closes. Delivery is FIFO per publisher; no
    /// total order across simultaneous speakers is assumed beyond arrival
    /// order at this client.
    pub async fn run(&self, room: &str, feed: CaptionFeed) -> anyhow::Result<()> {
        let url = self.connection.websocket_url();
        let (mut socket, _) = connect_async(url.as_str()).await?;
        info!(%room, "Messaging socket connected");

        let subscribe = serde_json::json!({
            "event": "subscribe",
            "data": { "channel": room }
        });
        socket.send(Message::text(subscribe.to_string())).await?;

        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if let Some(utterance) = decode_utterance(text.as_str(), room) {
                        feed.push(utterance);
                    }
                }
                Ok(Message::Ping(payload)) => {
                    socket.send(Message::Pong(payload)).await?;
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Messaging socket error");
                    break;
                }
            }
        }

        debug!(%room, "Messaging socket closed");
        Ok(())
    }
}

fn decode_utterance(frame: &str, room: &str) -> Option<Utterance> {
    let envelope: Envelope = match serde_json::from_str(frame) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "Unparseable messaging frame, skipping");
            return None;
        }
    };
    if envelope.event != UTTERANCE_EVENT {
        return None;
    }
    if envelope.channel.as_deref().is_some_and(|c| c != room) {
        return None;
    }
    let data = envelope.data?;
    match serde_json::from_str::<Utterance>(&data) {
        Ok(utterance) if utterance.is_final => Some(utterance),
        Ok(_) => None, // interim utterances are transient
        Err(e) => {
            warn!(error = %e, "Malformed utterance payload, skipping");
            None
        }
    }
}
