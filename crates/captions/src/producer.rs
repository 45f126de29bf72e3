use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::Utterance;

/// Events surfaced by a live recognition session.
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    /// Updated partial hypothesis for the in-progress utterance.
    Interim(String),
    /// Committed utterance text; closes the current hypothesis. An empty
    /// finalization commits the accumulated interim text instead.
    Final(String),
    /// The capture session ended on its own (mic lost, engine stopped).
    Ended,
}

/// A live capture session handed out by a [`SpeechRecognizer`].
pub struct RecognitionSession {
    events: mpsc::Receiver<RecognitionEvent>,
    stop_tx: oneshot::Sender<()>,
    stopped_rx: oneshot::Receiver<()>,
}

impl RecognitionSession {
    pub fn new(
        events: mpsc::Receiver<RecognitionEvent>,
        stop_tx: oneshot::Sender<()>,
        stopped_rx: oneshot::Receiver<()>,
    ) -> Self {
        Self {
            events,
            stop_tx,
            stopped_rx,
        }
    }

    fn split(self) -> (mpsc::Receiver<RecognitionEvent>, SessionStopper) {
        (
            self.events,
            SessionStopper {
                stop_tx: self.stop_tx,
                stopped_rx: self.stopped_rx,
            },
        )
    }
}

struct SessionStopper {
    stop_tx: oneshot::Sender<()>,
    stopped_rx: oneshot::Receiver<()>,
}

impl SessionStopper {
    /// Signals the capture to stop and waits until it has fully wound
    /// down. Two capture sessions must never overlap.
    async fn stop(self) {
        let _ = self.stop_tx.send(());
        let _ = self.stopped_rx.await;
    }
}

/// Speech-capture capability boundary (browser/OS recognition engine).
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + 'static {
    /// Whether the environment offers speech recognition at all.
    fn is_supported(&self) -> bool;

    /// Starts a capture session recognizing `language`.
    async fn start(&self, language: &str) -> anyhow::Result<RecognitionSession>;
}

/// Outbound transport for finalized utterances.
#[async_trait]
pub trait TranscriptPublisher: Send + Sync + 'static {
    async fn publish(&self, room: &str, utterance: &Utterance) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerState {
    Idle,
    Listening,
    Finalized,
}

/// Captures speech and emits exactly one finalized utterance per
/// recognition finalization to the messaging transport.
pub struct TranscriptProducer {
    recognizer: Arc<dyn SpeechRecognizer>,
    publisher: Arc<dyn TranscriptPublisher>,
    room: String,
    sender: String,
    sender_id: String,
    state_tx: Arc<watch::Sender<ProducerState>>,
    active: Option<ActiveCapture>,
    unsupported_logged: bool,
}

struct ActiveCapture {
    stopper: SessionStopper,
    pump: JoinHandle<()>,
    language: String,
}

impl TranscriptProducer {
    pub fn new(
        recognizer: Arc<dyn SpeechRecognizer>,
        publisher: Arc<dyn TranscriptPublisher>,
        room: impl Into<String>,
        sender: impl Into<String>,
        sender_id: impl Into<String>,
    ) -> Self {
        let (state_tx, _) = watch::channel(ProducerState::Idle);
        Self {
            recognizer,
            publisher,
            room: room.into(),
            sender: sender.into(),
            sender_id: sender_id.into(),
            state_tx: Arc::new(state_tx),
            active: None,
            unsupported_logged: false,
        }
    }

    pub fn state(&self) -> ProducerState {
        *self.state_tx.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<ProducerState> {
        self.state_tx.subscribe()
    }

    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }

    /// Starts (or restarts) capture in `language`. Any previous session is
    /// stopped and fully drained first, so two sessions never emit
    /// duplicate finalized utterances concurrently.
    ///
    /// Without recognition support this logs once and leaves the producer
    /// permanently inert.
    pub async fn start_capture(&mut self, language: &str) -> anyhow::Result<()> {
        if !self.recognizer.is_supported() {
            if !self.unsupported_logged {
                warn!("Speech recognition unavailable; captions from this participant are disabled");
                self.unsupported_logged = true;
            }
            return Ok(());
        }

        self.stop_capture().await;

        let session = self.recognizer.start(language).await?;
        let (events, stopper) = session.split();
        let pump = tokio::spawn(pump_events(
            events,
            Arc::clone(&self.state_tx),
            Arc::clone(&self.publisher),
            self.room.clone(),
            self.sender.clone(),
            self.sender_id.clone(),
        ));

        info!(room = %self.room, language, "Speech capture started");
        self.active = Some(ActiveCapture {
            stopper,
            pump,
            language: language.to_string(),
        });
        Ok(())
    }

    /// Switches the recognition language. A running session restarts; a
    /// stopped producer stays stopped.
    pub async fn set_language(&mut self, language: &str) -> anyhow::Result<()> {
        match &self.active {
            Some(active) if active.language == language => Ok(()),
            Some(_) => self.start_capture(language).await,
            None => Ok(()),
        }
    }

    /// Stops capture; returns only once the session has fully stopped and
    /// the event pump has drained.
    pub async fn stop_capture(&mut self) {
        if let Some(active) = self.active.take() {
            active.stopper.stop().await;
            if let Err(e) = active.pump.await {
                debug!(error = %e, "Recognition pump ended abnormally");
            }
            info!(room = %self.room, "Speech capture stopped");
        }
    }
}

async fn pump_events(
    mut events: mpsc::Receiver<RecognitionEvent>,
    state: Arc<watch::Sender<ProducerState>>,
    publisher: Arc<dyn TranscriptPublisher>,
    room: String,
    sender: String,
    sender_id: String,
) {
    state.send_replace(ProducerState::Listening);
    let mut interim = String::new();

    while let Some(event) = events.recv().await {
        match event {
            RecognitionEvent::Interim(text) => {
                interim = text;
            }
            RecognitionEvent::Final(text) => {
                state.send_replace(ProducerState::Finalized);
                let message = if text.trim().is_empty() {
                    std::mem::take(&mut interim)
                } else {
                    interim.clear();
                    text
                };
                if message.trim().is_empty() {
                    debug!("Empty finalization, nothing to publish");
                } else {
                    let utterance = Utterance {
                        sender: sender.clone(),
                        sender_id: sender_id.clone(),
                        message,
                        is_final: true,
                    };
                    if let Err(e) = publisher.publish(&room, &utterance).await {
                        warn!(error = %e, "Failed to publish utterance, dropping");
                    }
                }
                state.send_replace(ProducerState::Listening);
            }
            RecognitionEvent::Ended => break,
        }
    }

    state.send_replace(ProducerState::Idle);
    debug!(%room, "Recognition pump stopped");
}
