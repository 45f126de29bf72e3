use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, Semaphore};

use lingoroom_captions::producer::{
    RecognitionEvent, RecognitionSession, SpeechRecognizer, TranscriptPublisher,
};
use lingoroom_captions::synthesis::{SynthesisBackend, Voice};
use lingoroom_captions::translate::{Translation, TranslationRequest, Translator};
use lingoroom_captions::Utterance;

pub fn utterance(sender: &str, message: &str) -> Utterance {
    Utterance {
        sender: sender.to_string(),
        sender_id: format!("{}-id", sender.to_lowercase()),
        message: message.to_string(),
        is_final: true,
    }
}

/// Translator that returns the input unchanged and counts calls.
pub struct EchoTranslator {
    pub calls: AtomicUsize,
}

impl EchoTranslator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, req: TranslationRequest) -> Translation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Translation {
            text: req.text,
            detected_source_lang: req.source_lang,
            degraded: false,
            raw: serde_json::Value::Null,
        }
    }
}

/// Translator with every endpoint down: always degrades to the source
/// text.
pub struct FailingTranslator {
    pub calls: AtomicUsize,
}

impl FailingTranslator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Translator for FailingTranslator {
    async fn translate(&self, req: TranslationRequest) -> Translation {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Translation {
            detected_source_lang: req.source_lang.clone(),
            text: req.text,
            degraded: true,
            raw: serde_json::json!({ "error": "every endpoint failed" }),
        }
    }
}

/// Translator that announces each call and waits for a permit before
/// answering, so tests control exactly when each translation completes.
pub struct GatedTranslator {
    started: mpsc::UnboundedSender<String>,
    gate: Arc<Semaphore>,
}

impl GatedTranslator {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<String>, Arc<Semaphore>) {
        let (started, started_rx) = mpsc::unbounded_channel();
        let gate = Arc::new(Semaphore::new(0));
        (
            Arc::new(Self {
                started,
                gate: Arc::clone(&gate),
            }),
            started_rx,
            gate,
        )
    }
}

#[async_trait]
impl Translator for GatedTranslator {
    async fn translate(&self, req: TranslationRequest) -> Translation {
        let _ = self.started.send(req.text.clone());
        let permit = self.gate.acquire().await.expect("gate closed");
        permit.forget();
        Translation {
            text: req.text,
            detected_source_lang: req.source_lang,
            degraded: false,
            raw: serde_json::Value::Null,
        }
    }
}

/// Synthesis backend that records playback order and cancel calls.
pub struct RecordingSynthesis {
    pub cancels: AtomicUsize,
    pub voices: Vec<Voice>,
    pub play_duration: Duration,
    played: mpsc::UnboundedSender<String>,
}

impl RecordingSynthesis {
    pub fn new(play_duration: Duration) -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (played, played_rx) = mpsc::unbounded_channel();
        let backend = Arc::new(Self {
            cancels: AtomicUsize::new(0),
            voices: vec![
                Voice {
                    name: "alice".to_string(),
                    language: "en-US".to_string(),
                    is_default: true,
                },
                Voice {
                    name: "kavya".to_string(),
                    language: "kn-IN".to_string(),
                    is_default: false,
                },
            ],
            play_duration,
            played,
        });
        (backend, played_rx)
    }
}

#[async_trait]
impl SynthesisBackend for RecordingSynthesis {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn play(&self, _voice: &Voice, text: &str) -> anyhow::Result<()> {
        let _ = self.played.send(text.to_string());
        tokio::time::sleep(self.play_duration).await;
        Ok(())
    }

    fn cancel(&self) {
        self.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

/// Recognizer whose sessions are driven by the test through a handed-out
/// event sender. Tracks how many sessions ever ran concurrently.
pub struct MockRecognizer {
    pub supported: bool,
    pub sessions_started: AtomicUsize,
    pub active: Arc<AtomicUsize>,
    pub max_active: Arc<AtomicUsize>,
    events: Mutex<Option<mpsc::Sender<RecognitionEvent>>>,
}

impl MockRecognizer {
    pub fn new(supported: bool) -> Arc<Self> {
        Arc::new(Self {
            supported,
            sessions_started: AtomicUsize::new(0),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: Arc::new(AtomicUsize::new(0)),
            events: Mutex::new(None),
        })
    }

    /// Event sender for the most recently started session.
    pub fn session_events(&self) -> mpsc::Sender<RecognitionEvent> {
        self.events
            .lock()
            .expect("events lock poisoned")
            .clone()
            .expect("no session started")
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn start(&self, _language: &str) -> anyhow::Result<RecognitionSession> {
        self.sessions_started.fetch_add(1, Ordering::SeqCst);
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);

        let (event_tx, event_rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();
        let (stopped_tx, stopped_rx) = oneshot::channel();

        *self.events.lock().expect("events lock poisoned") = Some(event_tx.clone());

        let active = Arc::clone(&self.active);
        tokio::spawn(async move {
            let _ = stop_rx.await;
            let _ = event_tx.send(RecognitionEvent::Ended).await;
            active.fetch_sub(1, Ordering::SeqCst);
            let _ = stopped_tx.send(());
        });

        Ok(RecognitionSession::new(event_rx, stop_tx, stopped_rx))
    }
}

/// Publisher that records published utterances, optionally failing every
/// publish.
pub struct RecordingPublisher {
    pub fail: bool,
    pub attempts: AtomicUsize,
    published: mpsc::UnboundedSender<(String, Utterance)>,
}

impl RecordingPublisher {
    pub fn new(fail: bool) -> (Arc<Self>, mpsc::UnboundedReceiver<(String, Utterance)>) {
        let (published, published_rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                fail,
                attempts: AtomicUsize::new(0),
                published,
            }),
            published_rx,
        )
    }
}

#[async_trait]
impl TranscriptPublisher for RecordingPublisher {
    async fn publish(&self, room: &str, utterance: &Utterance) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("messaging transport unreachable");
        }
        let _ = self.published.send((room.to_string(), utterance.clone()));
        Ok(())
    }
}
