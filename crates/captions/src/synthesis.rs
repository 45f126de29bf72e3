use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::lang::primary_subtag;

/// An installed synthesis voice.
#[derive(Debug, Clone)]
pub struct Voice {
    pub name: String,
    /// BCP 47 language tag, e.g. "en-US".
    pub language: String,
    pub is_default: bool,
}

/// Playback backend boundary (browser/OS speech synthesis).
#[async_trait]
pub trait SynthesisBackend: Send + Sync + 'static {
    fn voices(&self) -> Vec<Voice>;

    /// Plays `text` with `voice`; resolves when playback finishes or is
    /// cancelled.
    async fn play(&self, voice: &Voice, text: &str) -> anyhow::Result<()>;

    /// Cancels in-progress playback, making `play` resolve early.
    fn cancel(&self);
}

/// Pending requests retained behind the utterance currently playing.
const MAX_PENDING: usize = 2;

struct SpeakRequest {
    text: String,
    language_hint: String,
    interrupt: bool,
}

/// Serializes caption playback. `speak` is fire-and-forget; a dedicated
/// playback task owns ordering, so the caption pipeline never waits on
/// audio.
#[derive(Clone)]
pub struct SynthesisTrigger {
    tx: mpsc::UnboundedSender<SpeakRequest>,
    backend: Arc<dyn SynthesisBackend>,
}

impl SynthesisTrigger {
    pub fn new(backend: Arc<dyn SynthesisBackend>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(playback_loop(rx, Arc::clone(&backend)));
        Self { tx, backend }
    }

    /// Requests playback of `text`. With `interrupt_previous`, in-progress
    /// playback is cancelled and already-pending requests are discarded;
    /// otherwise the request queues behind the current utterance, keeping
    /// at most the two most recent.
    pub fn speak(&self, text: &str, language_hint: &str, interrupt_previous: bool) {
        if text.trim().is_empty() {
            return;
        }
        if interrupt_previous {
            self.backend.cancel();
        }
        let request = SpeakRequest {
            text: text.to_string(),
            language_hint: language_hint.to_string(),
            interrupt: interrupt_previous,
        };
        if self.tx.send(request).is_err() {
            debug!("Playback task is gone, dropping speech request");
        }
    }
}

async fn playback_loop(
    mut rx: mpsc::UnboundedReceiver<SpeakRequest>,
    backend: Arc<dyn SynthesisBackend>,
) {
    let mut pending: VecDeque<SpeakRequest> = VecDeque::new();
    loop {
        if pending.is_empty() {
            match rx.recv().await {
                Some(request) => pending.push_back(request),
                None => break, // trigger dropped
            }
        }

        // Fold in everything that arrived during the last playback.
        while let Ok(request) = rx.try_recv() {
            pending.push_back(request);
        }

        // An interrupting request obsoletes everything queued before it.
        if let Some(at) = pending.iter().rposition(|r| r.interrupt) {
            if at > 0 {
                debug!(discarded = at, "Interrupt discards queued speech");
                pending.drain(..at);
            }
        }

        while pending.len() > MAX_PENDING {
            if let Some(dropped) = pending.pop_front() {
                debug!(text = %dropped.text, "Dropping stale speech request");
            }
        }

        let Some(request) = pending.pop_front() else {
            continue;
        };

        match select_voice(&backend.voices(), &request.language_hint) {
            Some(voice) => {
                if let Err(e) = backend.play(&voice, &request.text).await {
                    warn!(error = %e, "Speech playback failed");
                }
            }
            None => debug!("No synthesis voice installed, skipping playback"),
        }
    }

    debug!("Playback task stopped");
}

/// Picks the first voice matching the hint's primary subtag, then the
/// backend's default voice, then any voice at all.
pub fn select_voice(voices: &[Voice], language_hint: &str) -> Option<Voice> {
    let tag = primary_subtag(language_hint);
    voices
        .iter()
        .find(|v| primary_subtag(&v.language) == tag)
        .or_else(|| voices.iter().find(|v| v.is_default))
        .or_else(|| voices.first())
        .cloned()
}
