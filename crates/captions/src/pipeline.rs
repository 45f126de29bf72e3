use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::CaptionConfig;
use crate::lang::{primary_subtag, AUTO_SOURCE};
use crate::synthesis::SynthesisTrigger;
use crate::translate::{TranslationRequest, Translator};
use crate::Utterance;

/// The currently visible caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub sender: String,
    /// Post-translation text.
    pub message: String,
    /// Set when the translation degraded to the untranslated source text.
    pub degraded: bool,
}

/// Push side of the caption queue. Clonable; dropping every feed tears
/// the consumer task down.
#[derive(Clone)]
pub struct CaptionFeed {
    tx: mpsc::UnboundedSender<Utterance>,
}

impl CaptionFeed {
    /// Appends a finalized utterance to the tail of the queue. Interim
    /// utterances are transient and never enqueued.
    pub fn push(&self, utterance: Utterance) {
        if !utterance.is_final {
            return;
        }
        if self.tx.send(utterance).is_err() {
            debug!("Caption pipeline is gone, dropping utterance");
        }
    }
}

pub struct CaptionPipeline;

impl CaptionPipeline {
    /// Spawns the dedicated consumer task that owns the queue and the
    /// displayed caption.
    ///
    /// The single task is the mutual-exclusion guard: it is the only
    /// consumer of the queue and the only writer of the caption state, so
    /// at most one translation is in flight and utterances are displayed
    /// strictly in arrival order.
    pub fn spawn(
        translator: Arc<dyn Translator>,
        synthesis: SynthesisTrigger,
        config: CaptionConfig,
    ) -> (CaptionFeed, watch::Receiver<Option<Caption>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (caption_tx, caption_rx) = watch::channel(None);
        tokio::spawn(drain_loop(rx, caption_tx, translator, synthesis, config));
        (CaptionFeed { tx }, caption_rx)
    }
}

async fn drain_loop(
    mut queue: mpsc::UnboundedReceiver<Utterance>,
    caption: watch::Sender<Option<Caption>>,
    translator: Arc<dyn Translator>,
    synthesis: SynthesisTrigger,
    config: CaptionConfig,
) {
    let target_lang = primary_subtag(&config.language);
    info!(language = %config.language, target = %target_lang, "Caption pipeline started");

    let mut clear_at: Option<Instant> = None;
    loop {
        let next = if let Some(deadline) = clear_at {
            tokio::select! {
                item = queue.recv() => item,
                _ = tokio::time::sleep_until(deadline) => {
                    caption.send_replace(None);
                    clear_at = None;
                    continue;
                }
            }
        } else {
            queue.recv().await
        };

        let Some(utterance) = next else {
            break; // every feed dropped
        };

        // The display timer restarts on queue input.
        clear_at = Some(Instant::now() + config.display_timeout);

        let result = translator
            .translate(TranslationRequest {
                text: utterance.message.clone(),
                source_lang: AUTO_SOURCE.to_string(),
                target_lang: target_lang.clone(),
                model: config.model.clone(),
            })
            .await;

        if result.degraded {
            warn!(sender = %utterance.sender, "Translation degraded, showing source text");
        }

        caption.send_replace(Some(Caption {
            sender: utterance.sender,
            message: result.text.clone(),
            degraded: result.degraded,
        }));

        // With more utterances waiting, interrupt in-progress playback so
        // the audio keeps pace with the queue.
        let is_last = queue.is_empty();
        synthesis.speak(&result.text, &config.language, !is_last);
    }

    debug!("Caption pipeline stopped");
}
