pub mod config;
pub mod lang;
pub mod pipeline;
pub mod producer;
pub mod synthesis;
pub mod translate;
pub mod transport;

pub use config::CaptionConfig;
pub use pipeline::{Caption, CaptionFeed, CaptionPipeline};
pub use producer::{
    ProducerState, RecognitionEvent, RecognitionSession, SpeechRecognizer, TranscriptProducer,
    TranscriptPublisher,
};
pub use synthesis::{SynthesisBackend, SynthesisTrigger, Voice};
pub use translate::{
    HttpTranslator, Translation, TranslationEndpoint, TranslationRequest, Translator,
};
pub use transport::{MessagingConnection, MessagingSubscriber};

use serde::{Deserialize, Serialize};

/// A finalized unit of transcribed speech attributed to a sender.
///
/// Serializes in the messaging service's wire shape
/// (`{sender, message, senderId, isFinal}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    pub sender: String,
    pub sender_id: String,
    pub message: String,
    pub is_final: bool,
}
