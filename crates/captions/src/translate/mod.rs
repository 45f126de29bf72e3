pub mod http;

pub use http::{HttpTranslator, TranslationEndpoint};

use async_trait::async_trait;

/// Request to translate one utterance.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    /// Source language code, or [`crate::lang::AUTO_SOURCE`] for detection.
    pub source_lang: String,
    pub target_lang: String,
    /// Per-request model override.
    pub model: Option<String>,
}

/// Result of a translation attempt.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub detected_source_lang: String,
    /// True when every backend attempt failed and `text` is the
    /// untranslated input.
    pub degraded: bool,
    /// Raw backend response, or the failure payload when degraded.
    pub raw: serde_json::Value,
}

/// Trait for pluggable translation backends.
///
/// `translate` never fails: any backend failure degrades to the original
/// text with `degraded` set, so a broken translation service can never
/// break the live caption stream.
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    async fn translate(&self, req: TranslationRequest) -> Translation;
}
