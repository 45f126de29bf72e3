use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub media: MediaSettings,
    pub messaging: MessagingSettings,
    pub translation: TranslationSettings,
    pub summarizer: SummarizerSettings,
    pub captions: CaptionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// Hosted video/media service credentials (token minting + room REST API).
#[derive(Debug, Deserialize, Clone)]
pub struct MediaSettings {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub token_ttl_secs: u64,
}

/// Hosted channel-messaging service (caption fan-out between participants).
#[derive(Debug, Deserialize, Clone)]
pub struct MessagingSettings {
    pub app_id: String,
    pub key: String,
    pub secret: String,
    pub cluster: String,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationSettings {
    /// Primary translation endpoint, tried first.
    pub endpoint: String,
    /// Fallback endpoints, tried in order after the primary fails.
    pub fallback_endpoints: Vec<String>,
    pub api_key: Option<String>,
    /// Hard per-attempt timeout in seconds.
    pub timeout_secs: u64,
    /// Inputs longer than this are truncated before sending.
    pub max_input_len: usize,
    /// Max utterances per batched request (reserved for batching backends).
    pub batch_size: usize,
    pub model: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SummarizerSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CaptionSettings {
    /// Seconds a caption stays visible after the last received utterance.
    pub display_timeout_secs: u64,
    /// Viewer language used when no selection is present.
    pub default_language: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("LINGOROOM"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "lingoroom")?
            .set_default("media.api_key", "")?
            .set_default("media.api_secret", "")?
            .set_default("media.base_url", "https://video.media-service.example.com")?
            .set_default("media.token_ttl_secs", 300)?
            .set_default("messaging.app_id", "")?
            .set_default("messaging.key", "")?
            .set_default("messaging.secret", "")?
            .set_default("messaging.cluster", "mt1")?
            .set_default("messaging.host", "channels.example.com")?
            .set_default(
                "translation.endpoint",
                "https://translate.nlp-service.example.com/v1/translate",
            )?
            .set_default("translation.fallback_endpoints", Vec::<String>::new())?
            .set_default("translation.api_key", None::<String>)?
            .set_default("translation.timeout_secs", 5)?
            .set_default("translation.max_input_len", 2000)?
            .set_default("translation.batch_size", 25)?
            .set_default("translation.model", None::<String>)?
            .set_default("summarizer.api_key", None::<String>)?
            .set_default("summarizer.model", "claude-sonnet-4-5-20250929")?
            .set_default("summarizer.max_tokens", 1024)?
            .set_default("captions.display_timeout_secs", 5)?
            .set_default("captions.default_language", "en")?
            .build()?;

        config.try_deserialize()
    }

    /// Fails fast on credentials the call path cannot run without.
    ///
    /// Translation and summarizer keys are optional: translation degrades
    /// to source text, summarization reports unavailable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.media.api_key.is_empty() {
            missing.push("media.api_key");
        }
        if self.media.api_secret.is_empty() {
            missing.push("media.api_secret");
        }
        if self.messaging.app_id.is_empty() {
            missing.push("messaging.app_id");
        }
        if self.messaging.key.is_empty() {
            missing.push("messaging.key");
        }
        if self.messaging.secret.is_empty() {
            missing.push("messaging.secret");
        }
        if !missing.is_empty() {
            return Err(ConfigError::Message(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }
}
