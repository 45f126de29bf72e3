use std::time::Duration;

/// Configuration for a viewer's caption pipeline.
#[derive(Debug, Clone)]
pub struct CaptionConfig {
    /// The viewer's selected language code, BCP 47 (e.g. "kn-IN").
    pub language: String,
    /// How long a caption stays visible after the last queue input.
    pub display_timeout: Duration,
    /// Translation model override passed through to the backend.
    pub model: Option<String>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            display_timeout: Duration::from_secs(5),
            model: None,
        }
    }
}
