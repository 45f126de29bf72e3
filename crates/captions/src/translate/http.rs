use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Translation, TranslationRequest, Translator};

/// One hosted translation endpoint in the fallback chain.
#[derive(Debug, Clone)]
pub struct TranslationEndpoint {
    pub url: String,
    pub api_key: Option<String>,
}

impl TranslationEndpoint {
    pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            url: url.into(),
            api_key,
        }
    }
}

/// Translation over hosted HTTP endpoints, tried in declaration order
/// with a uniform per-attempt timeout. Stateless between calls.
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoints: Vec<TranslationEndpoint>,
    timeout: Duration,
    max_input_len: usize,
    default_model: Option<String>,
}

#[derive(Serialize)]
struct WireRequest<'a> {
    text: &'a str,
    source_language: &'a str,
    target_language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    format: &'a str,
}

impl HttpTranslator {
    pub fn new(
        endpoints: Vec<TranslationEndpoint>,
        timeout: Duration,
        max_input_len: usize,
        default_model: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
            timeout,
            max_input_len,
            default_model,
        }
    }

    async fn attempt(
        &self,
        endpoint: &TranslationEndpoint,
        body: &WireRequest<'_>,
    ) -> anyhow::Result<(String, Value)> {
        let mut request = self
            .client
            .post(&endpoint.url)
            .timeout(self.timeout)
            .json(body);
        if let Some(key) = &endpoint.api_key {
            request = request.bearer_auth(key);
        }

        let raw: Value = request
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let translated = ["translated_text", "translatedText", "text"]
            .iter()
            .find_map(|key| raw.get(key).and_then(Value::as_str))
            .ok_or_else(|| anyhow::anyhow!("no translated text in response"))?
            .to_string();

        Ok((translated, raw))
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, req: TranslationRequest) -> Translation {
        if req.text.trim().is_empty() {
            return Translation {
                text: String::new(),
                detected_source_lang: req.source_lang,
                degraded: false,
                raw: Value::Null,
            };
        }

        let text = truncate_to_chars(&req.text, self.max_input_len);
        let model = req.model.as_deref().or(self.default_model.as_deref());
        let body = WireRequest {
            text,
            source_language: &req.source_lang,
            target_language: &req.target_lang,
            model,
            format: "text",
        };

        let mut last_error = String::new();
        for (nth, endpoint) in self.endpoints.iter().enumerate() {
            match self.attempt(endpoint, &body).await {
                Ok((translated, raw)) => {
                    if nth > 0 {
                        info!(endpoint = %endpoint.url, "Translation served by fallback endpoint");
                    }
                    if translated == text {
                        // Soft signal: the backend may not support the
                        // target language and echoed the input.
                        debug!(
                            target = %req.target_lang,
                            "Translation equals source text"
                        );
                    }
                    let detected = raw
                        .get("detected_source_language")
                        .and_then(Value::as_str)
                        .unwrap_or(&req.source_lang)
                        .to_string();
                    return Translation {
                        text: translated,
                        detected_source_lang: detected,
                        degraded: false,
                        raw,
                    };
                }
                Err(e) => {
                    warn!(endpoint = %endpoint.url, error = %e, "Translation attempt failed");
                    last_error = e.to_string();
                }
            }
        }

        Translation {
            detected_source_lang: req.source_lang.clone(),
            text: req.text,
            degraded: true,
            raw: serde_json::json!({ "error": last_error }),
        }
    }
}

fn truncate_to_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
