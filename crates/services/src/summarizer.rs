use lingoroom_db::models::TranscriptEntry;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct SummarizerService {
    client: Client,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SummaryRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<SummaryMessage>,
}

#[derive(Debug, Serialize)]
struct SummaryMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl SummarizerService {
    pub fn new(api_key: Option<String>, model: String, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            max_tokens,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Summarizes a room's full transcript at end of call.
    pub async fn summarize(
        &self,
        room_name: &str,
        entries: &[TranscriptEntry],
    ) -> Result<String, String> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| "Summarizer API key not configured".to_string())?;

        if entries.is_empty() {
            return Err("Transcript is empty, nothing to summarize".to_string());
        }

        let transcript: String = entries
            .iter()
            .map(|e| format!("{}: {}\n", e.speaker_name, e.text))
            .collect();

        let prompt = format!(
            concat!(
                "The following is the transcript of the video call \"{}\". ",
                "Write a concise summary of the conversation: the topics ",
                "discussed, any decisions made, and any follow-ups agreed. ",
                "Answer with the summary only, no preamble.\n\n{}"
            ),
            room_name, transcript
        );

        let request = SummaryRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![SummaryMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Summarizer request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Summarizer error {}: {}", status, body));
        }

        let summary_resp: SummaryResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse summarizer response: {}", e))?;

        let text = summary_resp
            .content
            .first()
            .and_then(|c| c.text.as_ref())
            .ok_or_else(|| "No text in summarizer response".to_string())?;

        Ok(text.trim().to_string())
    }
}
