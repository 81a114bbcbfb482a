use async_trait::async_trait;
use log::debug;

use crate::pipeline::SummaryModel;
use crate::{Error, Result};

/// Instruction placed in front of the transcript text
pub const SUMMARY_PROMPT: &str = "You are a YouTube video summarizer. You will take the transcript text\n\
and summarize the entire video, providing the important points within 250 words.\n\
Please provide the summary of the text given here:  ";

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Prefix and transcript, concatenated with nothing in between
pub fn build_prompt(prefix: &str, transcript_text: &str) -> String {
    let mut prompt = String::with_capacity(prefix.len() + transcript_text.len());
    prompt.push_str(prefix);
    prompt.push_str(transcript_text);
    prompt
}

/// Everything needed to reach the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }
}

impl GeminiConfig {
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

/// Summary model backed by Gemini `generateContent`
#[derive(Debug, Clone)]
pub struct GeminiModel {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiModel {
    pub fn new(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl SummaryModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::model("GOOGLE_API_KEY is not configured (required for summarization)")
            })?;

        debug!("Summarizing via Gemini API with model {}", self.config.model);

        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let resp = self
            .client
            .post(self.config.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(Error::model)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::model(format!("Gemini API returned {status}: {body}")));
        }

        let json: serde_json::Value = resp.json().await.map_err(Error::model)?;
        extract_gemini_text(&json)
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        return Err(Error::model(format!("prompt blocked by Gemini: {reason}")));
    }

    Err(Error::model("unexpected Gemini API response format"))
}
