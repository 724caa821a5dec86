//! OpenAI-backed content generation and speech synthesis.
//!
//! Both calls share one `reqwest` client with a per-request timeout, so a
//! hung remote call stalls only its own worker slot. The chat call asks
//! for a JSON-object response and parses it into `GeneratedContent`; the
//! speech call streams raw audio bytes to a local file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::io::AsyncWriteExt;

use super::{ContentGenerator, SpeechSynthesizer};
use crate::domain::GeneratedContent;

const SYSTEM_PROMPT: &str = r#"Role: You are an expert language learning coach.

Task: I will give you a term/phrase and its source context.

Instructions:
1. ANALYZE the term based on its context
2. CREATE a natural, contextual cloze deletion sentence
3. PROVIDE a clear definition and usage context

Output Format (JSON Only):
{
  "cloze_text": "Full sentence with {{c1::target term::hint}}.",
  "extra_html": "<b>Meaning:</b> [Definition]<br><b>Context:</b> [Usage context]",
  "audio_script": "The full sentence written naturally for text-to-speech.",
  "tags": "tag1 tag2 tag3"
}

Guidelines:
- Make sentences natural and memorable
- Use appropriate difficulty level
- Include helpful hints in the cloze deletion
- Keep definitions concise but complete"#;

/// Settings for the OpenAI adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API base URL (no trailing slash)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Chat model used for content generation
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Speech model used for narration
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// Narration voice
    #[serde(default = "default_tts_voice")]
    pub tts_voice: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_chat_model() -> String {
    "gpt-4o".to_string()
}
fn default_tts_model() -> String {
    "tts-1".to_string()
}
fn default_tts_voice() -> String {
    "alloy".to_string()
}
fn default_timeout() -> u64 {
    60
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            tts_model: default_tts_model(),
            tts_voice: default_tts_voice(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// OpenAI API client implementing both generation seams
pub struct OpenAiClient {
    config: OpenAiConfig,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a client with an explicit credential
    pub fn new(api_key: String, config: OpenAiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    /// Create a client reading the credential from the environment.
    ///
    /// This is the startup credential check: a missing key fails here,
    /// before any input row is read or remote call issued.
    pub fn from_env(config: OpenAiConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .context("OPENAI_API_KEY environment variable not set")?;
        Self::new(api_key, config)
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint)
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl ContentGenerator for OpenAiClient {
    async fn generate(&self, term: &str, source_label: &str) -> Result<GeneratedContent> {
        let url = self.api_url("chat/completions");
        let user_content = format!("Term: '{}'. Context/Source: '{}'", term, source_label);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.config.chat_model,
                "messages": [
                    {"role": "system", "content": SYSTEM_PROMPT},
                    {"role": "user", "content": user_content},
                ],
                "temperature": 0.3,
                "response_format": {"type": "json_object"},
            }))
            .send()
            .await
            .context("chat completion request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("chat completion returned {}: {}", status, body.trim());
        }

        let chat: ChatResponse = response
            .json()
            .await
            .context("failed to parse chat completion response")?;

        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| anyhow::anyhow!("chat completion returned no choices"))?;

        serde_json::from_str(content).context("model output is not the expected JSON object")
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAiClient {
    async fn synthesize(&self, script: &str, output: &Path) -> Result<()> {
        let url = self.api_url("audio/speech");

        let mut response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.config.tts_model,
                "voice": self.config.tts_voice,
                "input": script,
            }))
            .send()
            .await
            .context("speech request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("speech endpoint returned {}: {}", status, body.trim());
        }

        let mut file = tokio::fs::File::create(output)
            .await
            .with_context(|| format!("failed to create audio file: {}", output.display()))?;

        while let Some(chunk) = response
            .chunk()
            .await
            .context("failed to read audio stream")?
        {
            file.write_all(&chunk)
                .await
                .context("failed to write audio file")?;
        }
        file.flush().await?;

        Ok(())
    }
}
