use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};

use super::{SttProvider, SttRequest};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Speech-to-text over an OpenAI-compatible `/audio/transcriptions`
/// endpoint.
pub struct OpenAiStt {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl OpenAiStt {
    pub fn new(api_key: String) -> Self {
        Self::with_api_base(api_key, DEFAULT_API_BASE.to_string())
    }

    pub fn with_api_base(api_key: String, api_base: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Build from `OPENAI_API_KEY` and optional `STT_API_BASE`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY is not set")?;
        let api_base =
            std::env::var("STT_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Ok(Self::with_api_base(api_key, api_base))
    }
}

#[async_trait::async_trait]
impl SttProvider for OpenAiStt {
    async fn transcribe(
        &self,
        file_name: &str,
        audio: Vec<u8>,
        request: &SttRequest,
    ) -> Result<String> {
        let url = format!("{}/audio/transcriptions", self.api_base);

        let file_part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/mpeg")
            .context("Failed to build multipart file part")?;
        let form = Form::new()
            .part("file", file_part)
            .text("model", request.model.clone())
            .text("response_format", request.response_format.clone())
            .text("language", request.language.clone());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Transcription request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read transcription response")?;

        if !status.is_success() {
            bail!("HTTP {} from {}: {}", status, url, body.trim());
        }

        // "text" format comes back as the bare transcript; JSON formats
        // wrap it in a `text` field.
        if request.response_format == "text" {
            Ok(body.trim_end_matches('\n').to_string())
        } else {
            let value: serde_json::Value =
                serde_json::from_str(&body).context("Malformed JSON transcription response")?;
            match value.get("text").and_then(|t| t.as_str()) {
                Some(text) => Ok(text.to_string()),
                None => bail!("Transcription response has no text field"),
            }
        }
    }

    fn name(&self) -> &str {
        "openai"
    }
}
