pub mod openai;

use anyhow::Result;

pub use openai::OpenAiStt;

/// Per-request knobs forwarded to the provider.
#[derive(Debug, Clone)]
pub struct SttRequest {
    pub model: String,
    pub response_format: String,
    pub language: String,
}

/// Speech-to-text provider trait
///
/// One call transcribes one chunk. `file_name` must carry a recognized
/// audio extension so the provider's format sniffing succeeds.
#[async_trait::async_trait]
pub trait SttProvider: Send + Sync {
    /// Transcribe one chunk of audio, returning its text.
    async fn transcribe(&self, file_name: &str, audio: Vec<u8>, request: &SttRequest)
        -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
