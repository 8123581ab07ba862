use anyhow::Result;
use serde::Deserialize;

/// Pipeline configuration, loaded from the environment.
///
/// Every field has a default, so an empty environment yields a working
/// configuration. Recognized variables: `MAX_CHUNK_BYTES`,
/// `SILENCE_THRESHOLD_DB`, `SILENCE_MIN_DURATION_SEC`,
/// `FALLBACK_SEGMENT_SEC`, `MAX_RESPLIT_DEPTH`, `STT_MODEL`,
/// `STT_LANGUAGE`, `STT_RESPONSE_FORMAT`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Upper bound on a finalized chunk, in bytes (Whisper upload limit)
    #[serde(default = "default_max_chunk_bytes")]
    pub max_chunk_bytes: usize,

    /// Noise floor below which audio counts as silence, in dBFS
    #[serde(default = "default_silence_threshold_db")]
    pub silence_threshold_db: i32,

    /// Minimum silence duration worth splitting on, in seconds
    #[serde(default = "default_silence_min_duration_sec")]
    pub silence_min_duration_sec: f64,

    /// Fixed segment length used when silence detection fails, in seconds
    #[serde(default = "default_fallback_segment_sec")]
    pub fallback_segment_sec: f64,

    /// How many times an oversize segment may be re-split before giving up
    #[serde(default = "default_max_resplit_depth")]
    pub max_resplit_depth: u32,

    /// Speech-to-text model identifier
    #[serde(default = "default_stt_model")]
    pub stt_model: String,

    /// Language hint forwarded to the provider
    #[serde(default = "default_stt_language")]
    pub stt_language: String,

    /// Provider response format ("text", "json", "verbose_json")
    #[serde(default = "default_stt_response_format")]
    pub stt_response_format: String,
}

fn default_max_chunk_bytes() -> usize {
    25 * 1024 * 1024
}

fn default_silence_threshold_db() -> i32 {
    -40
}

fn default_silence_min_duration_sec() -> f64 {
    0.5
}

fn default_fallback_segment_sec() -> f64 {
    180.0
}

fn default_max_resplit_depth() -> u32 {
    3
}

fn default_stt_model() -> String {
    "whisper-1".to_string()
}

fn default_stt_language() -> String {
    "ko".to_string()
}

fn default_stt_response_format() -> String {
    "text".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chunk_bytes: default_max_chunk_bytes(),
            silence_threshold_db: default_silence_threshold_db(),
            silence_min_duration_sec: default_silence_min_duration_sec(),
            fallback_segment_sec: default_fallback_segment_sec(),
            max_resplit_depth: default_max_resplit_depth(),
            stt_model: default_stt_model(),
            stt_language: default_stt_language(),
            stt_response_format: default_stt_response_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.max_chunk_bytes, 25 * 1024 * 1024);
        assert_eq!(cfg.silence_threshold_db, -40);
        assert_eq!(cfg.silence_min_duration_sec, 0.5);
        assert_eq!(cfg.fallback_segment_sec, 180.0);
        assert_eq!(cfg.max_resplit_depth, 3);
        assert_eq!(cfg.stt_model, "whisper-1");
        assert_eq!(cfg.stt_language, "ko");
        assert_eq!(cfg.stt_response_format, "text");
    }
}
