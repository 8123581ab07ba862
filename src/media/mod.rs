pub mod ffmpeg;

use std::path::Path;

use crate::error::Result;

pub use ffmpeg::FfmpegAnalyzer;

/// Silence markers collected from one detection pass.
///
/// Starts and ends are kept as two independently sorted lists rather than
/// paired tuples, because analyzers emit the two marker kinds slightly out
/// of strict pairing order. They are paired positionally later, when the
/// nonsilent complement is derived.
#[derive(Debug, Clone, Default)]
pub struct SilenceTimeline {
    /// `silence_start` timestamps, seconds, sorted ascending
    pub starts: Vec<f64>,
    /// `silence_end` timestamps, seconds, sorted ascending
    pub ends: Vec<f64>,
}

/// Media analysis backend trait
///
/// Abstracts the external media toolchain so the pipeline's interval and
/// packing logic can be tested against fakes returning canned timelines
/// and bytes. The real implementation shells out to ffmpeg/ffprobe.
#[async_trait::async_trait]
pub trait MediaAnalyzer: Send + Sync {
    /// Total duration of the source, in seconds.
    async fn probe_duration(&self, source: &Path) -> Result<f64>;

    /// Run a silence-detection pass over the whole source.
    ///
    /// An invocation failure is distinct from an empty timeline: zero
    /// detected silence is a valid result, a failed pass is an error the
    /// caller recovers from with fixed-duration segmentation.
    async fn detect_silence(
        &self,
        source: &Path,
        threshold_db: i32,
        min_silence_sec: f64,
    ) -> Result<SilenceTimeline>;

    /// Losslessly extract `[start, end)` from the source as container bytes.
    ///
    /// Must be a stream copy, not a re-encode, so extraction points stay
    /// valid concatenation boundaries.
    async fn extract_range(&self, source: &Path, start: f64, end: f64) -> Result<Vec<u8>>;

    /// Get analyzer name for logging
    fn name(&self) -> &str;
}
