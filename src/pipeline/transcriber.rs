use std::io::Write;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::packer::segment_and_pack;
use super::timeline::{fallback_intervals, nonsilent_intervals};
use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::media::MediaAnalyzer;
use crate::stt::{SttProvider, SttRequest};

/// One chunk's transcription, tagged for ordered reassembly.
#[derive(Debug, Clone)]
pub struct TranscriptFragment {
    pub sequence_index: usize,
    pub text: String,
}

/// Join fragment texts with a newline separator, ascending by sequence
/// index.
///
/// Reassembly goes by sequence index, never by completion order, so the
/// result stays correct even if provider calls are ever parallelized.
pub fn join_fragments(mut fragments: Vec<TranscriptFragment>) -> String {
    fragments.sort_by_key(|f| f.sequence_index);
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// End-to-end transcription pipeline: probe, segment on silence, pack into
/// byte-bounded chunks, transcribe sequentially, reassemble in order.
///
/// Stateless across calls; one instance can serve concurrent requests, each
/// working on its own temporary source copy.
pub struct TranscriptionPipeline {
    analyzer: Arc<dyn MediaAnalyzer>,
    stt: Arc<dyn SttProvider>,
    config: Config,
}

impl TranscriptionPipeline {
    pub fn new(analyzer: Arc<dyn MediaAnalyzer>, stt: Arc<dyn SttProvider>, config: Config) -> Self {
        Self {
            analyzer,
            stt,
            config,
        }
    }

    /// Transcribe raw audio bytes into a single joined transcript.
    pub async fn transcribe(&self, audio_bytes: &[u8]) -> Result<String> {
        self.transcribe_with_cancel(audio_bytes, &CancellationToken::new())
            .await
    }

    /// Like [`transcribe`](Self::transcribe), checking `cancel` between
    /// segment extractions and between provider calls.
    pub async fn transcribe_with_cancel(
        &self,
        audio_bytes: &[u8],
        cancel: &CancellationToken,
    ) -> Result<String> {
        info!(
            "Transcription start: {} bytes via {}/{}",
            audio_bytes.len(),
            self.analyzer.name(),
            self.stt.name()
        );

        // Exclusive on-disk copy for this request, removed on drop on every
        // exit path.
        let mut source = tempfile::Builder::new().suffix(".mp3").tempfile()?;
        source.write_all(audio_bytes)?;
        source.flush()?;
        let source_path = source.path();

        let duration = self.analyzer.probe_duration(source_path).await?;
        info!("Audio length: {:.1}s", duration);

        let intervals = match self
            .analyzer
            .detect_silence(
                source_path,
                self.config.silence_threshold_db,
                self.config.silence_min_duration_sec,
            )
            .await
        {
            Ok(timeline) => {
                let intervals = nonsilent_intervals(&timeline, duration);
                info!("Non-silent segments detected: {}", intervals.len());
                intervals
            }
            Err(e) => {
                // Fallback policy lives here, not in the analyzer: a failed
                // silence pass degrades to fixed-length segmentation.
                warn!(
                    "Silence detection failed ({e}); using fixed {}s segments",
                    self.config.fallback_segment_sec
                );
                fallback_intervals(duration, self.config.fallback_segment_sec)
            }
        };

        let chunks = segment_and_pack(
            self.analyzer.as_ref(),
            source_path,
            intervals,
            self.config.max_chunk_bytes,
            self.config.max_resplit_depth,
            cancel,
        )
        .await?;

        let request = SttRequest {
            model: self.config.stt_model.clone(),
            response_format: self.config.stt_response_format.clone(),
            language: self.config.stt_language.clone(),
        };

        let total = chunks.len();
        let mut fragments = Vec::with_capacity(total);

        for chunk in chunks {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            // Synthetic name with a real extension so provider-side format
            // sniffing succeeds.
            let file_name = format!("chunk-{:03}.mp3", chunk.sequence_index);
            info!(
                "Sending chunk {}/{} ({} bytes)",
                chunk.sequence_index + 1,
                total,
                chunk.bytes.len()
            );

            let text = self
                .stt
                .transcribe(&file_name, chunk.bytes, &request)
                .await
                .map_err(|e| PipelineError::Transcription {
                    sequence_index: chunk.sequence_index,
                    message: format!("{e:#}"),
                })?;

            info!(
                "Chunk {}/{} done ({} chars)",
                chunk.sequence_index + 1,
                total,
                text.len()
            );
            fragments.push(TranscriptFragment {
                sequence_index: chunk.sequence_index,
                text,
            });
        }

        info!("Transcription finished: {} fragments", fragments.len());
        Ok(join_fragments(fragments))
    }
}
