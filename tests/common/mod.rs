// Scripted fakes for the pipeline's two external seams: the media
// analyzer and the speech-to-text provider. Both record their calls so
// tests can assert on ranges, ordering, and call counts.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use studyscribe::error::{PipelineError, Result as PipelineResult};
use studyscribe::{MediaAnalyzer, SilenceTimeline, SttProvider, SttRequest};

/// Deterministic analyzer: fixed duration, canned silence markers, and
/// synthetic extraction yielding `round(range_secs * bytes_per_second)`
/// bytes per call (or a constant size when `constant_size` is set).
pub struct ScriptedAnalyzer {
    pub duration: f64,
    /// `None` simulates a failed silencedetect pass
    pub silence: Option<SilenceTimeline>,
    pub bytes_per_second: f64,
    /// When set, every extraction returns exactly this many bytes
    pub constant_size: Option<usize>,
    pub fail_extraction: bool,
    extract_calls: Mutex<Vec<(f64, f64)>>,
}

impl ScriptedAnalyzer {
    pub fn new(duration: f64, silence: SilenceTimeline, bytes_per_second: f64) -> Self {
        Self {
            duration,
            silence: Some(silence),
            bytes_per_second,
            constant_size: None,
            fail_extraction: false,
            extract_calls: Mutex::new(Vec::new()),
        }
    }

    /// Analyzer whose silence-detection pass always fails.
    pub fn without_silence_detection(duration: f64, bytes_per_second: f64) -> Self {
        Self {
            silence: None,
            ..Self::new(duration, SilenceTimeline::default(), bytes_per_second)
        }
    }

    pub fn extracted_ranges(&self) -> Vec<(f64, f64)> {
        self.extract_calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaAnalyzer for ScriptedAnalyzer {
    async fn probe_duration(&self, _source: &Path) -> PipelineResult<f64> {
        Ok(self.duration)
    }

    async fn detect_silence(
        &self,
        _source: &Path,
        _threshold_db: i32,
        _min_silence_sec: f64,
    ) -> PipelineResult<SilenceTimeline> {
        match &self.silence {
            Some(timeline) => Ok(timeline.clone()),
            None => Err(PipelineError::SilenceDetection {
                message: "scripted failure".to_string(),
            }),
        }
    }

    async fn extract_range(&self, _source: &Path, start: f64, end: f64) -> PipelineResult<Vec<u8>> {
        self.extract_calls.lock().unwrap().push((start, end));

        if self.fail_extraction {
            return Err(PipelineError::SegmentExtraction {
                start,
                end,
                message: "scripted failure".to_string(),
            });
        }

        let size = self
            .constant_size
            .unwrap_or_else(|| ((end - start) * self.bytes_per_second).round() as usize);
        Ok(vec![0u8; size])
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Provider fake returning `text-<call index>` per chunk and optionally
/// failing at one scripted call index.
pub struct ScriptedStt {
    pub fail_at_index: Option<usize>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedStt {
    pub fn new() -> Self {
        Self {
            fail_at_index: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at_index: Some(index),
            ..Self::new()
        }
    }

    /// File names seen so far, in call order.
    pub fn received_file_names(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SttProvider for ScriptedStt {
    async fn transcribe(
        &self,
        file_name: &str,
        _audio: Vec<u8>,
        _request: &SttRequest,
    ) -> Result<String> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(file_name.to_string());
            calls.len() - 1
        };

        if self.fail_at_index == Some(index) {
            anyhow::bail!("scripted provider failure");
        }

        Ok(format!("text-{index}"))
    }

    fn name(&self) -> &str {
        "scripted-stt"
    }
}
