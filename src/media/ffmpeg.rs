use std::path::Path;
use std::process::Output;

use tokio::process::Command;
use tracing::debug;

use super::{MediaAnalyzer, SilenceTimeline};
use crate::error::{PipelineError, Result};

/// Media analyzer backed by the `ffmpeg` / `ffprobe` binaries.
///
/// Duration comes from one `ffprobe` call; silence markers come from the
/// `silencedetect` filter's diagnostic output; range extraction uses
/// `-c copy` so chunk boundaries never cut through re-encoded frames.
pub struct FfmpegAnalyzer;

impl FfmpegAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FfmpegAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl MediaAnalyzer for FfmpegAnalyzer {
    async fn probe_duration(&self, source: &Path) -> Result<f64> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(source)
            .output()
            .await
            .map_err(|e| PipelineError::Probe {
                message: format!("failed to run ffprobe: {e}"),
            })?;

        if !output.status.success() {
            return Err(PipelineError::Probe {
                message: format!(
                    "ffprobe exited with {}: {}",
                    output.status,
                    stderr_excerpt(&output)
                ),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .trim()
            .parse::<f64>()
            .map_err(|_| PipelineError::Probe {
                message: format!("ffprobe reported no usable duration: {:?}", stdout.trim()),
            })
    }

    async fn detect_silence(
        &self,
        source: &Path,
        threshold_db: i32,
        min_silence_sec: f64,
    ) -> Result<SilenceTimeline> {
        let filter = format!("silencedetect=n={threshold_db}dB:d={min_silence_sec}");

        let output = Command::new("ffmpeg")
            .args(["-hide_banner", "-loglevel", "info", "-i"])
            .arg(source)
            .args(["-af", &filter, "-f", "null", "-"])
            .output()
            .await
            .map_err(|e| PipelineError::SilenceDetection {
                message: format!("failed to run ffmpeg: {e}"),
            })?;

        if !output.status.success() {
            return Err(PipelineError::SilenceDetection {
                message: format!(
                    "ffmpeg exited with {}: {}",
                    output.status,
                    stderr_excerpt(&output)
                ),
            });
        }

        // silencedetect logs its markers on stderr, not stdout
        let log = String::from_utf8_lossy(&output.stderr);
        let timeline = parse_silence_markers(&log);
        debug!(
            "Silence markers parsed: {} starts, {} ends",
            timeline.starts.len(),
            timeline.ends.len()
        );

        Ok(timeline)
    }

    async fn extract_range(&self, source: &Path, start: f64, end: f64) -> Result<Vec<u8>> {
        let output = Command::new("ffmpeg")
            .args([
                "-hide_banner",
                "-loglevel",
                "error",
                "-ss",
                &start.to_string(),
                "-to",
                &end.to_string(),
                "-i",
            ])
            .arg(source)
            .args(["-c", "copy", "-f", "mp3", "pipe:1"])
            .output()
            .await
            .map_err(|e| PipelineError::SegmentExtraction {
                start,
                end,
                message: format!("failed to run ffmpeg: {e}"),
            })?;

        if !output.status.success() {
            return Err(PipelineError::SegmentExtraction {
                start,
                end,
                message: format!(
                    "ffmpeg exited with {}: {}",
                    output.status,
                    stderr_excerpt(&output)
                ),
            });
        }

        Ok(output.stdout)
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

fn stderr_excerpt(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

/// Collect `silence_start:` / `silence_end:` timestamps from a
/// silencedetect diagnostic log, each list sorted ascending on its own.
fn parse_silence_markers(log: &str) -> SilenceTimeline {
    let mut timeline = SilenceTimeline::default();

    for line in log.lines() {
        if let Some(ts) = marker_value(line, "silence_start: ") {
            timeline.starts.push(ts);
        }
        if let Some(ts) = marker_value(line, "silence_end: ") {
            timeline.ends.push(ts);
        }
    }

    timeline.starts.sort_by(f64::total_cmp);
    timeline.ends.sort_by(f64::total_cmp);

    timeline
}

fn marker_value(line: &str, marker: &str) -> Option<f64> {
    let rest = &line[line.find(marker)? + marker.len()..];
    // silence_end lines continue with "| silence_duration: ..."
    let token = rest.split_whitespace().next()?;
    token.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_markers_from_silencedetect_output() {
        let log = "\
[mp3 @ 0x55d] Estimating duration from bitrate\n\
[silencedetect @ 0x55e] silence_start: 100\n\
[silencedetect @ 0x55e] silence_end: 102 | silence_duration: 2\n\
[silencedetect @ 0x55e] silence_start: 300.0\n\
[silencedetect @ 0x55e] silence_end: 301.2 | silence_duration: 1.2\n\
size=N/A time=00:10:00.00 bitrate=N/A speed= 500x\n";

        let timeline = parse_silence_markers(log);
        assert_eq!(timeline.starts, vec![100.0, 300.0]);
        assert_eq!(timeline.ends, vec![102.0, 301.2]);
    }

    #[test]
    fn sorts_each_marker_list_independently() {
        let log = "\
silence_start: 30.5\n\
silence_start: 10.0\n\
silence_end: 31.0\n\
silence_end: 11.0\n";

        let timeline = parse_silence_markers(log);
        assert_eq!(timeline.starts, vec![10.0, 30.5]);
        assert_eq!(timeline.ends, vec![11.0, 31.0]);
    }

    #[test]
    fn ignores_lines_without_markers() {
        let timeline = parse_silence_markers("frame=1 fps=0.0 q=-0.0\n");
        assert!(timeline.starts.is_empty());
        assert!(timeline.ends.is_empty());
    }
}
