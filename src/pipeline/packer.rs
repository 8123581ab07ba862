use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::info;

use super::timeline::AudioInterval;
use crate::error::{PipelineError, Result};
use crate::media::MediaAnalyzer;

/// A packed unit of audio, at most the configured byte limit long, ready
/// for upload. Sequence indices start at 0 and increase in time order.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub sequence_index: usize,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
struct WorkItem {
    interval: AudioInterval,
    /// How many re-splits produced this interval
    depth: u32,
}

/// Extract each nonsilent interval as a lossless stream copy and greedily
/// pack the resulting segments into chunks of at most `max_chunk_bytes`.
///
/// A segment that alone exceeds the limit is not packed; its interval is
/// divided into `ceil(size / max_chunk_bytes)` time-equal sub-intervals
/// which are inserted into the work list right after the current position
/// and extracted on later iterations. Re-splitting is bounded by
/// `max_resplit_depth`; a sub-interval still oversized at the bound fails
/// with [`PipelineError::OversizeIrreducibleSegment`].
///
/// Any extraction failure is fatal to the whole call; no partial chunk
/// list is returned.
pub async fn segment_and_pack(
    analyzer: &dyn MediaAnalyzer,
    source: &Path,
    intervals: Vec<AudioInterval>,
    max_chunk_bytes: usize,
    max_resplit_depth: u32,
    cancel: &CancellationToken,
) -> Result<Vec<Chunk>> {
    let mut work: Vec<WorkItem> = intervals
        .into_iter()
        .map(|interval| WorkItem { interval, depth: 0 })
        .collect();

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buf: Vec<u8> = Vec::new();

    let mut pos = 0;
    while pos < work.len() {
        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let WorkItem { interval, depth } = work[pos];
        let seg_bytes = analyzer
            .extract_range(source, interval.start, interval.end)
            .await?;

        if seg_bytes.len() > max_chunk_bytes {
            if depth >= max_resplit_depth {
                return Err(PipelineError::OversizeIrreducibleSegment {
                    start: interval.start,
                    end: interval.end,
                    size_bytes: seg_bytes.len(),
                    depth,
                });
            }

            let parts = seg_bytes.len().div_ceil(max_chunk_bytes);
            let part_dur = interval.duration() / parts as f64;
            info!(
                "Segment {:.2}s-{:.2}s too big ({} bytes), re-splitting into {}x{:.1}s",
                interval.start,
                interval.end,
                seg_bytes.len(),
                parts,
                part_dur
            );

            for p in 0..parts {
                let p_start = interval.start + p as f64 * part_dur;
                let p_end = (p_start + part_dur).min(interval.end);
                work.insert(
                    pos + 1 + p,
                    WorkItem {
                        interval: AudioInterval {
                            start: p_start,
                            end: p_end,
                        },
                        depth: depth + 1,
                    },
                );
            }

            // The oversize extraction is discarded; only the sub-intervals
            // get packed.
            pos += 1;
            continue;
        }

        if buf.len() + seg_bytes.len() > max_chunk_bytes {
            finalize_chunk(&mut chunks, &mut buf);
        }
        buf.extend_from_slice(&seg_bytes);

        pos += 1;
    }

    if !buf.is_empty() {
        finalize_chunk(&mut chunks, &mut buf);
    }

    info!("Total chunks produced: {}", chunks.len());
    Ok(chunks)
}

fn finalize_chunk(chunks: &mut Vec<Chunk>, buf: &mut Vec<u8>) {
    let chunk = Chunk {
        sequence_index: chunks.len(),
        bytes: std::mem::take(buf),
    };
    info!(
        "Chunk {} finalized ({} bytes)",
        chunk.sequence_index,
        chunk.bytes.len()
    );
    chunks.push(chunk);
}
