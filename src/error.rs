//! Error types for the transcription pipeline.

use thiserror::Error;

/// Failures the pipeline can surface to its caller.
///
/// Only `SilenceDetection` is recovered internally (the segmentation step
/// falls back to fixed-duration intervals); every other variant aborts the
/// whole request. The pipeline never retries on its own.
#[derive(Error, Debug)]
pub enum PipelineError {
    // Duration probing errors
    #[error("failed to probe audio duration: {message}")]
    Probe { message: String },

    // Silence analysis errors
    #[error("silence detection failed: {message}")]
    SilenceDetection { message: String },

    // Segment extraction errors
    #[error("failed to extract segment {start:.2}s-{end:.2}s: {message}")]
    SegmentExtraction {
        start: f64,
        end: f64,
        message: String,
    },

    #[error(
        "segment {start:.2}s-{end:.2}s is {size_bytes} bytes, still over the chunk limit after {depth} re-splits"
    )]
    OversizeIrreducibleSegment {
        start: f64,
        end: f64,
        size_bytes: usize,
        depth: u32,
    },

    // Provider errors
    #[error("transcription failed for chunk {sequence_index}: {message}")]
    Transcription {
        sequence_index: usize,
        message: String,
    },

    #[error("transcription request cancelled")]
    Cancelled,

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, PipelineError>;
