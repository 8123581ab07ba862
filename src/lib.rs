pub mod config;
pub mod error;
pub mod media;
pub mod pipeline;
pub mod stt;

pub use config::Config;
pub use error::PipelineError;
pub use media::{FfmpegAnalyzer, MediaAnalyzer, SilenceTimeline};
pub use pipeline::{
    fallback_intervals, join_fragments, nonsilent_intervals, segment_and_pack, AudioInterval,
    Chunk, TranscriptFragment, TranscriptionPipeline,
};
pub use stt::{OpenAiStt, SttProvider, SttRequest};
