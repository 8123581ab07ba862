pub mod packer;
pub mod timeline;
pub mod transcriber;

pub use packer::{segment_and_pack, Chunk};
pub use timeline::{fallback_intervals, nonsilent_intervals, AudioInterval};
pub use transcriber::{join_fragments, TranscriptFragment, TranscriptionPipeline};
