// src/lib.rs
// notula: meeting recordings -> timestamped transcript -> structured minutes

pub mod chunker;
pub mod config;
pub mod media;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod stt;
pub mod summarizer;
pub mod transcript;

pub use chunker::Chunk;
pub use config::{ConfigError, PipelineConfig};
pub use merge::{FinalSummary, MergeError};
pub use output::{DocumentAssembler, OutputFormat};
pub use pipeline::{summarize_transcript, ChunkSpan, PipelineError, PipelineOutput};
pub use summarizer::{LmStudioClient, PartialSummary, SummarizeError, Summarizer};
pub use transcript::{Transcription, TranscriptSegment};
