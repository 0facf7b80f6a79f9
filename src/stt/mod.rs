// src/stt/mod.rs
// Transcription provider interface

mod whisper;

pub use whisper::WhisperCliTranscriber;

use crate::transcript::Transcription;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Transcription failures are upstream preconditions for the pipeline, not
/// something it retries.
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Transcriber binary not found: {0}")]
    BinaryNotFound(PathBuf),

    #[error("Speech model not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Unsupported model size: {0}")]
    UnsupportedModelSize(String),

    #[error("Transcriber failed: {0}")]
    ToolFailed(String),

    #[error("Could not parse transcriber output: {0}")]
    MalformedOutput(String),
}

/// Turns an audio file into an ordered sequence of timestamped segments.
#[async_trait]
pub trait Transcribe: Send + Sync {
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
    ) -> Result<Transcription, TranscriptionError>;

    fn name(&self) -> &str;
}
