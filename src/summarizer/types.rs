// src/summarizer/types.rs
// Summarizer result types and error taxonomy with retry classification

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parsed summarization output for one chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkNotes {
    pub summary_text: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
}

/// Summarization result (or failure) for exactly one chunk. Failed chunks
/// keep their slot so index continuity is preserved for traceability.
#[derive(Debug, Clone)]
pub struct PartialSummary {
    pub chunk_index: usize,
    pub summary_text: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub succeeded: bool,
    pub error: Option<SummarizeError>,
}

impl PartialSummary {
    pub fn success(chunk_index: usize, notes: ChunkNotes) -> Self {
        Self {
            chunk_index,
            summary_text: notes.summary_text,
            key_points: notes.key_points,
            action_items: notes.action_items,
            succeeded: true,
            error: None,
        }
    }

    pub fn failure(chunk_index: usize, error: SummarizeError) -> Self {
        Self {
            chunk_index,
            summary_text: String::new(),
            key_points: Vec::new(),
            action_items: Vec::new(),
            succeeded: false,
            error: Some(error),
        }
    }
}

/// Summarization call errors with retry classification.
#[derive(Debug, Clone, Error)]
pub enum SummarizeError {
    /// Endpoint unreachable (connection refused, DNS, reset)
    #[error("LLM endpoint unavailable: {0}")]
    EndpointUnavailable(String),

    #[error("Request timeout")]
    Timeout,

    /// The endpoint is up but has no model loaded. Global condition:
    /// retrying cannot help and the whole run should stop.
    #[error("No model loaded on the LLM endpoint")]
    ModelNotLoaded,

    #[error("Unexpected response (HTTP {status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// 2xx response whose payload could not be decoded at all
    #[error("Invalid response from LLM endpoint")]
    InvalidResponse,
}

impl SummarizeError {
    /// Transient errors worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SummarizeError::EndpointUnavailable(_) | SummarizeError::Timeout
        )
    }

    /// Errors that abort the whole run, not just one chunk.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SummarizeError::ModelNotLoaded)
    }
}
