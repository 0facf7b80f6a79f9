// src/pipeline.rs
// Pipeline driver: chunk, summarize with bounded concurrency, merge

use crate::chunker;
use crate::config::{ConfigError, PipelineConfig};
use crate::merge::{merge, FinalSummary, MergeError};
use crate::summarizer::{PartialSummary, Summarizer};
use crate::transcript::TranscriptSegment;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Global condition detected on any chunk call: remaining chunks cannot
    /// succeed either, so the run stops instead of burning time on them.
    #[error("No model loaded on the LLM endpoint")]
    ModelNotLoaded,

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error("Run cancelled")]
    Cancelled,
}

/// Time range covered by one chunk, kept so the document assembler can name
/// the ranges that could not be summarized.
#[derive(Debug, Clone)]
pub struct ChunkSpan {
    pub index: usize,
    pub start: Duration,
    pub end: Duration,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub summary: FinalSummary,
    pub spans: Vec<ChunkSpan>,
}

/// Run the transcript-to-summary pipeline. Chunk calls are dispatched with
/// bounded concurrency; completion order does not matter because the merge
/// re-sorts by chunk index. Cancelling the token abandons in-flight calls
/// and returns without producing output.
pub async fn summarize_transcript(
    segments: &[TranscriptSegment],
    config: &PipelineConfig,
    client: &dyn Summarizer,
    cancel: &CancellationToken,
) -> Result<PipelineOutput, PipelineError> {
    config.validate()?;

    let chunks = chunker::split(segments, config.chunk_chars)?;
    if chunks.is_empty() {
        tracing::info!("Nothing to summarize: empty transcript");
        return Ok(PipelineOutput {
            summary: FinalSummary {
                overview: String::new(),
                key_points: Vec::new(),
                action_items: Vec::new(),
                chunk_failures: Vec::new(),
            },
            spans: Vec::new(),
        });
    }

    let spans: Vec<ChunkSpan> = chunks
        .iter()
        .map(|chunk| {
            let (start, end) = chunk.time_range();
            ChunkSpan {
                index: chunk.index,
                start,
                end,
            }
        })
        .collect();

    let total = chunks.len();
    tracing::info!(
        "Summarizing {} chunks (concurrency {})",
        total,
        config.concurrency
    );

    let mut results = stream::iter(chunks.iter().map(|chunk| async move {
        (chunk.index, client.summarize_chunk(chunk, total == 1).await)
    }))
    .buffer_unordered(config.concurrency);

    let mut partials: Vec<PartialSummary> = Vec::with_capacity(total);
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!("Cancellation requested, abandoning in-flight chunk calls");
                return Err(PipelineError::Cancelled);
            }
            item = results.next() => item,
        };

        let Some((index, result)) = next else { break };
        match result {
            Ok(notes) => {
                tracing::info!("Chunk {} summarized", index);
                partials.push(PartialSummary::success(index, notes));
            }
            Err(e) if e.is_fatal() => {
                tracing::error!("Chunk {} hit a fatal endpoint condition: {}", index, e);
                return Err(PipelineError::ModelNotLoaded);
            }
            Err(e) => {
                tracing::warn!("Chunk {} failed: {}", index, e);
                partials.push(PartialSummary::failure(index, e));
            }
        }
    }
    drop(results);

    let summary = tokio::select! {
        _ = cancel.cancelled() => return Err(PipelineError::Cancelled),
        merged = merge(partials, client) => merged?,
    };

    Ok(PipelineOutput { summary, spans })
}
