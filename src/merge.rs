// src/merge.rs
// Merge per-chunk partial summaries into one final structure

use crate::summarizer::{PartialSummary, Summarizer};
use thiserror::Error;

/// Separator between partial overviews in the combined text and in the
/// concatenation fallback.
const COMBINE_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("No chunk was summarized successfully")]
    NoSuccessfulChunks,
}

/// Terminal artifact of the merge: ordered, deduplicated, immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalSummary {
    pub overview: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    /// Indices of chunks whose summarization failed, ascending
    pub chunk_failures: Vec<usize>,
}

/// Combine all partial summaries in ascending chunk order, regardless of the
/// order summarization calls completed in. With more than one successful
/// chunk, one extra summarization call turns the concatenated partial
/// overviews into a cohesive top-level overview; if that call fails the
/// literal concatenation is kept instead of dropping content.
pub async fn merge(
    mut partials: Vec<PartialSummary>,
    combiner: &dyn Summarizer,
) -> Result<FinalSummary, MergeError> {
    partials.sort_by_key(|p| p.chunk_index);

    let chunk_failures: Vec<usize> = partials
        .iter()
        .filter(|p| !p.succeeded)
        .map(|p| p.chunk_index)
        .collect();

    let successes: Vec<&PartialSummary> = partials.iter().filter(|p| p.succeeded).collect();
    if successes.is_empty() {
        return Err(MergeError::NoSuccessfulChunks);
    }

    if !chunk_failures.is_empty() {
        tracing::warn!(
            "{} of {} chunks failed to summarize: {:?}",
            chunk_failures.len(),
            partials.len(),
            chunk_failures
        );
    }

    let key_points = dedup_preserving_order(
        successes
            .iter()
            .flat_map(|p| p.key_points.iter().cloned()),
    );
    let action_items = dedup_preserving_order(
        successes
            .iter()
            .flat_map(|p| p.action_items.iter().cloned()),
    );

    let overview = if successes.len() == 1 {
        successes[0].summary_text.clone()
    } else {
        let combined = successes
            .iter()
            .map(|p| p.summary_text.as_str())
            .collect::<Vec<_>>()
            .join(COMBINE_SEPARATOR);

        match combiner.combine_summaries(&combined).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Combine pass failed ({}), keeping concatenation", e);
                combined
            }
        }
    };

    Ok(FinalSummary {
        overview,
        key_points,
        action_items,
        chunk_failures,
    })
}

/// Case-insensitive, whitespace-normalized exact-match dedup keeping the
/// first occurrence. A simple pass, not semantic.
fn dedup_preserving_order(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();

    for item in items {
        let key = normalize(&item);
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(item);
    }

    out
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::Chunk;
    use crate::summarizer::{ChunkNotes, SummarizeError};
    use async_trait::async_trait;

    /// Deterministic combiner stub; optionally fails every combine call.
    struct StubCombiner {
        fail: bool,
    }

    #[async_trait]
    impl Summarizer for StubCombiner {
        async fn summarize_chunk(
            &self,
            _chunk: &Chunk,
            _whole_transcript: bool,
        ) -> Result<ChunkNotes, SummarizeError> {
            unreachable!("merge never summarizes chunks")
        }

        async fn combine_summaries(&self, combined: &str) -> Result<String, SummarizeError> {
            if self.fail {
                Err(SummarizeError::Timeout)
            } else {
                Ok(format!("combined({})", combined.len()))
            }
        }
    }

    fn ok_partial(index: usize, summary: &str, points: &[&str], actions: &[&str]) -> PartialSummary {
        PartialSummary::success(
            index,
            ChunkNotes {
                summary_text: summary.to_string(),
                key_points: points.iter().map(|s| s.to_string()).collect(),
                action_items: actions.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn failed_partial(index: usize) -> PartialSummary {
        PartialSummary::failure(index, SummarizeError::EndpointUnavailable("refused".into()))
    }

    #[tokio::test]
    async fn out_of_order_arrival_is_merged_in_index_order() {
        let partials = vec![
            ok_partial(2, "third", &["p3"], &[]),
            ok_partial(0, "first", &["p1"], &[]),
            ok_partial(1, "second", &["p2"], &[]),
        ];
        let result = merge(partials, &StubCombiner { fail: true }).await.unwrap();

        // Combine failed, so the overview is the literal concatenation
        assert_eq!(result.overview, "first\n\n---\n\nsecond\n\n---\n\nthird");
        assert_eq!(result.key_points, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn single_success_is_used_verbatim_without_combine_call() {
        let partials = vec![ok_partial(0, "the only summary", &[], &[])];
        let result = merge(partials, &StubCombiner { fail: true }).await.unwrap();
        assert_eq!(result.overview, "the only summary");
    }

    #[tokio::test]
    async fn multiple_successes_get_a_combine_pass() {
        let partials = vec![ok_partial(0, "aa", &[], &[]), ok_partial(1, "bb", &[], &[])];
        let result = merge(partials, &StubCombiner { fail: false }).await.unwrap();
        // "aa" + separator + "bb"
        assert_eq!(result.overview, "combined(11)");
    }

    #[tokio::test]
    async fn key_points_are_deduped_case_and_whitespace_insensitively() {
        let partials = vec![
            ok_partial(0, "s0", &["Fix bug", "Ship feature"], &["Email  team"]),
            ok_partial(1, "s1", &["fix bug"], &["email team", "Book room"]),
        ];
        let result = merge(partials, &StubCombiner { fail: false }).await.unwrap();
        assert_eq!(result.key_points, vec!["Fix bug", "Ship feature"]);
        assert_eq!(result.action_items, vec!["Email  team", "Book room"]);
    }

    #[tokio::test]
    async fn failed_chunks_are_recorded_but_do_not_abort() {
        let partials = vec![
            ok_partial(0, "zero", &["a"], &[]),
            failed_partial(1),
            ok_partial(2, "two", &["b"], &[]),
        ];
        let result = merge(partials, &StubCombiner { fail: false }).await.unwrap();
        assert_eq!(result.chunk_failures, vec![1]);
        assert_eq!(result.key_points, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn all_failed_is_fatal() {
        let partials = vec![failed_partial(0), failed_partial(1)];
        let result = merge(partials, &StubCombiner { fail: false }).await;
        assert!(matches!(result, Err(MergeError::NoSuccessfulChunks)));
    }

    #[tokio::test]
    async fn merge_is_idempotent() {
        let build = || {
            vec![
                ok_partial(1, "one", &["x"], &["do x"]),
                ok_partial(0, "zero", &["y"], &[]),
            ]
        };
        let combiner = StubCombiner { fail: false };
        let first = merge(build(), &combiner).await.unwrap();
        let second = merge(build(), &combiner).await.unwrap();
        assert_eq!(first, second);
    }
}
