// src/chunker.rs
// Split a transcript into LLM-context-safe chunks at segment boundaries

use crate::config::ConfigError;
use crate::transcript::TranscriptSegment;
use std::time::Duration;

/// A bounded-size contiguous slice of the transcript, submitted as one
/// summarization unit. Chunks partition the segment sequence exactly:
/// no gaps, no overlaps, indices contiguous from 0.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub index: usize,
    pub segments: Vec<TranscriptSegment>,
    /// Sum of segment text lengths. At most `max_chars`, except when a
    /// single segment alone exceeds the limit and forms its own chunk.
    pub char_count: usize,
}

impl Chunk {
    /// Time range covered by this chunk.
    pub fn time_range(&self) -> (Duration, Duration) {
        let start = self.segments.first().map(|s| s.start).unwrap_or_default();
        let end = self.segments.last().map(|s| s.end).unwrap_or_default();
        (start, end)
    }

    /// Chunk text as one timestamped line per segment.
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .map(|seg| format!("[{}] {}", seg.format_timestamp(), seg.text.trim()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Greedily accumulate consecutive segments while the next one still fits.
/// A segment longer than `max_chars` becomes its own chunk: truncating or
/// splitting mid-segment would corrupt timestamps and meaning.
///
/// Empty input yields an empty chunk list; callers treat that as a no-op
/// summarization pass, not an error.
pub fn split(segments: &[TranscriptSegment], max_chars: usize) -> Result<Vec<Chunk>, ConfigError> {
    if max_chars == 0 {
        return Err(ConfigError::InvalidChunkSize);
    }

    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current: Vec<TranscriptSegment> = Vec::new();
    let mut current_chars = 0usize;

    for segment in segments {
        let len = segment.text.len();

        if !current.is_empty() && current_chars + len > max_chars {
            chunks.push(Chunk {
                index: chunks.len(),
                segments: std::mem::take(&mut current),
                char_count: current_chars,
            });
            current_chars = 0;
        }

        current.push(segment.clone());
        current_chars += len;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            index: chunks.len(),
            segments: current,
            char_count: current_chars,
        });
    }

    tracing::debug!(
        "Split {} segments into {} chunks (max {} chars)",
        segments.len(),
        chunks.len(),
        max_chars
    );

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: u64, end: u64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(Duration::from_secs(start), Duration::from_secs(end), text)
    }

    fn segs(texts: &[&str]) -> Vec<TranscriptSegment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| seg(i as u64, i as u64 + 1, t))
            .collect()
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunks = split(&[], 100).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn zero_max_chars_is_a_config_error() {
        let segments = segs(&["hello"]);
        assert!(matches!(
            split(&segments, 0),
            Err(ConfigError::InvalidChunkSize)
        ));
    }

    #[test]
    fn chunks_partition_segments_without_loss_or_reorder() {
        let segments = segs(&["aaaa", "bbbb", "cccc", "dddd", "ee"]);
        let chunks = split(&segments, 8).unwrap();

        let rejoined: Vec<String> = chunks
            .iter()
            .flat_map(|c| c.segments.iter().map(|s| s.text.clone()))
            .collect();
        let original: Vec<String> = segments.iter().map(|s| s.text.clone()).collect();
        assert_eq!(rejoined, original);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
        }
    }

    #[test]
    fn chunks_respect_size_bound() {
        let segments = segs(&["aaaa", "bbbb", "cccc", "dddd"]);
        let chunks = split(&segments, 8).unwrap();
        assert_eq!(chunks.len(), 2);
        for chunk in &chunks {
            assert!(chunk.char_count <= 8);
            let sum: usize = chunk.segments.iter().map(|s| s.text.len()).sum();
            assert_eq!(chunk.char_count, sum);
        }
    }

    #[test]
    fn oversized_segment_becomes_its_own_chunk() {
        let long = "x".repeat(50);
        let segments = segs(&["aa", &long, "bb"]);
        let chunks = split(&segments, 10).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].segments.len(), 1);
        assert_eq!(chunks[1].char_count, 50);
        assert_eq!(chunks[1].segments[0].text, long);
    }

    #[test]
    fn everything_fits_in_one_chunk() {
        let segments = segs(&["short", "lines"]);
        let chunks = split(&segments, 1000).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].char_count, 10);
    }

    #[test]
    fn time_range_spans_first_to_last_segment() {
        let segments = vec![seg(10, 20, "aaaa"), seg(20, 35, "bbbb")];
        let chunks = split(&segments, 100).unwrap();
        let (start, end) = chunks[0].time_range();
        assert_eq!(start, Duration::from_secs(10));
        assert_eq!(end, Duration::from_secs(35));
    }

    #[test]
    fn split_is_deterministic() {
        let segments = segs(&["one", "two", "three", "four"]);
        let a = split(&segments, 7).unwrap();
        let b = split(&segments, 7).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.char_count, y.char_count);
            assert_eq!(x.segments.len(), y.segments.len());
        }
    }
}
