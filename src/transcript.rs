// src/transcript.rs
// Transcript data model shared by the whole pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One timestamped utterance from the transcription step.
/// Segments are chronological and non-overlapping by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Offset from the start of the recording
    pub start: Duration,
    pub end: Duration,
    /// Transcribed text for this segment
    pub text: String,
    /// Speaker label when diarization info is available
    pub speaker: Option<String>,
}

impl TranscriptSegment {
    pub fn new(start: Duration, end: Duration, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            speaker: None,
        }
    }

    /// Start timestamp as HH:MM:SS
    pub fn format_timestamp(&self) -> String {
        format_hms(self.start)
    }
}

/// Full transcription result for one recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcription {
    pub segments: Vec<TranscriptSegment>,
    /// Detected (or requested) language code, e.g. "en"
    pub language: String,
    /// Total recording duration
    pub duration: Duration,
}

impl Transcription {
    /// All segment texts joined with single spaces.
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|seg| seg.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// One line per segment, prefixed with its start timestamp.
    pub fn text_with_timestamps(&self) -> String {
        self.segments
            .iter()
            .map(|seg| match &seg.speaker {
                Some(speaker) => {
                    format!("[{}] {}: {}", seg.format_timestamp(), speaker, seg.text.trim())
                }
                None => format!("[{}] {}", seg.format_timestamp(), seg.text.trim()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render a duration as HH:MM:SS (hours unpadded beyond two digits).
pub fn format_hms(duration: Duration) -> String {
    let total = duration.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: u64, end: u64, text: &str) -> TranscriptSegment {
        TranscriptSegment::new(Duration::from_secs(start), Duration::from_secs(end), text)
    }

    #[test]
    fn timestamp_is_hh_mm_ss() {
        let segment = seg(3725, 3730, "hello");
        assert_eq!(segment.format_timestamp(), "01:02:05");
    }

    #[test]
    fn full_text_joins_trimmed_segments() {
        let transcription = Transcription {
            segments: vec![seg(0, 2, " first "), seg(2, 4, "second")],
            language: "en".to_string(),
            duration: Duration::from_secs(4),
        };
        assert_eq!(transcription.full_text(), "first second");
    }

    #[test]
    fn timestamped_text_includes_speaker_when_present() {
        let mut named = seg(60, 65, "status update");
        named.speaker = Some("Ana".to_string());
        let transcription = Transcription {
            segments: vec![seg(0, 2, "welcome"), named],
            language: "en".to_string(),
            duration: Duration::from_secs(65),
        };
        let text = transcription.text_with_timestamps();
        assert_eq!(text, "[00:00:00] welcome\n[00:01:00] Ana: status update");
    }
}
