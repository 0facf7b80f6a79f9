// src/stt/whisper.rs
// whisper.cpp CLI transcription provider

use super::{Transcribe, TranscriptionError};
use crate::transcript::{TranscriptSegment, Transcription};
use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::process::Command;

const MODEL_SIZES: &[&str] = &["tiny", "base", "small", "medium", "large"];

pub struct WhisperCliTranscriber {
    bin_path: PathBuf,
    model_path: PathBuf,
}

impl WhisperCliTranscriber {
    /// Resolve binary and model from the environment. `WHISPER_CPP_BIN`
    /// names the whisper.cpp CLI (default `whisper-cli` on PATH);
    /// `WHISPER_MODEL` overrides the ggml file derived from `model_size`.
    pub fn new(model_size: &str) -> Result<Self, TranscriptionError> {
        if !MODEL_SIZES.contains(&model_size) {
            return Err(TranscriptionError::UnsupportedModelSize(
                model_size.to_string(),
            ));
        }

        let bin_path = env::var("WHISPER_CPP_BIN")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("whisper-cli"));

        let model_path = env::var("WHISPER_MODEL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(format!("models/ggml-{}.bin", model_size)));

        if !model_path.exists() {
            return Err(TranscriptionError::ModelNotFound(model_path));
        }

        tracing::info!(
            "Whisper transcriber initialized: bin={}, model={}",
            bin_path.display(),
            model_path.display()
        );

        Ok(Self {
            bin_path,
            model_path,
        })
    }

    async fn run_whisper(
        &self,
        audio: &Path,
        out_base: &Path,
        language: &str,
    ) -> Result<(), TranscriptionError> {
        let output = Command::new(&self.bin_path)
            .arg("--model")
            .arg(&self.model_path)
            .arg("--file")
            .arg(audio)
            .arg("--output-json")
            .arg("--output-file")
            .arg(out_base)
            .arg("--language")
            .arg(language)
            .output()
            .await
            .map_err(|_| TranscriptionError::BinaryNotFound(self.bin_path.clone()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranscriptionError::ToolFailed(stderr.trim().to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl Transcribe for WhisperCliTranscriber {
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
    ) -> Result<Transcription, TranscriptionError> {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let out_base = env::temp_dir().join(format!("notula_whisper_{}_{}", std::process::id(), ts));

        let lang = language.unwrap_or("auto");
        let result = self.run_whisper(audio, &out_base, lang).await;

        let json_path = out_base.with_extension("json");
        let raw = result.and_then(|_| {
            std::fs::read_to_string(&json_path)
                .map_err(|e| TranscriptionError::MalformedOutput(e.to_string()))
        });
        let _ = std::fs::remove_file(&json_path);

        let transcription = parse_whisper_json(&raw?, lang)?;
        tracing::info!(
            "Transcribed {} segments ({} language)",
            transcription.segments.len(),
            transcription.language
        );
        Ok(transcription)
    }

    fn name(&self) -> &str {
        "whisper.cpp"
    }
}

#[derive(Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    result: Option<WhisperResult>,
    transcription: Vec<WhisperSegment>,
}

#[derive(Deserialize)]
struct WhisperResult {
    language: Option<String>,
}

#[derive(Deserialize)]
struct WhisperSegment {
    offsets: WhisperOffsets,
    text: String,
}

#[derive(Deserialize)]
struct WhisperOffsets {
    from: u64,
    to: u64,
}

/// Parse whisper.cpp `--output-json` into the pipeline transcript model.
/// Offsets are milliseconds from the start of the recording.
fn parse_whisper_json(raw: &str, fallback_language: &str) -> Result<Transcription, TranscriptionError> {
    let output: WhisperOutput =
        serde_json::from_str(raw).map_err(|e| TranscriptionError::MalformedOutput(e.to_string()))?;

    let segments: Vec<TranscriptSegment> = output
        .transcription
        .iter()
        .filter(|seg| !seg.text.trim().is_empty())
        .map(|seg| {
            TranscriptSegment::new(
                Duration::from_millis(seg.offsets.from),
                Duration::from_millis(seg.offsets.to),
                seg.text.trim(),
            )
        })
        .collect();

    let duration = segments.last().map(|s| s.end).unwrap_or_default();
    let language = output
        .result
        .and_then(|r| r.language)
        .unwrap_or_else(|| fallback_language.to_string());

    Ok(Transcription {
        segments,
        language,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "result": { "language": "en" },
        "transcription": [
            { "timestamps": { "from": "00:00:00,000", "to": "00:00:03,000" },
              "offsets": { "from": 0, "to": 3000 },
              "text": " Good morning everyone." },
            { "timestamps": { "from": "00:00:03,000", "to": "00:00:07,500" },
              "offsets": { "from": 3000, "to": 7500 },
              "text": " Let's get started." },
            { "timestamps": { "from": "00:00:07,500", "to": "00:00:08,000" },
              "offsets": { "from": 7500, "to": 8000 },
              "text": "   " }
        ]
    }"#;

    #[test]
    fn parses_segments_with_millisecond_offsets() {
        let transcription = parse_whisper_json(SAMPLE, "auto").unwrap();
        assert_eq!(transcription.segments.len(), 2);
        assert_eq!(transcription.segments[0].text, "Good morning everyone.");
        assert_eq!(transcription.segments[1].start, Duration::from_millis(3000));
        assert_eq!(transcription.duration, Duration::from_millis(7500));
        assert_eq!(transcription.language, "en");
    }

    #[test]
    fn blank_segments_are_dropped() {
        let transcription = parse_whisper_json(SAMPLE, "auto").unwrap();
        assert!(transcription.segments.iter().all(|s| !s.text.is_empty()));
    }

    #[test]
    fn missing_language_falls_back_to_request() {
        let raw = r#"{ "transcription": [] }"#;
        let transcription = parse_whisper_json(raw, "en").unwrap();
        assert_eq!(transcription.language, "en");
        assert!(transcription.segments.is_empty());
    }

    #[test]
    fn garbage_output_is_a_malformed_output_error() {
        assert!(matches!(
            parse_whisper_json("not json", "auto"),
            Err(TranscriptionError::MalformedOutput(_))
        ));
    }

    #[test]
    fn unsupported_model_size_is_rejected() {
        assert!(matches!(
            WhisperCliTranscriber::new("enormous"),
            Err(TranscriptionError::UnsupportedModelSize(_))
        ));
    }
}
