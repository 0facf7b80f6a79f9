// src/media.rs
// Input classification and audio extraction via an external ffmpeg binary

use std::env;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tokio::process::Command;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "webm", "m4v"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "flac", "ogg", "aac", "wma"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Unsupported media type: {0}")]
    UnsupportedType(PathBuf),

    #[error("Failed to run ffmpeg: {0}")]
    EncoderSpawn(String),

    #[error("ffmpeg failed: {0}")]
    EncoderFailed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

pub fn classify(path: &Path) -> Result<MediaKind, MediaError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(MediaKind::Audio)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(MediaKind::Video)
    } else {
        Err(MediaError::UnsupportedType(path.to_path_buf()))
    }
}

/// Audio ready for transcription. Extracted files live in the temp dir and
/// are removed when this is dropped; original audio inputs are untouched.
#[derive(Debug)]
pub struct PreparedAudio {
    path: PathBuf,
    extracted: bool,
}

impl PreparedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PreparedAudio {
    fn drop(&mut self) {
        if self.extracted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Hand audio files straight through; extract the audio track from video
/// files as 16 kHz mono WAV, which is what Whisper wants.
pub async fn prepare_audio(input: &Path) -> Result<PreparedAudio, MediaError> {
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    match classify(input)? {
        MediaKind::Audio => Ok(PreparedAudio {
            path: input.to_path_buf(),
            extracted: false,
        }),
        MediaKind::Video => {
            let output = temp_wav_path();
            extract_audio(input, &output).await?;
            Ok(PreparedAudio {
                path: output,
                extracted: true,
            })
        }
    }
}

async fn extract_audio(input: &Path, output: &Path) -> Result<(), MediaError> {
    let bin = env::var("FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_string());

    tracing::info!("Extracting audio: {} -> {}", input.display(), output.display());

    let result = Command::new(&bin)
        .arg("-i")
        .arg(input)
        .arg("-vn")
        .arg("-ac")
        .arg("1")
        .arg("-ar")
        .arg("16000")
        .arg("-y")
        .arg(output)
        .output()
        .await
        .map_err(|e| MediaError::EncoderSpawn(format!("{}: {}", bin, e)))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(MediaError::EncoderFailed(stderr.trim().to_string()));
    }

    Ok(())
}

fn temp_wav_path() -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let pid = std::process::id();
    env::temp_dir().join(format!("notula_audio_{}_{}.wav", pid, ts))
}
