// src/output.rs
// Document assembler: render the final summary + transcript to disk

use crate::merge::FinalSummary;
use crate::pipeline::ChunkSpan;
use crate::transcript::{format_hms, Transcription};
use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write document to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Text,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            other => Err(format!("Unknown format '{}' (use markdown or text)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// Renders the terminal pipeline artifact into a meeting-notes document.
/// Thin templating only; all content decisions were made upstream.
pub struct DocumentAssembler<'a> {
    media_path: &'a Path,
    transcription: &'a Transcription,
    summary: &'a FinalSummary,
    spans: &'a [ChunkSpan],
    created_at: DateTime<Local>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        media_path: &'a Path,
        transcription: &'a Transcription,
        summary: &'a FinalSummary,
        spans: &'a [ChunkSpan],
    ) -> Self {
        Self {
            media_path,
            transcription,
            summary,
            spans,
            created_at: Local::now(),
        }
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Markdown => self.render_markdown(),
            OutputFormat::Text => strip_markdown(&self.render_markdown()),
        }
    }

    /// Write the document, auto-generating a sibling path when none given.
    pub fn save(
        &self,
        output_path: Option<&Path>,
        format: OutputFormat,
    ) -> Result<PathBuf, OutputError> {
        let path = match output_path {
            Some(p) => p.to_path_buf(),
            None => self.default_path(format),
        };

        let content = self.render(format);
        std::fs::write(&path, content).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::info!("Wrote meeting notes to {}", path.display());
        Ok(path)
    }

    /// `<stem>_minutes_<timestamp>.<ext>` next to the input file.
    pub fn default_path(&self, format: OutputFormat) -> PathBuf {
        let stem = self
            .media_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("meeting");
        let stamp = self.created_at.format("%Y%m%d_%H%M%S");
        let name = format!("{}_minutes_{}.{}", stem, stamp, format.extension());
        self.media_path
            .parent()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| PathBuf::from(name))
    }

    fn render_markdown(&self) -> String {
        let file_name = self
            .media_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        let mut doc = String::new();
        doc.push_str(&format!("# Meeting Notes: {}\n\n", file_name));
        doc.push_str(&format!(
            "**Created**: {}  \n",
            self.created_at.format("%Y-%m-%d %H:%M")
        ));
        doc.push_str(&format!("**Source**: {}  \n", file_name));
        doc.push_str(&format!(
            "**Duration**: {}  \n",
            format_hms(self.transcription.duration)
        ));
        doc.push_str(&format!("**Language**: {}  \n", self.transcription.language));
        doc.push_str("\n---\n\n");

        doc.push_str("## Summary\n\n");
        doc.push_str(self.summary.overview.trim());
        doc.push('\n');

        if !self.summary.key_points.is_empty() {
            doc.push_str("\n## Key Points\n\n");
            for point in &self.summary.key_points {
                doc.push_str(&format!("- {}\n", point));
            }
        }

        doc.push_str("\n## Action Items\n\n");
        if self.summary.action_items.is_empty() {
            doc.push_str("None\n");
        } else {
            for item in &self.summary.action_items {
                doc.push_str(&format!("- {}\n", item));
            }
        }

        if !self.summary.chunk_failures.is_empty() {
            doc.push_str("\n## Unsummarized Ranges\n\n");
            doc.push_str("Summarization failed for these parts of the recording:\n\n");
            for index in &self.summary.chunk_failures {
                match self.spans.iter().find(|s| s.index == *index) {
                    Some(span) => doc.push_str(&format!(
                        "- {} to {} (chunk {})\n",
                        format_hms(span.start),
                        format_hms(span.end),
                        index
                    )),
                    None => doc.push_str(&format!("- chunk {}\n", index)),
                }
            }
        }

        doc.push_str("\n---\n\n## Full Transcript\n\n");
        doc.push_str(&self.transcription.text_with_timestamps());
        doc.push('\n');

        doc
    }
}

/// Flatten markdown into plain text: drop heading markers and bold/italic
/// decoration, keep bullet dashes.
fn strip_markdown(text: &str) -> String {
    text.lines()
        .map(|line| {
            let line = if line.starts_with('#') {
                line.trim_start_matches('#').trim_start()
            } else {
                line
            };
            line.replace("**", "").replace("__", "")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
