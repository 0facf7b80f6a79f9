// src/main.rs
// CLI entry point: recording in, meeting-notes document out

use anyhow::{Context, Result};
use clap::Parser;
use notula::config::{self, PipelineConfig};
use notula::output::{DocumentAssembler, OutputFormat};
use notula::stt::{Transcribe, WhisperCliTranscriber};
use notula::transcript::format_hms;
use notula::{media, pipeline, LmStudioClient};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Turn a local meeting recording into structured, timestamped minutes:
/// audio extraction (ffmpeg), transcription (whisper.cpp), summarization
/// against a local LLM endpoint.
#[derive(Parser, Debug)]
#[command(name = "notula")]
#[command(version)]
#[command(about = "Generate meeting minutes from an audio/video recording")]
struct Args {
    /// Audio or video file to process
    #[arg(value_name = "MEDIA")]
    media_path: PathBuf,

    /// Output file path (auto-generated next to the input when omitted)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Output format: markdown or text
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Whisper model size: tiny, base, small, medium or large
    #[arg(long, default_value = "base")]
    model: String,

    /// Transcription language code (e.g. en, de), or "auto" to detect
    #[arg(short = 'l', long, default_value = "auto")]
    language: String,

    /// Base URL of the local LLM endpoint
    #[arg(long, default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// LLM model name (auto-detected from the endpoint when omitted)
    #[arg(long)]
    lm_model: Option<String>,

    /// Maximum characters per summarization chunk
    #[arg(long, default_value_t = config::DEFAULT_CHUNK_CHARS)]
    chunk_size: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Concurrent summarization calls
    #[arg(long, default_value_t = config::DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.verbose);

    let format: OutputFormat = args
        .format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Ctrl-C cancels the run; nothing is written in that case
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupt received, cancelling run");
                cancel.cancel();
            }
        });
    }

    println!("Processing {}", args.media_path.display());
    let prepared = media::prepare_audio(&args.media_path)
        .await
        .context("Failed to prepare audio")?;

    let transcriber = WhisperCliTranscriber::new(&args.model)
        .context("Failed to initialize the transcriber")?;
    let language = match args.language.as_str() {
        "auto" => None,
        lang => Some(lang),
    };

    println!("Transcribing with whisper.cpp ({} model)...", args.model);
    let transcription = transcriber
        .transcribe(prepared.path(), language)
        .await
        .context("Transcription failed")?;
    println!(
        "Transcription done: {} segments, duration {}",
        transcription.segments.len(),
        format_hms(transcription.duration)
    );

    let pipeline_config = PipelineConfig {
        chunk_chars: args.chunk_size,
        endpoint: args.endpoint.clone(),
        model: args.lm_model.clone(),
        request_timeout: Duration::from_secs(args.timeout_secs),
        concurrency: args.concurrency,
        ..Default::default()
    };
    let client = LmStudioClient::new(&pipeline_config);

    println!("Summarizing against {}...", pipeline_config.endpoint_base());
    let outcome = pipeline::summarize_transcript(
        &transcription.segments,
        &pipeline_config,
        &client,
        &cancel,
    )
    .await
    .context("Summarization failed")?;

    if !outcome.summary.chunk_failures.is_empty() {
        eprintln!(
            "Warning: {} chunk(s) could not be summarized; the document lists the affected time ranges",
            outcome.summary.chunk_failures.len()
        );
    }

    let assembler = DocumentAssembler::new(
        &args.media_path,
        &transcription,
        &outcome.summary,
        &outcome.spans,
    );
    let saved = assembler
        .save(args.output.as_deref(), format)
        .context("Failed to write the meeting notes")?;

    println!("Saved meeting notes to {}", saved.display());
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "notula=debug" } else { "notula=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
