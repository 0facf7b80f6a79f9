// src/config.rs
// Pipeline configuration: plain values handed in by the caller, validated up front

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:1234/v1";
pub const DEFAULT_CHUNK_CHARS: usize = 20_000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_ATTEMPTS: u8 = 3;
pub const DEFAULT_CONCURRENCY: usize = 2;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Chunk size must be positive")]
    InvalidChunkSize,

    #[error("Concurrency limit must be positive")]
    InvalidConcurrency,

    #[error("Request timeout must be positive")]
    InvalidTimeout,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
}

/// Explicit configuration for the summarization pipeline.
/// No module-level singletons: callers construct one and pass it down,
/// which keeps tests isolated from the environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum characters per chunk submitted to the LLM
    pub chunk_chars: usize,
    /// Base URL of the OpenAI-compatible endpoint, e.g. http://localhost:1234/v1
    pub endpoint: String,
    /// Model name; None means auto-detect from the endpoint
    pub model: Option<String>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Attempts for transient endpoint failures (first try included)
    pub max_attempts: u8,
    /// Base delay for exponential backoff between retries
    pub retry_base_delay: Duration,
    /// In-flight summarization calls; local endpoints serialize internally,
    /// so anything beyond their real parallelism only queues
    pub concurrency: usize,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_chars: DEFAULT_CHUNK_CHARS,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: Duration::from_secs(2),
            concurrency: DEFAULT_CONCURRENCY,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_chars == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        let trimmed = self.endpoint.trim();
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    /// Endpoint with any trailing slash removed, for path joining.
    pub fn endpoint_base(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }
}
