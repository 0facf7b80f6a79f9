// src/summarizer/mod.rs
// Summarizer trait + LM Studio (OpenAI-compatible) client

mod parse;
mod prompts;
mod retry;
mod types;

pub use retry::RetryPolicy;
pub use types::{ChunkNotes, PartialSummary, SummarizeError};

use crate::chunker::Chunk;
use crate::config::PipelineConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const DEFAULT_API_KEY: &str = "lm-studio";

/// Stateless summarization collaborator. One implementation talks to the
/// local LLM endpoint; tests use deterministic stubs.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize one chunk. `whole_transcript` marks the single-chunk case,
    /// where the full minutes prompt applies instead of the chunk prompt.
    async fn summarize_chunk(
        &self,
        chunk: &Chunk,
        whole_transcript: bool,
    ) -> Result<ChunkNotes, SummarizeError>;

    /// Merge-engine collaborator: produce one cohesive overview from the
    /// concatenated per-chunk summaries.
    async fn combine_summaries(&self, combined: &str) -> Result<String, SummarizeError>;
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

/// Client for an LM Studio-style chat-completion endpoint. Holds no state
/// beyond its configuration; every call is independent, so chunks can be
/// summarized concurrently.
pub struct LmStudioClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: Option<String>,
    retry: RetryPolicy,
    max_tokens: u32,
    temperature: f32,
}

impl LmStudioClient {
    pub fn new(config: &PipelineConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        tracing::info!("LM Studio client initialized: {}", config.endpoint_base());

        Self {
            client,
            base_url: config.endpoint_base().to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            model: config.model.clone(),
            retry: RetryPolicy::new(config.max_attempts, config.retry_base_delay),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    /// Find out which model the endpoint has loaded. An empty model list is
    /// the "no model loaded" signature, distinct from other failures.
    async fn resolve_model(&self) -> Result<String, SummarizeError> {
        if let Some(model) = &self.model {
            return Ok(model.clone());
        }

        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }

        let models: ModelList = response
            .json()
            .await
            .map_err(|_| SummarizeError::InvalidResponse)?;

        let ids: Vec<String> = models.data.into_iter().map(|m| m.id).collect();
        match pick_llm_model(&ids) {
            Some(id) => Ok(id.to_string()),
            None => Err(SummarizeError::ModelNotLoaded),
        }
    }

    async fn send_chat(&self, system: &str, user: &str) -> Result<String, SummarizeError> {
        let model = self.resolve_model().await?;

        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status.as_u16(), &body));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|_| SummarizeError::InvalidResponse)?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(SummarizeError::InvalidResponse);
        }

        Ok(content)
    }

    /// One chat call with the configured retry policy applied.
    async fn chat(&self, system: &str, user: &str) -> Result<String, SummarizeError> {
        let mut attempt = 0u8;

        loop {
            match self.send_chat(system, user).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if self.retry.should_retry(attempt, &e) {
                        tracing::warn!("Summarization attempt {} failed: {}", attempt + 1, e);
                        self.retry.wait_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl Summarizer for LmStudioClient {
    async fn summarize_chunk(
        &self,
        chunk: &Chunk,
        whole_transcript: bool,
    ) -> Result<ChunkNotes, SummarizeError> {
        let system = if whole_transcript {
            prompts::MEETING_MINUTES_PROMPT
        } else {
            prompts::CHUNK_PROMPT
        };

        tracing::info!(
            "Summarizing chunk {} ({} chars)...",
            chunk.index,
            chunk.char_count
        );

        let content = self
            .chat(system, &prompts::chunk_user_prompt(&chunk.text()))
            .await?;
        Ok(parse::parse_response(&content))
    }

    async fn combine_summaries(&self, combined: &str) -> Result<String, SummarizeError> {
        tracing::info!("Combining {} chars of partial summaries...", combined.len());
        self.chat(
            prompts::MEETING_MINUTES_PROMPT,
            &prompts::combine_user_prompt(combined),
        )
        .await
    }
}

fn classify_transport_error(e: reqwest::Error) -> SummarizeError {
    if e.is_timeout() {
        SummarizeError::Timeout
    } else {
        SummarizeError::EndpointUnavailable(e.to_string())
    }
}

/// Classify a non-2xx response. LM Studio answers chat requests with a 404
/// and a "no models loaded" body when nothing is loaded; that condition is
/// global and must not be lumped in with ordinary bad responses.
fn classify_status(status: u16, body: &str) -> SummarizeError {
    let lower = body.to_lowercase();
    if lower.contains("no models loaded")
        || lower.contains("model_not_found")
        || (lower.contains("model") && lower.contains("not loaded"))
    {
        SummarizeError::ModelNotLoaded
    } else {
        SummarizeError::UnexpectedResponse {
            status,
            body: body.to_string(),
        }
    }
}

/// Prefer a chat model over embedding models when several are loaded.
fn pick_llm_model(ids: &[String]) -> Option<&String> {
    ids.iter()
        .find(|id| !id.starts_with("text-embedding") && !id.to_lowercase().contains("embed"))
        .or_else(|| ids.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_models_loaded_body_maps_to_model_not_loaded() {
        let err = classify_status(404, r#"{"error":"No models loaded. Load a model first."}"#);
        assert!(matches!(err, SummarizeError::ModelNotLoaded));
    }

    #[test]
    fn other_statuses_map_to_unexpected_response() {
        let err = classify_status(500, "internal error");
        assert!(matches!(
            err,
            SummarizeError::UnexpectedResponse { status: 500, .. }
        ));
    }

    #[test]
    fn embedding_models_are_skipped() {
        let ids = vec![
            "text-embedding-nomic".to_string(),
            "qwen2.5-7b-instruct".to_string(),
        ];
        assert_eq!(pick_llm_model(&ids).unwrap(), "qwen2.5-7b-instruct");
    }

    #[test]
    fn lone_embedding_model_is_still_returned() {
        // Better to try the only loaded model than to refuse outright
        let ids = vec!["text-embedding-nomic".to_string()];
        assert_eq!(pick_llm_model(&ids).unwrap(), "text-embedding-nomic");
    }

    #[test]
    fn empty_model_list_yields_none() {
        assert!(pick_llm_model(&[]).is_none());
    }
}
