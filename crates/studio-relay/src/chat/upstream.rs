//! Client for the OpenAI-compatible completion API
//!
//! One streaming call per chat request and one-shot calls for the contact
//! assist features. No retries: every method issues exactly one request.

use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use crate::chat::history::{ChatMessage, build_upstream_messages};
use crate::config::UpstreamConfig;
use crate::error::{Result, StudioError};

/// Raw upstream body as a lazy, single-pass sequence of byte chunks
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Chat completion request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    max_completion_tokens: u32,
    temperature: f32,
}

/// Non-streaming chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Completion API client shared by the chat and contact paths
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
    endpoint: Url,
    api_key: String,
}

impl UpstreamClient {
    /// Create a client with an already-resolved credential
    pub fn new(config: &UpstreamConfig, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            config.api_url.trim_end_matches('/')
        ))
        .map_err(|e| StudioError::Config(format!("Invalid upstream api_url '{}': {e}", config.api_url)))?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| StudioError::Config(format!("Failed to create HTTP client: {e}")))?;

        info!(
            "Upstream client initialized with chat model: {}, endpoint: {}",
            config.chat_model, endpoint
        );

        Ok(Self {
            client,
            config: config.clone(),
            endpoint,
            api_key: api_key.into(),
        })
    }

    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    /// Start a streamed completion
    ///
    /// Fails with `StudioError::Upstream` before any body is read when the
    /// API answers with a non-success status. A transport failure after that
    /// surfaces as an `Err` item and the sequence ends.
    pub async fn stream_completion(
        &self,
        system_prompt: &str,
        history: &[ChatMessage],
    ) -> Result<ChunkStream> {
        let messages = build_upstream_messages(system_prompt, history, self.config.history_limit);
        debug!(
            "Forwarding {} messages ({} from caller)",
            messages.len(),
            messages.len() - 1
        );

        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: &messages,
            stream: true,
            max_completion_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        let response = self.send(&request, None).await?;
        let chunks = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| StudioError::Network(format!("Stream interrupted: {e}"))));

        Ok(Box::pin(chunks))
    }

    /// One-shot completion returning the first choice's trimmed text
    ///
    /// Used by the assist features; `max_tokens` caps the response size.
    pub async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String> {
        let messages = [ChatMessage::system(system), ChatMessage::user(user)];
        let request = ChatCompletionRequest {
            model: &self.config.assist_model,
            messages: &messages,
            stream: false,
            max_completion_tokens: max_tokens,
            temperature: self.config.temperature,
        };

        let timeout = Duration::from_secs(self.config.assist_timeout_secs);
        let response = self.send(&request, Some(timeout)).await?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| StudioError::Serialization(format!("Malformed completion body: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(StudioError::EmptyCompletion)
    }

    async fn send(
        &self,
        request: &ChatCompletionRequest<'_>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StudioError::Network(format!("Request timed out: {e}"))
            } else if e.is_connect() {
                StudioError::Network(format!("Failed to connect to upstream: {e}"))
            } else {
                StudioError::Network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                error_type = "upstream",
                status = %status,
                body = %body,
                "Completion API returned an error"
            );
            return Err(StudioError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}
