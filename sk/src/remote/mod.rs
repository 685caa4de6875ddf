//! Remote completion clients
//!
//! Both providers speak the same chat completions wire format; the
//! CompletionService trait hides which one is configured, and the shared
//! plumbing below handles status mapping, answer extraction, and SSE
//! decoding for them.

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use promptbook::GenerationParams;
use tokio::sync::mpsc;
use tracing::debug;

use crate::config::RemoteConfig;

pub mod api;
mod azure;
mod error;
mod openai;
mod types;

pub use azure::AzureClient;
pub use error::RemoteError;
pub use openai::OpenAiClient;
pub use types::{ChatMessage, ChatRequest, ChatResponse, ChatRole, ChatStreamChunk, ModelData};

/// A remote chat completion provider
///
/// Each call is a single-turn exchange: one optional system prompt plus one
/// user prompt, answered with the first choice's text.
#[async_trait]
pub trait CompletionService: Send + Sync + std::fmt::Debug {
    /// Send one prompt and wait for the complete answer
    async fn ask(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, RemoteError>;

    /// Streaming variant
    ///
    /// Text deltas are sent over the channel as they arrive; the full answer
    /// is returned once the stream closes.
    async fn ask_streaming(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<String, RemoteError>;

    /// List the models the account can reach
    async fn models(&self) -> Result<Vec<ModelData>, RemoteError>;
}

/// Create a completion client based on the provider specified in config
///
/// Supports "openai" and "azure" providers.
pub fn create_client(config: &RemoteConfig) -> Result<Arc<dyn CompletionService>, RemoteError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAiClient::from_config(config)?))
        }
        "azure" => {
            debug!("create_client: creating Azure client");
            Ok(Arc::new(AzureClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(RemoteError::Config(format!(
                "Unknown remote provider: '{}'. Supported: openai, azure",
                other
            )))
        }
    }
}

/// Pass a response through, converting error statuses into RemoteError
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    debug!(%status, "check_status: API error");
    let text = response.text().await.unwrap_or_default();
    Err(RemoteError::from_status(status, text))
}

/// Pull the first choice's text out of a response
fn first_answer(response: ChatResponse) -> Result<String, RemoteError> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| RemoteError::ResponseParsing("response contained no choices".to_string()))
}

/// Drain an SSE body, forwarding text deltas and returning the full answer
async fn collect_stream(response: reqwest::Response, chunk_tx: mpsc::Sender<String>) -> Result<String, RemoteError> {
    let mut stream = response.bytes_stream();
    let mut full_content = String::new();
    let mut buffer = String::new();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(RemoteError::Network)?;
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        // Process complete SSE lines
        while let Some(line_end) = buffer.find('\n') {
            let line = buffer[..line_end].trim().to_string();
            buffer = buffer[line_end + 1..].to_string();

            if line.is_empty() || line == "data: [DONE]" {
                continue;
            }

            if let Some(data) = line.strip_prefix("data: ")
                && let Ok(chunk_data) = serde_json::from_str::<ChatStreamChunk>(data)
                && let Some(choice) = chunk_data.choices.first()
                && let Some(content) = &choice.delta.content
            {
                full_content.push_str(content);
                let _ = chunk_tx.send(content.clone()).await;
            }
        }
    }

    debug!(chars = full_content.len(), "collect_stream: complete");
    Ok(full_content)
}

#[cfg(test)]
mod tests {
    use super::types::ChatChoice;
    use super::*;

    fn response_with(contents: &[&str]) -> ChatResponse {
        ChatResponse {
            choices: contents
                .iter()
                .map(|content| ChatChoice {
                    message: ChatMessage::new(ChatRole::Assistant, *content),
                    finish_reason: Some("stop".to_string()),
                })
                .collect(),
            usage: None,
        }
    }

    #[test]
    fn test_first_answer_picks_first_choice() {
        let answer = first_answer(response_with(&["primary", "secondary"])).unwrap();
        assert_eq!(answer, "primary");
    }

    #[test]
    fn test_first_answer_fails_without_choices() {
        let result = first_answer(response_with(&[]));
        assert!(matches!(result, Err(RemoteError::ResponseParsing(_))));
    }

    #[test]
    fn test_create_client_rejects_unknown_provider() {
        let mut config = RemoteConfig::default();
        config.provider = "bedrock".to_string();

        let result = create_client(&config);
        assert!(matches!(result, Err(RemoteError::Config(_))));
        assert!(result.unwrap_err().to_string().contains("bedrock"));
    }
}
