//! OpenAI chat completions client
//!
//! Implements the CompletionService trait for the public OpenAI API with
//! support for both blocking and streaming responses.

use async_trait::async_trait;
use promptbook::GenerationParams;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

use super::api;
use super::types::{ChatRequest, ChatResponse, ModelData, ModelListResponse};
use super::{CompletionService, RemoteError, check_status, collect_stream, first_answer};
use crate::config::RemoteConfig;

/// OpenAI API client
#[derive(Debug)]
pub struct OpenAiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenAiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        debug!(model = %config.model, "from_config: called");
        let api_key = config.get_api_key().map_err(|_| RemoteError::Unauthorized)?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(RemoteError::Network)?;

        let base_url = config.base_url.clone().unwrap_or_else(|| api::OPENAI_BASE.to_string());

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url,
            http,
        })
    }

    /// Build the request body, pinning the configured model
    fn request_for(&self, prompt: &str, system_prompt: Option<&str>, params: &GenerationParams) -> ChatRequest {
        debug!(model = %self.model, "request_for: called");
        ChatRequest::from_params(prompt, system_prompt, params).with_model(&self.model)
    }

    /// POST a request body to the chat completions endpoint
    async fn post_chat(&self, body: &ChatRequest) -> Result<reqwest::Response, RemoteError> {
        let url = api::join_url(&self.base_url, api::CHAT_COMPLETIONS);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        check_status(response).await
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    async fn ask(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, RemoteError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "ask: called");
        let body = self.request_for(prompt, system_prompt, params);

        let response = self.post_chat(&body).await?;

        debug!("ask: success");
        let api_response: ChatResponse = response.json().await?;
        first_answer(api_response)
    }

    async fn ask_streaming(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<String, RemoteError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "ask_streaming: called");
        let body = self.request_for(prompt, system_prompt, params).streamed();

        let response = self.post_chat(&body).await?;
        collect_stream(response, chunk_tx).await
    }

    async fn models(&self) -> Result<Vec<ModelData>, RemoteError> {
        debug!("models: called");
        let url = api::join_url(&self.base_url, api::MODELS);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(RemoteError::Network)?;

        let response = check_status(response).await?;

        let listing: ModelListResponse = response.json().await?;
        debug!(count = listing.data.len(), "models: success");
        Ok(listing.data)
    }
}
