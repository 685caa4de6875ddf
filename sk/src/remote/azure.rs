//! Azure OpenAI chat completions client
//!
//! Same wire format as OpenAI, but addressed by resource and deployment,
//! authenticated with an `api-key` header, and versioned with an
//! `api-version` query parameter. The deployment routes the model, so the
//! request body never names one.

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

/// Azure OpenAI API client
#[derive(Debug)]
pub struct AzureClient {
    api_key: String,
    api_version: String,
    base_url: String,
    chat_path: String,
    http: Client,
}

impl AzureClient {
    /// Create a new client from configuration
    ///
    /// Requires `resource` and `deployment` to be set.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, RemoteError> {
        debug!(resource = ?config.resource, deployment = ?config.deployment, "from_config: called");
        let api_key = config.get_api_key().map_err(|_| RemoteError::Unauthorized)?;

        let resource = config
            .resource
            .as_deref()
            .ok_or_else(|| RemoteError::Config("Azure provider requires remote.resource to be set.".to_string()))?;
        let deployment = config
            .deployment
            .as_deref()
            .ok_or_else(|| RemoteError::Config("Azure provider requires remote.deployment to be set.".to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(RemoteError::Network)?;

        let base_url = config.base_url.clone().unwrap_or_else(|| api::azure_base(resource));

        Ok(Self {
            api_key,
            api_version: config.api_version.clone(),
            base_url,
            chat_path: api::azure_chat_completions(deployment),
            http,
        })
    }

    /// POST a request body to the deployment's chat completions endpoint
    async fn post_chat(&self, body: &ChatRequest) -> Result<reqwest::Response, RemoteError> {
        let url = api::join_url(&self.base_url, &self.chat_path);
        let response = self
            .http
            .post(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .header("api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        check_status(response).await
    }
}

#[async_trait]
impl CompletionService for AzureClient {
    async fn ask(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        params: &GenerationParams,
    ) -> Result<String, RemoteError> {
        debug!(prompt_len = prompt.len(), "ask: called");
        let body = ChatRequest::from_params(prompt, system_prompt, params);

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
        debug!(prompt_len = prompt.len(), "ask_streaming: called");
        let body = ChatRequest::from_params(prompt, system_prompt, params).streamed();

        let response = self.post_chat(&body).await?;
        collect_stream(response, chunk_tx).await
    }

    async fn models(&self) -> Result<Vec<ModelData>, RemoteError> {
        debug!("models: called");
        let url = api::join_url(&self.base_url, api::MODELS);

        let response = self
            .http
            .get(&url)
            .header("api-key", &self.api_key)
            .send()
            .await
            .map_err(RemoteError::Network)?;

        let response = check_status(response).await?;

        let listing: ModelListResponse = response.json().await?;
        debug!(count = listing.data.len(), "models: success");
        Ok(listing.data)
    }
}
