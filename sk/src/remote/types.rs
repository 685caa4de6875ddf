//! Wire types for the OpenAI-compatible chat completions API

use std::collections::HashMap;

use promptbook::{GenerationParams, Sampling};
use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A single message in a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }
}

/// Request body for the chat completions endpoint
///
/// Azure routes the model through the deployment path, so `model` stays
/// unset there and is omitted from the body.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    #[serde(rename = "n", skip_serializing_if = "Option::is_none")]
    pub number_of_answers: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    pub stream: bool,
}

impl ChatRequest {
    /// Build a request from prompt text and generation parameters
    ///
    /// Temperature and nucleus sampling are mutually exclusive on the wire;
    /// only the field selected by `params.sampling()` is sent.
    pub fn from_params(user_prompt: impl Into<String>, system_prompt: Option<&str>, params: &GenerationParams) -> Self {
        let mut messages = Vec::new();
        if let Some(system) = system_prompt {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(user_prompt));

        let (temperature, top_p) = match params.sampling() {
            Sampling::Temperature(t) => (Some(t), None),
            Sampling::Nucleus(p) => (None, Some(p)),
        };

        Self {
            model: None,
            messages,
            temperature,
            top_p,
            max_tokens: params.maximum_tokens,
            number_of_answers: params.number_of_answers,
            stop: params.stop.clone(),
            presence_penalty: params.presence_penalty,
            frequency_penalty: params.frequency_penalty,
            logit_bias: params.logit_bias.clone(),
            user: params.user.clone(),
            stream: false,
        }
    }

    /// Attach an explicit model id (OpenAI; Azure routes by deployment)
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Same request flagged for SSE streaming
    pub fn streamed(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Response body for a blocking chat completion
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,

    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

/// One generated answer inside a response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

/// Token accounting attached to a response
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChatUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

// Streaming types

/// One SSE chunk of a streamed completion
#[derive(Debug, Deserialize)]
pub struct ChatStreamChunk {
    pub choices: Vec<ChatStreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatStreamChoice {
    pub delta: ChatStreamDelta,
    pub finish_reason: Option<String>,
}

/// Partial message payload inside a streamed chunk
#[derive(Debug, Default, Deserialize)]
pub struct ChatStreamDelta {
    pub role: Option<ChatRole>,
    pub content: Option<String>,
}

// Model listing types

/// A model entry from the models listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ModelData {
    pub id: String,

    #[serde(default)]
    pub owned_by: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModelListResponse {
    pub data: Vec<ModelData>,
}
