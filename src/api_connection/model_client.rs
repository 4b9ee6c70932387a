//! Structured-output seam over the hosted language model.
//!
//! Everything that needs the model goes through [`ModelClient::extract`], so the
//! parsing, matching and rewriting code can be exercised against
//! [`FakeModelClient`](super::FakeModelClient) without network access.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;
use tracing::debug;

use super::connection::ApiConnectionError;
use super::endpoints::{
    ChatCompletionRequest, ChatMessage, JsonSchema, JsonSchemaDefinition, Provider,
    ResponseFormat,
};
use crate::config::ModelConfig;

/// Any failure of the external model dependency.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Connection(#[from] ApiConnectionError),

    #[error("No response choices received from the model")]
    NoChoices,

    #[error("Model returned empty content")]
    EmptyContent,

    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Model output has an unexpected shape: {0}")]
    UnexpectedShape(String),

    #[error("Model service unavailable: {0}")]
    Unavailable(String),
}

/// One structured-output call: a system prompt, a user prompt and the schema
/// the answer must follow.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub schema: JsonSchemaDefinition,
    pub max_tokens: u32,
}

impl ExtractionRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        schema_name: &str,
        schema: JsonSchema,
    ) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            schema: JsonSchemaDefinition {
                name: schema_name.to_string(),
                strict: Some(false),
                schema,
            },
            max_tokens: 2048,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn schema_name(&self) -> &str {
        &self.schema.name
    }
}

#[async_trait]
pub trait ModelClient: Send + Sync + fmt::Debug {
    /// Run one structured-output call and return the decoded JSON document.
    async fn extract(&self, request: ExtractionRequest) -> Result<serde_json::Value, ServiceError>;

    fn model_name(&self) -> &str;
}

/// Run `request` and decode the answer into `T`.
pub async fn extract_as<T: DeserializeOwned>(
    client: &dyn ModelClient,
    request: ExtractionRequest,
) -> Result<T, ServiceError> {
    let value = client.extract(request).await?;
    serde_json::from_value(value).map_err(|e| ServiceError::UnexpectedShape(e.to_string()))
}

/// Models sometimes wrap JSON in markdown fences even when asked not to.
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !trimmed.ends_with("```") {
        return trimmed;
    }
    let inner = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };
    inner.trim_end_matches("```").trim()
}

/// [`ModelClient`] backed by an OpenRouter-compatible chat completions API.
#[derive(Debug)]
pub struct OpenRouterClient {
    provider: Provider,
    model: String,
    temperature: f32,
}

impl OpenRouterClient {
    pub fn new(config: &ModelConfig) -> Result<Self, ApiConnectionError> {
        Ok(Self {
            provider: Provider::openrouter(config)?,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn extract(&self, request: ExtractionRequest) -> Result<serde_json::Value, ServiceError> {
        let schema_name = request.schema.name.clone();
        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(request.system_prompt),
                ChatMessage::user(request.user_prompt),
            ],
            response_format: Some(ResponseFormat::json_schema(request.schema)),
            temperature: Some(self.temperature),
            max_tokens: Some(request.max_tokens),
        };

        let response = self.provider.call_chat_completion(chat_request).await?;
        let choice = response.choices.into_iter().next().ok_or(ServiceError::NoChoices)?;
        let raw = choice.message.content.unwrap_or_default();
        let content = strip_code_fences(&raw);
        if content.is_empty() {
            return Err(ServiceError::EmptyContent);
        }

        debug!(schema = %schema_name, bytes = content.len(), "received structured output");
        serde_json::from_str(content).map_err(ServiceError::InvalidJson)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
