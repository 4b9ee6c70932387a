use reqwest::Client;
use std::env;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, OpenRouterAvailableModel, Provider,
    OPENROUTER_MODELS,
};
use crate::config::ModelConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("API error {status}: {error_body}")]
    ApiError {
        status: reqwest::StatusCode,
        error_body: String,
    },
}

impl Provider {
    pub fn openrouter(config: &ModelConfig) -> Result<Self, ApiConnectionError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::OpenRouter {
            api_key_env_var: config.api_key_env_var.clone(),
            base_url: config.base_url.clone(),
            provider_only: config.provider_only.clone(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
            http,
        })
    }

    pub fn get_available_models(&self) -> Vec<OpenRouterAvailableModel> {
        match self {
            Provider::OpenRouter { .. } => OPENROUTER_MODELS.to_vec(),
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key_env_var,
                base_url,
                provider_only,
                site_url,
                app_name,
                http,
            } => {
                let actual_api_key = env::var(api_key_env_var)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var.clone()))?;

                let url = format!("{}/chat/completions", base_url);

                let mut request_payload = serde_json::to_value(&request)?;
                if !provider_only.is_empty() {
                    if let Some(obj) = request_payload.as_object_mut() {
                        obj.insert(
                            "provider".to_string(),
                            serde_json::json!({ "only": provider_only }),
                        );
                    }
                }

                debug!(model = %request.model, %url, "sending chat completion request");

                let response = http
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("Content-Type", "application/json")
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request_payload)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let chat_response = response.json::<ChatCompletionResponse>().await?;
                    Ok(chat_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::ApiError { status, error_body })
                }
            }
        }
    }
}
