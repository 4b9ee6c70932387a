//! Fake model client for testing.
//!
//! Responses are registered per schema name, so a test can script the answer
//! to the recipe parser and the ingredient matcher independently. Every request
//! is recorded for later inspection.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::model_client::{ExtractionRequest, ModelClient, ServiceError};

#[derive(Debug, Clone)]
enum FakeReply {
    Value(serde_json::Value),
    Failure(String),
}

#[derive(Debug, Default)]
pub struct FakeModelClient {
    replies: Mutex<HashMap<String, FakeReply>>,
    requests: Mutex<Vec<ExtractionRequest>>,
}

impl FakeModelClient {
    /// A client with no scripted replies: every call fails.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(schema_name: &str, response: serde_json::Value) -> Self {
        let client = Self::new();
        client.add_response(schema_name, response);
        client
    }

    pub fn add_response(&self, schema_name: &str, response: serde_json::Value) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_name.to_string(), FakeReply::Value(response));
    }

    pub fn add_failure(&self, schema_name: &str, message: &str) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(schema_name.to_string(), FakeReply::Failure(message.to_string()));
    }

    /// All requests received so far, oldest first.
    pub fn requests(&self) -> Vec<ExtractionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ModelClient for FakeModelClient {
    async fn extract(&self, request: ExtractionRequest) -> Result<serde_json::Value, ServiceError> {
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(request.schema_name())
            .cloned();
        let schema_name = request.schema_name().to_string();
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match reply {
            Some(FakeReply::Value(value)) => Ok(value),
            Some(FakeReply::Failure(message)) => Err(ServiceError::Unavailable(message)),
            None => Err(ServiceError::Unavailable(format!(
                "FakeModelClient: no response configured for schema '{}'",
                schema_name
            ))),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}
