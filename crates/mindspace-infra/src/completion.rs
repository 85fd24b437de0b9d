//! HTTP client for the chat completion service.
//!
//! Wire contract: `POST {endpoint}` with `{"user_id": ..., "message": ...}`,
//! answered by `{"response": "<reply text>"}`.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use mindspace_core::chat::completion::CompletionClient;
use mindspace_types::config::CompletionConfig;
use mindspace_types::error::{CompletionError, ConfigError};
use mindspace_types::identity::UserId;

#[derive(Serialize)]
struct CompletionRequest<'a> {
    user_id: &'a str,
    message: &'a str,
}

#[derive(Debug)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCompletionClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &CompletionConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.require_endpoint()?))
    }
}

/// Pull the reply text out of a decoded response body.
fn reply_text(body: Value) -> Result<String, CompletionError> {
    match body {
        Value::Object(mut map) => match map.remove("response") {
            Some(Value::String(text)) => Ok(text),
            Some(Value::Null) | None => Err(CompletionError::MissingResponse),
            Some(other) => Err(CompletionError::Malformed(format!(
                "'response' is not a string: {other}"
            ))),
        },
        other => Err(CompletionError::Malformed(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, user_id: &UserId, text: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            user_id: user_id.as_str(),
            message: text,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CompletionError::Malformed(e.to_string()))?;
        let reply = reply_text(body)?;
        debug!(user_id = %user_id, reply_len = reply.len(), "Completion received");
        Ok(reply)
    }
}
