// HTTP Chat Backend
//
// Blocking reqwest client for an OpenAI-compatible endpoint: bearer auth, an
// explicit whole-request timeout, and status codes mapped to GenerationError

use super::{ChatCompletionRequest, ChatCompletionResponse, GenerationBackend};
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

/// Blocking client for an OpenAI-compatible chat-completions endpoint
pub struct HttpChatBackend {
    endpoint: String,
    api_key: String,
    http: Client,
}

impl HttpChatBackend {
    /// Build a client with the configured endpoint and timeout
    pub fn new(config: &GenerationConfig, api_key: impl Into<String>) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if config.endpoint.is_empty() {
            return Err(GenerationError::Config("endpoint cannot be empty".to_string()));
        }
        if api_key.is_empty() {
            return Err(GenerationError::Config("API key cannot be empty".to_string()));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Config(e.to_string()))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key,
            http,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GenerationBackend for HttpChatBackend {
    fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        debug!(
            "POST {} (model {}, {} messages)",
            self.endpoint,
            request.model,
            request.messages.len()
        );

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| GenerationError::Decode(e.to_string()))
    }
}
