//! Ollama chat backend.

use super::{ChatBackend, Message};
use crate::schema::ToolSchema;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Request to the Ollama chat API.
#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    tools: &'a [ToolSchema],
    stream: bool,
}

/// Response from the Ollama chat API.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    message: Message,
}

/// Client for a local Ollama instance.
pub struct OllamaBackend {
    http: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Create a backend for the given model against the default local
    /// endpoint.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Override the Ollama base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The model identifier this backend submits.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ChatBackend for OllamaBackend {
    async fn chat(&self, messages: &[Message], tools: &[ToolSchema]) -> Result<Message> {
        let request = ApiRequest {
            model: &self.model,
            messages,
            tools,
            // The loop wants whole responses, not deltas.
            stream: false,
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(api_response.message)
    }
}
