// src/services/upstream.rs
use reqwest::StatusCode;

use crate::config::RelayConfig;
use crate::error::AppError;
use crate::message::{CompletionRequest, ConversationMessage};

/// Client for the OpenAI-compatible streaming completion endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, config: &RelayConfig) -> Self {
        Self {
            http,
            url: config.upstream_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Opens a streaming completion. A successful response is handed back
    /// with its body unread.
    pub async fn stream(
        &self,
        api_key: &str,
        messages: &[ConversationMessage],
    ) -> Result<reqwest::Response, AppError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            stream: true,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream { status: None, detail: e.to_string() })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "upstream stream opened");
            return Ok(response);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AppError::RateLimited);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(AppError::Upstream { status: Some(status.as_u16()), detail })
    }
}
