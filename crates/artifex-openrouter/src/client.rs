// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenRouter chat-completions endpoint.

use std::time::Duration;

use artifex_core::{ArtifexError, GenerationError, ImageData, ProviderConfig};
use base64::Engine;
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// Base URL for the OpenRouter API.
const API_BASE_URL: &str = "https://openrouter.ai/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for OpenRouter communication, also used to fetch remote
/// artifact URLs the provider may return instead of inline data.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new() -> Result<Self, ArtifexError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ArtifexError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: API_BASE_URL.to_string(),
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    #[cfg(test)]
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url;
        self
    }

    /// Issues one flat completion request.
    pub async fn complete(
        &self,
        config: &ProviderConfig,
        body: &ChatRequest,
    ) -> Result<ChatResponse, GenerationError> {
        let response = self
            .http
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, model = %config.model, "completion response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => api_err.error.message,
                Err(_) => body,
            };
            return Err(GenerationError::status(status.as_u16(), detail));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::network(format!("failed to read response body: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| GenerationError::malformed(format!("undecodable completion response: {e}")))
    }

    /// Downloads a remote artifact URL and converts it to binary-as-text.
    ///
    /// A failed download is a retryable network failure: a fresh attempt
    /// yields a fresh URL.
    pub async fn fetch_image(&self, url: &str) -> Result<ImageData, GenerationError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| GenerationError::network(format!("artifact fetch failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::network(format!(
                "artifact fetch returned HTTP {status}"
            )));
        }

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "image/png".to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| GenerationError::network(format!("artifact fetch aborted: {e}")))?;

        Ok(ImageData::new(
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(&bytes),
        ))
    }
}
