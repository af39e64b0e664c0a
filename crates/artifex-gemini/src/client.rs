// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `streamGenerateContent` endpoint.

use std::pin::Pin;
use std::time::Duration;

use artifex_core::{ArtifexError, GenerationError, ProviderConfig};
use futures::Stream;
use tracing::debug;

use crate::sse::{self, StreamEvent};
use crate::types::{ApiErrorResponse, GenerateContentRequest};

/// Base URL for the Gemini API.
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Total request timeout. Streams that stall past this are treated as
/// network-layer failures and retried by the queue.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for Gemini API communication.
///
/// Holds only the connection pool; the credential travels per request so one
/// client serves any number of provider configurations.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
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

    /// Issues one streaming generation request.
    ///
    /// A non-success status is classified by code and returned as a
    /// [`GenerationError`]; the caller never sees a raw HTTP failure.
    pub async fn stream_generate(
        &self,
        config: &ProviderConfig,
        body: &GenerateContentRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<StreamEvent, GenerationError>> + Send>>, GenerationError>
    {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            self.base_url, config.model
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::network(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        debug!(status = %status, model = %config.model, "streaming response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!("{} ({})", api_err.error.message, api_err.error.status),
                Err(_) => body,
            };
            return Err(GenerationError::status(status.as_u16(), detail));
        }

        Ok(sse::parse_sse_stream(response.bytes_stream()))
    }
}
