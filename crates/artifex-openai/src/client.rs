// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenAI Images API.
//!
//! Two endpoints are used: `/v1/images/generations` takes a pure JSON body,
//! while `/v1/images/edits` requires a multipart form carrying each
//! reference image as its own part.

use std::time::Duration;

use artifex_core::{GenerationError, ImageData, ProviderConfig};
use base64::Engine;
use reqwest::multipart;
use tracing::debug;

use crate::types::{ApiErrorResponse, ImagesRequest, ImagesResponse};

/// Base URL for the OpenAI API.
const API_BASE_URL: &str = "https://api.openai.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// HTTP client for OpenAI image endpoints.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    pub fn new() -> Result<Self, artifex_core::ArtifexError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| artifex_core::ArtifexError::Provider {
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

    /// Pure JSON generation request (no reference images).
    pub async fn generate(
        &self,
        config: &ProviderConfig,
        body: &ImagesRequest,
    ) -> Result<ImagesResponse, GenerationError> {
        let response = self
            .http
            .post(format!("{}/v1/images/generations", self.base_url))
            .bearer_auth(&config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::network(format!("HTTP request failed: {e}")))?;

        read_images_response(response).await
    }

    /// Multipart edit request carrying each reference image as a form part.
    pub async fn edit(
        &self,
        config: &ProviderConfig,
        body: &ImagesRequest,
        references: &[ImageData],
    ) -> Result<ImagesResponse, GenerationError> {
        let mut form = multipart::Form::new()
            .text("model", body.model.clone())
            .text("prompt", body.prompt.clone())
            .text("n", body.n.to_string())
            .text("size", body.size.clone());

        for (index, image) in references.iter().enumerate() {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&image.data)
                .map_err(|e| {
                    GenerationError::fatal(format!("reference image {index} is not valid base64: {e}"))
                })?;
            let part = multipart::Part::bytes(bytes)
                .file_name(format!("reference-{index}.png"))
                .mime_str(&image.mime_type)
                .map_err(|e| {
                    GenerationError::fatal(format!(
                        "reference image {index} has invalid MIME type `{}`: {e}",
                        image.mime_type
                    ))
                })?;
            form = form.part("image[]", part);
        }

        let response = self
            .http
            .post(format!("{}/v1/images/edits", self.base_url))
            .bearer_auth(&config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| GenerationError::network(format!("HTTP request failed: {e}")))?;

        read_images_response(response).await
    }
}

/// Classifies the status code and decodes the JSON body.
async fn read_images_response(
    response: reqwest::Response,
) -> Result<ImagesResponse, GenerationError> {
    let status = response.status();
    debug!(status = %status, "images response received");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let detail = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(api_err) => format!("{} ({})", api_err.error.message, api_err.error.type_),
            Err(_) => body,
        };
        return Err(GenerationError::status(status.as_u16(), detail));
    }

    let body = response
        .text()
        .await
        .map_err(|e| GenerationError::network(format!("failed to read response body: {e}")))?;
    serde_json::from_str(&body)
        .map_err(|e| GenerationError::malformed(format!("undecodable images response: {e}")))
}
