// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI Images API request/response wire types.

use serde::{Deserialize, Serialize};

/// JSON body for `/v1/images/generations`.
#[derive(Debug, Clone, Serialize)]
pub struct ImagesRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    /// One of the provider's fixed enumerated sizes.
    pub size: String,
}

/// Response shared by the generation and edit endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<ImageDatum>,
}

/// One generated image entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageDatum {
    /// Base64-encoded image payload.
    pub b64_json: Option<String>,
    /// Remote URL, present on older response shapes only.
    pub url: Option<String>,
}

/// Error body returned on non-success status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type", default)]
    pub type_: String,
}
