// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter chat-completions wire types for image output.

use serde::{Deserialize, Serialize};

/// JSON body for `/v1/chat/completions` with image modality enabled.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub modalities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// A typed content part within a message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Response body; only the fields the image path reads are modeled.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<ResponseImage>>,
}

/// One returned image: either a data URL or a fetchable remote URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseImage {
    pub image_url: ImageUrl,
}

/// Error body returned on non-success status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: i64,
}
