// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response wire types.
//!
//! Only the fields the image-generation path touches are modeled; unknown
//! fields in responses are ignored by serde.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

/// A content entry: an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single part: text, inline image data, or both absent.
///
/// Parts flagged `thought` carry interim reasoning output; a non-thought
/// part with inline data is a final artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            thought: None,
            inline_data: None,
        }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            thought: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64-encoded image payload with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

/// Generation parameters, including the image sizing vocabulary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
    pub image_config: ImageConfig,
}

/// Native Gemini sizing vocabulary (aspect ratio tag + size tag).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    pub aspect_ratio: String,
    pub image_size: String,
}

/// One decoded record from the SSE stream.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

/// Error body returned on non-success status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::text("a red fox"), Part::inline_data("image/png", "aGk=")],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".into(), "IMAGE".into()],
                image_config: ImageConfig {
                    aspect_ratio: "16:9".into(),
                    image_size: "2K".into(),
                },
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["generationConfig"]["imageConfig"]["aspectRatio"], "16:9");
        assert_eq!(json["generationConfig"]["imageConfig"]["imageSize"], "2K");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        // Absent optionals are omitted entirely.
        assert!(json["contents"][0]["parts"][0].get("inlineData").is_none());
    }

    #[test]
    fn chunk_deserializes_thought_part() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"composing scene","thought":true}]}}]}"#;
        let chunk: GenerateContentChunk = serde_json::from_str(raw).unwrap();
        let part = &chunk.candidates[0].content.as_ref().unwrap().parts[0];
        assert_eq!(part.thought, Some(true));
        assert_eq!(part.text.as_deref(), Some("composing scene"));
    }

    #[test]
    fn chunk_tolerates_unknown_fields() {
        let raw = r#"{"candidates":[{"content":{"parts":[]},"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":10}}"#;
        let chunk: GenerateContentChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.candidates.len(), 1);
    }
}
