// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter provider adapter for the Artifex generation engine.
//!
//! This is the flat-request variant: a single JSON request/response with no
//! streaming. Reference images ride along as data-URL content parts, and the
//! response may deliver images either inline (data URLs) or as remote URLs.
//! Remote URLs are fetched and converted to the same binary-as-text form, so
//! callers never special-case the representation.

pub mod client;
pub mod types;

use async_trait::async_trait;
use artifex_core::{
    ArtifexError, GenerationError, GenerationRequest, GenerationSink, ImageData, ImageProvider,
    ProviderConfig, ProviderKind,
};
use tracing::debug;

use crate::client::OpenRouterClient;
use crate::types::{ChatMessage, ChatRequest, ContentPart, ImageUrl};

/// OpenRouter flat image-generation provider.
pub struct OpenRouterProvider {
    client: OpenRouterClient,
}

impl OpenRouterProvider {
    pub fn new() -> Result<Self, ArtifexError> {
        Ok(Self {
            client: OpenRouterClient::new()?,
        })
    }

    #[cfg(test)]
    fn with_client(client: OpenRouterClient) -> Self {
        Self { client }
    }

    fn build_request(config: &ProviderConfig, request: &GenerationRequest) -> ChatRequest {
        let mut content = Vec::with_capacity(1 + request.reference_images.len());
        if !request.prompt.trim().is_empty() {
            content.push(ContentPart::Text {
                text: request.prompt.clone(),
            });
        }
        for image in &request.reference_images {
            content.push(ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url(),
                },
            });
        }

        ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
            modalities: vec!["image".to_string(), "text".to_string()],
        }
    }
}

#[async_trait]
impl ImageProvider for OpenRouterProvider {
    async fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        sink: &dyn GenerationSink,
    ) -> Result<Vec<ImageData>, GenerationError> {
        config
            .validate()
            .and_then(|_| request.validate(ProviderKind::OpenRouter))
            .map_err(|e| GenerationError::fatal(e.to_string()))?;

        let body = Self::build_request(config, request);

        sink.progress(25, "request dispatched").await;
        let response = self.client.complete(config, &body).await?;
        sink.progress(75, "response received").await;

        let returned: Vec<String> = response
            .choices
            .into_iter()
            .filter_map(|c| c.message.images)
            .flatten()
            .map(|i| i.image_url.url)
            .collect();

        if returned.is_empty() {
            return Err(GenerationError::empty("response contained zero images"));
        }

        let mut images = Vec::with_capacity(returned.len());
        for url in returned {
            if let Some(inline) = ImageData::from_data_url(&url) {
                images.push(inline);
            } else if url.starts_with("http://") || url.starts_with("https://") {
                debug!(url = %url, "fetching remote artifact");
                images.push(self.client.fetch_image(&url).await?);
            } else {
                // Char-based truncation: the URL is provider-supplied text.
                let shape: String = url.chars().take(48).collect();
                return Err(GenerationError::malformed(format!(
                    "unrecognized image URL shape: {shape}"
                )));
            }
        }
        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifex_core::ErrorClass;
    use artifex_test_utils::{test_image, RecordingSink};
    use base64::Engine;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config() -> ProviderConfig {
        ProviderConfig::new(
            ProviderKind::OpenRouter,
            "google/gemini-2.5-flash-image",
            "sk-or-test",
        )
    }

    fn provider_for(server: &MockServer) -> OpenRouterProvider {
        OpenRouterProvider::with_client(
            OpenRouterClient::new().unwrap().with_base_url(server.uri()),
        )
    }

    fn completion_with_image(url: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "done",
                    "images": [{"type": "image_url", "image_url": {"url": url}}]
                }
            }]
        })
    }

    #[tokio::test]
    async fn inline_data_url_is_decoded_without_fetching() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(
                serde_json::json!({"modalities": ["image", "text"]}),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_with_image("data:image/webp;base64,aW1n")),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let images = provider
            .generate(&test_config(), &GenerationRequest::new("a koi pond"), &RecordingSink::new())
            .await
            .unwrap();

        assert_eq!(images.len(), 1);
        assert_eq!(images[0].mime_type, "image/webp");
        assert_eq!(images[0].data, "aW1n");
    }

    #[tokio::test]
    async fn remote_url_is_fetched_and_converted_to_base64() {
        let server = MockServer::start().await;
        let artifact_url = format!("{}/artifacts/out.jpg", server.uri());

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_with_image(&artifact_url)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/artifacts/out.jpg"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "image/jpeg")
                    .set_body_bytes(b"jpegbytes".to_vec()),
            )
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let images = provider
            .generate(&test_config(), &GenerationRequest::new("x"), &RecordingSink::new())
            .await
            .unwrap();

        assert_eq!(images[0].mime_type, "image/jpeg");
        assert_eq!(
            images[0].data,
            base64::engine::general_purpose::STANDARD.encode(b"jpegbytes")
        );
    }

    #[tokio::test]
    async fn failed_artifact_fetch_is_retryable_network_error() {
        let server = MockServer::start().await;
        let artifact_url = format!("{}/artifacts/gone.png", server.uri());

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion_with_image(&artifact_url)),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&test_config(), &GenerationRequest::new("x"), &RecordingSink::new())
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::TransientNetwork);
    }

    #[tokio::test]
    async fn missing_images_field_is_no_artifact() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "cannot draw that"}}]
            })))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&test_config(), &GenerationRequest::new("x"), &RecordingSink::new())
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::EmptyResult);
    }

    #[tokio::test]
    async fn unrecognized_url_shape_is_malformed_even_with_multibyte_text() {
        let server = MockServer::start().await;
        // A non-URL payload whose 48th byte falls inside a multi-byte char.
        let weird = format!("x{}", "é".repeat(40));
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_with_image(&weird)))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&test_config(), &GenerationRequest::new("x"), &RecordingSink::new())
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::MalformedResponse);
    }

    #[tokio::test]
    async fn rate_limit_is_transient_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(
                serde_json::json!({"error": {"message": "rate limited", "code": 429}}),
            ))
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let err = provider
            .generate(&test_config(), &GenerationRequest::new("x"), &RecordingSink::new())
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::TransientServer);
    }

    #[test]
    fn reference_images_become_data_url_parts() {
        let mut request = GenerationRequest::new("blend these");
        request.reference_images.push(test_image());
        request.reference_images.push(test_image());

        let body = OpenRouterProvider::build_request(&test_config(), &request);
        assert_eq!(body.messages[0].content.len(), 3);
        assert!(matches!(
            &body.messages[0].content[1],
            ContentPart::ImageUrl { image_url } if image_url.url.starts_with("data:image/png;base64,")
        ));
    }
}
