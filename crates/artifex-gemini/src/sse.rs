// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for Gemini streaming image generation.
//!
//! Converts a raw byte stream into typed [`StreamEvent`]s using the
//! `eventsource-stream` crate, which buffers partial lines across chunk
//! boundaries -- chunks may split multi-byte text or event frames at any
//! offset. The parser is generic over the byte source so tests can feed
//! arbitrarily split chunks without a network.

use std::pin::Pin;

use artifex_core::{GenerationError, ImageData};
use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use tracing::debug;

use crate::types::GenerateContentChunk;

/// Explicit end-of-stream sentinel some SSE servers emit as a data line.
const DONE_SENTINEL: &str = "[DONE]";

/// Typed events extracted from the Gemini image stream.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Incremental reasoning text (a part flagged `thought`).
    Thought(String),
    /// In-progress preview frame (a `thought` part carrying image data).
    InterimImage(ImageData),
    /// A final artifact (non-thought part carrying image data).
    FinalImage(ImageData),
}

/// Parses a byte stream into a stream of typed [`StreamEvent`]s.
///
/// Malformed data records are dropped with a debug log rather than failing
/// the stream; the adapter-level "no artifact produced" check is the
/// backstop for a stream that ends without anything usable. Transport
/// errors surface as retryable network failures.
pub fn parse_sse_stream<S, B, E>(
    bytes: S,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, GenerationError>> + Send>>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let events = bytes.eventsource().flat_map(|result| {
        let out = match result {
            Ok(event) => decode_record(&event.data),
            Err(e) => vec![Err(GenerationError::network(format!(
                "SSE stream error: {e}"
            )))],
        };
        futures::stream::iter(out)
    });

    Box::pin(events)
}

/// Decodes one complete SSE data record into zero or more events.
fn decode_record(data: &str) -> Vec<Result<StreamEvent, GenerationError>> {
    let data = data.trim();
    if data.is_empty() || data == DONE_SENTINEL {
        return Vec::new();
    }

    let chunk: GenerateContentChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            // Undecodable records are skipped, not fatal.
            debug!(error = %e, len = data.len(), "dropping malformed stream record");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for candidate in chunk.candidates {
        let Some(content) = candidate.content else {
            continue;
        };
        for part in content.parts {
            let is_thought = part.thought.unwrap_or(false);
            match (is_thought, part.text, part.inline_data) {
                (true, _, Some(inline)) => out.push(Ok(StreamEvent::InterimImage(
                    ImageData::new(inline.mime_type, inline.data),
                ))),
                (true, Some(text), None) => out.push(Ok(StreamEvent::Thought(text))),
                (false, _, Some(inline)) => out.push(Ok(StreamEvent::FinalImage(
                    ImageData::new(inline.mime_type, inline.data),
                ))),
                // Non-thought text (captions, filler) carries no image signal.
                _ => {}
            }
        }
    }
    out
}
