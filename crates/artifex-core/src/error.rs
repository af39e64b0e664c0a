// SPDX-FileCopyrightText: 2026 Artifex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Artifex generation engine.
//!
//! Two layers are distinguished: [`ArtifexError`] is the crate-wide
//! operational error returned by queue and storage operations, while
//! [`GenerationError`] is the classified per-attempt failure a provider
//! adapter reports for one network attempt. The retry policy consumes
//! only the [`ErrorClass`] tag of the latter.

use strum::{Display, EnumString};
use thiserror::Error;

/// The primary error type used across Artifex queue and storage operations.
#[derive(Debug, Error)]
pub enum ArtifexError {
    /// Configuration errors (invalid TOML, missing required fields, bad credential).
    #[error("configuration error: {0}")]
    Config(String),

    /// Provider adapter errors that escape the retry loop.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Blob store errors (filesystem I/O, decode failures).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A request violated an invariant before any network call was made.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The referenced queue item does not exist.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Stable classification tag for a failed generation attempt.
///
/// The string form of each variant is a wire-stable identifier, not a
/// display message; it drives retry decisions and consecutive-failure
/// counting in the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum ErrorClass {
    /// Timeouts, connection resets, mid-stream aborts.
    #[strum(serialize = "transient-network")]
    TransientNetwork,
    /// HTTP 5xx and 429 responses.
    #[strum(serialize = "transient-server")]
    TransientServer,
    /// The attempt completed but produced zero artifacts.
    #[strum(serialize = "no-artifact")]
    EmptyResult,
    /// The response body could not be decoded.
    #[strum(serialize = "malformed-response")]
    MalformedResponse,
    /// 4xx (other than 429), invalid model/size combination, missing credential.
    #[strum(serialize = "fatal-client")]
    FatalClient,
}

impl ErrorClass {
    /// Whether an attempt failing with this class may be retried.
    ///
    /// Empty results are deliberately retryable: a provider that accepted
    /// the request but returned nothing is treated like a transient glitch.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorClass::TransientNetwork | ErrorClass::TransientServer | ErrorClass::EmptyResult
        )
    }

    /// Classifies a non-success HTTP status code.
    pub fn from_status(status: u16) -> Self {
        if status == 429 || status >= 500 {
            ErrorClass::TransientServer
        } else {
            ErrorClass::FatalClient
        }
    }
}

/// A classified failure for exactly one generation attempt.
///
/// Adapters construct these; the orchestrator consults [`ErrorClass`] to
/// decide between retry and terminal failure. The message is the
/// human-readable detail preserved for user display on fatal errors.
#[derive(Debug, Clone, Error)]
#[error("{class}: {message}")]
pub struct GenerationError {
    pub class: ErrorClass,
    pub message: String,
}

impl GenerationError {
    pub fn new(class: ErrorClass, message: impl Into<String>) -> Self {
        Self {
            class,
            message: message.into(),
        }
    }

    /// Network-layer failure (request never completed or stream aborted).
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::TransientNetwork, message)
    }

    /// Non-success HTTP status, classified by code.
    pub fn status(status: u16, detail: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::from_status(status),
            format!("HTTP {status}: {}", detail.into()),
        )
    }

    /// The attempt settled without producing any artifact.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::EmptyResult, message)
    }

    /// The response body could not be decoded.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::MalformedResponse, message)
    }

    /// A client-side error that must not be retried.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::FatalClient, message)
    }

    /// Whether the orchestrator may retry after this error.
    pub fn is_retryable(&self) -> bool {
        self.class.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classes() {
        assert!(ErrorClass::TransientNetwork.is_retryable());
        assert!(ErrorClass::TransientServer.is_retryable());
        assert!(ErrorClass::EmptyResult.is_retryable());
        assert!(!ErrorClass::MalformedResponse.is_retryable());
        assert!(!ErrorClass::FatalClient.is_retryable());
    }

    #[test]
    fn status_classification() {
        assert_eq!(ErrorClass::from_status(429), ErrorClass::TransientServer);
        assert_eq!(ErrorClass::from_status(500), ErrorClass::TransientServer);
        assert_eq!(ErrorClass::from_status(503), ErrorClass::TransientServer);
        assert_eq!(ErrorClass::from_status(400), ErrorClass::FatalClient);
        assert_eq!(ErrorClass::from_status(401), ErrorClass::FatalClient);
        assert_eq!(ErrorClass::from_status(404), ErrorClass::FatalClient);
    }

    #[test]
    fn class_tags_are_stable_strings() {
        assert_eq!(ErrorClass::TransientNetwork.to_string(), "transient-network");
        assert_eq!(ErrorClass::EmptyResult.to_string(), "no-artifact");
        assert_eq!(ErrorClass::FatalClient.to_string(), "fatal-client");
    }

    #[test]
    fn status_error_carries_detail() {
        let err = GenerationError::status(429, "rate limited");
        assert_eq!(err.class, ErrorClass::TransientServer);
        assert!(err.message.contains("HTTP 429"));
        assert!(err.is_retryable());
    }
}
