//! Summarization boundary.
//!
//! The aggregation core treats summarization as an injected capability:
//! a single text-to-text call per external request, deterministic
//! decoding, potentially slow. Failures are surfaced with their own
//! error type so callers can tell them apart from lookup errors.

pub mod client;

pub use client::OllamaSummarizer;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the summarization backend.
#[derive(Debug, Error)]
pub enum SummarizerError {
    /// The backend could not be reached.
    #[error("Cannot connect to summarizer at {0}")]
    Connect(String),
    /// The request exceeded the configured timeout.
    #[error("Summarizer request timed out after {0}s")]
    Timeout(u64),
    /// The backend returned a non-success status.
    #[error("Summarizer API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
    /// The backend answered but the payload was unusable.
    #[error("Invalid summarizer response: {0}")]
    InvalidResponse(String),
}

/// External text-condensation capability.
///
/// Implementations must be side-effect free from the caller's point of
/// view; the core never invokes this more than once per request.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Condense `text` to roughly `min_length`..=`max_length` words.
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, SummarizerError>;
}

/// No-op summarizer used when summarization is disabled.
///
/// Returns the input unchanged so the analytics endpoints stay usable
/// without a model backend.
#[derive(Debug, Clone, Default)]
pub struct DisabledSummarizer;

#[async_trait]
impl Summarizer for DisabledSummarizer {
    async fn summarize(
        &self,
        text: &str,
        _min_length: usize,
        _max_length: usize,
    ) -> Result<String, SummarizerError> {
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_summarizer_passthrough() {
        let summarizer = DisabledSummarizer;
        let result =
            tokio_test::block_on(summarizer.summarize("full narrative", 100, 250)).unwrap();
        assert_eq!(result, "full narrative");
    }

    #[test]
    fn test_error_messages_are_distinct() {
        let connect = SummarizerError::Connect("http://localhost:11434".to_string());
        assert!(connect.to_string().contains("Cannot connect"));

        let timeout = SummarizerError::Timeout(30);
        assert!(timeout.to_string().contains("timed out after 30s"));

        let api = SummarizerError::Api {
            status: 500,
            body: "internal".to_string(),
        };
        assert!(api.to_string().contains("500"));
    }
}
