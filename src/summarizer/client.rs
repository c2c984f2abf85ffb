//! Ollama-backed summarizer client.
//!
//! Sends the narrative text to an Ollama `/api/generate` endpoint with
//! deterministic decoding (temperature 0.0, no sampling) and maps
//! transport failures onto [`SummarizerError`] variants.

use crate::summarizer::{Summarizer, SummarizerError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the Ollama summarizer.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server.
    pub base_url: String,
    /// Model name, e.g. `llama3.2:latest`.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2:latest".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Ollama generate API request.
#[derive(Debug, Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: i32,
}

/// Ollama generate API response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[allow(dead_code)] // Response field, used for future stream handling
    #[serde(default)]
    done: bool,
}

/// HTTP client for an Ollama summarization backend.
pub struct OllamaSummarizer {
    config: OllamaConfig,
    http_client: reqwest::Client,
}

impl OllamaSummarizer {
    /// Create a new summarizer client.
    pub fn new(config: OllamaConfig) -> Result<Self, SummarizerError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Build the condensation prompt for the given length window.
    fn build_prompt(text: &str, min_length: usize, max_length: usize) -> String {
        format!(
            "Summarize the following student performance report in {} to {} words. \
             Keep concrete numbers. Output only the summary text.\n\n{}",
            min_length, max_length, text
        )
    }
}

#[async_trait]
impl Summarizer for OllamaSummarizer {
    async fn summarize(
        &self,
        text: &str,
        min_length: usize,
        max_length: usize,
    ) -> Result<String, SummarizerError> {
        let url = format!("{}/api/generate", self.config.base_url);

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: Self::build_prompt(text, min_length, max_length),
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                // Word budget to token budget, roughly.
                num_predict: (max_length * 2) as i32,
            },
        };

        debug!("Sending summarization request to {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizerError::Timeout(self.config.timeout_seconds)
                } else if e.is_connect() {
                    SummarizerError::Connect(self.config.base_url.clone())
                } else {
                    SummarizerError::InvalidResponse(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!("Summarizer returned status {}", status);
            return Err(SummarizerError::Api { status, body });
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        let summary = generate_response.response.trim().to_string();
        if summary.is_empty() {
            return Err(SummarizerError::InvalidResponse(
                "empty summary text".to_string(),
            ));
        }

        Ok(summary)
    }
}
