//! Core `AnalysisBackend` trait, `LlmError`, and backend selection.
//!
//! A backend takes the complete prompt text and returns the model's reply
//! text unmodified.  It knows nothing about the reply's JSON shape; parsing
//! is the orchestrator's job.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{LlmConfig, LlmProvider};
use crate::llm::gemini::GeminiBackend;
use crate::llm::openai::OpenAiBackend;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while calling the remote model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("analysis request timed out")]
    Timeout,

    /// The service answered with a non-success status or an error body.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP response body was not the expected envelope.
    #[error("failed to parse API response: {0}")]
    Parse(String),

    /// The service returned no usable text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// No API key was configured or found in the environment.
    #[error("no API key configured (set `api_key` in settings.toml or the {0} environment variable)")]
    MissingApiKey(String),
}

impl LlmError {
    /// `false` when the variant carries a message slot that came back blank,
    /// e.g. an error status with an empty body.
    pub fn has_detail(&self) -> bool {
        match self {
            LlmError::Request(message)
            | LlmError::Parse(message)
            | LlmError::Api { message, .. } => !message.trim().is_empty(),
            LlmError::Timeout | LlmError::EmptyResponse | LlmError::MissingApiKey(_) => true,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisBackend trait
// ---------------------------------------------------------------------------

/// Async trait for the remote text-generation service.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn AnalysisBackend>`).
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Send `prompt` and return the reply text.
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Build the HTTP client shared by all backends.
///
/// A default (no-timeout) client is used as a last-resort fallback if the
/// builder fails.
pub(crate) fn http_client(config: &LlmConfig) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Pull a human-readable message out of an error body.
///
/// Both Gemini and OpenAI use `{"error": {"message": "..."}}`; anything else
/// is returned verbatim.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Construct the backend selected by `config.provider`.
pub fn backend_from_config(config: &LlmConfig) -> Arc<dyn AnalysisBackend> {
    match config.provider {
        LlmProvider::Gemini => Arc::new(GeminiBackend::from_config(config)),
        LlmProvider::OpenAiCompatible => Arc::new(OpenAiBackend::from_config(config)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
