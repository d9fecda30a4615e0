//! Google Gemini backend.
//!
//! Calls `POST {base_url}/v1beta/models/{model}:generateContent` with the key
//! in the `x-goog-api-key` header, so the key never appears in a URL that
//! might be logged.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::llm::backend::{error_message, http_client, AnalysisBackend, LlmError};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

// ---------------------------------------------------------------------------
// GeminiBackend
// ---------------------------------------------------------------------------

/// Sends the analysis prompt to a Gemini model.
pub struct GeminiBackend {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl GeminiBackend {
    /// Build a `GeminiBackend` from application config.
    ///
    /// The API key is resolved once here (config value, then environment).
    /// A missing key is reported on the first [`generate`](AnalysisBackend::generate)
    /// call rather than at construction, so the window can still open.
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            client: http_client(config),
            config: config.clone(),
            api_key: config.resolved_api_key(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl AnalysisBackend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingApiKey(self.config.api_key_env.clone()))?;

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        };

        log::debug!(
            "gemini: POST model={} prompt_len={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(error) = parsed.error {
            return Err(LlmError::Api {
                status: error.code,
                message: error.message,
            });
        }

        let reply: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if reply.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }

        Ok(reply)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_config(base_url: &str, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            base_url: base_url.into(),
            api_key: api_key.map(str::to_string),
            api_key_env: "CHAT_VIBES_TEST_UNSET_VARIABLE".into(),
            model: "gemini-test".into(),
            timeout_secs: 5,
            ..LlmConfig::default()
        }
    }

    #[test]
    fn url_has_no_double_slash() {
        let backend = GeminiBackend::from_config(&make_config("http://host/", Some("k")));
        assert_eq!(
            backend.url(),
            "http://host/v1beta/models/gemini-test:generateContent"
        );
    }

    #[tokio::test]
    async fn returns_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "{\"moodMetrics\":" }, { "text": "{}}" }] }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let backend = GeminiBackend::from_config(&make_config(&server.uri(), Some("secret")));
        let reply = backend.generate("hello").await.unwrap();

        assert_eq!(reply, "{\"moodMetrics\":{}}");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::from_config(&make_config(&server.uri(), Some("bad")));
        let err = backend.generate("hello").await.unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_candidates_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let backend = GeminiBackend::from_config(&make_config(&server.uri(), Some("k")));
        assert!(matches!(
            backend.generate("hello").await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let backend = GeminiBackend::from_config(&make_config(&server.uri(), None));
        assert!(matches!(
            backend.generate("hello").await,
            Err(LlmError::MissingApiKey(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        // Port 9 (discard) on localhost is expected to refuse connections.
        let backend = GeminiBackend::from_config(&make_config("http://127.0.0.1:9", Some("k")));
        assert!(matches!(
            backend.generate("hello").await,
            Err(LlmError::Request(_)) | Err(LlmError::Timeout)
        ));
    }
}
